use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::batch::{Item, WriteRequest};
use crate::store::{BatchWriteStore, RequestItems};
use crate::{Result, SeederError};

/// Store that keeps every accepted item in memory and never sheds load.
///
/// Used for dry runs and tests. Items are keyed by primary key per table, so
/// a repeated put replaces the earlier one.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<HashMap<String, BTreeMap<String, Item>>>,
    calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `batch_write` calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of distinct items stored in `table`.
    pub async fn item_count(&self, table: &str) -> usize {
        self.tables.lock().await.get(table).map_or(0, BTreeMap::len)
    }

    pub async fn get(&self, table: &str, key: &str) -> Option<Item> {
        self.tables.lock().await.get(table)?.get(key).cloned()
    }
}

#[async_trait]
impl BatchWriteStore for InMemoryStore {
    async fn batch_write(&self, request_items: RequestItems) -> Result<RequestItems> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        // a rejected call must leave every table untouched
        if request_items
            .values()
            .flatten()
            .any(|request| request.primary_key().is_none())
        {
            return Err(SeederError::Store("item is missing its primary key".to_string()));
        }

        let mut tables = self.tables.lock().await;
        for (table, requests) in request_items {
            let rows = tables.entry(table).or_default();
            for request in requests {
                let key = request.primary_key().unwrap_or_default().to_string();
                match request {
                    WriteRequest::Put(item) => {
                        rows.insert(key, item);
                    }
                }
            }
        }

        Ok(RequestItems::new())
    }
}
