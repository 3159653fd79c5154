use std::sync::Arc;

use tracing::{debug, warn};

use crate::batch::Batch;
use crate::config::RetryPolicy;
use crate::store::{BatchWriteStore, RequestItems};
use crate::{Result, SeederError};

/// What it took to get one batch accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverReport {
    /// Items in the batch as first submitted
    pub items: usize,
    /// Bulk-write calls made, including the first one
    pub rounds: u32,
}

///
/// # Batch-write driver
///
/// Applies one batch to the store. Items the store leaves unprocessed are
/// resubmitted, and only those, until the store has accepted everything.
/// Store errors are never retried here.
///
#[derive(Clone)]
pub struct BatchWriteDriver {
    store: Arc<dyn BatchWriteStore>,
    table_name: String,
    retry: RetryPolicy,
}

impl BatchWriteDriver {
    pub fn new(store: Arc<dyn BatchWriteStore>, table_name: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            store,
            table_name: table_name.into(),
            retry,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub async fn apply(&self, batch: Batch) -> Result<DriverReport> {
        let items = batch.len();
        let mut current = batch;
        let mut rounds = 0u32;

        while !current.is_empty() {
            rounds = rounds.saturating_add(1);

            let mut request_items = RequestItems::with_capacity(1);
            request_items.insert(self.table_name.clone(), current.into_requests());

            let mut unprocessed = self.store.batch_write(request_items).await?;
            let remaining = unprocessed.remove(&self.table_name).unwrap_or_default();

            if !unprocessed.is_empty() {
                warn!(
                    "store returned unprocessed items for tables that were not written: {:?}",
                    unprocessed.keys().collect::<Vec<_>>()
                );
            }

            if remaining.is_empty() {
                break;
            }

            if !self.retry.allows_round(rounds) {
                return Err(SeederError::RetriesExhausted {
                    rounds,
                    remaining: remaining.len(),
                });
            }

            debug!(
                "round {}: {} of {} items unprocessed for table [{}], resubmitting",
                rounds,
                remaining.len(),
                items,
                self.table_name
            );

            if !self.retry.round_delay.is_zero() {
                tokio::time::sleep(self.retry.round_delay).await;
            }

            current = Batch::new(remaining);
        }

        Ok(DriverReport { items, rounds })
    }
}
