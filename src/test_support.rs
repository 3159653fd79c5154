// Store doubles shared by the unit tests
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::batch::WriteRequest;
use crate::store::{BatchWriteStore, RequestItems};
use crate::{Result, SeederError};

fn keys(requests: &[WriteRequest]) -> Vec<String> {
    requests
        .iter()
        .filter_map(|r| r.primary_key().map(str::to_string))
        .collect()
}

/// Which requests of a submission a [`ScriptedStore`] sends back.
#[derive(Clone, Copy)]
pub(crate) enum Rejection {
    /// The trailing half, rounded up
    TrailingHalf,
    /// Every request at an even position
    EvenPositions,
}

/// Rejects part of every submission until the `accept_on_call`-th call,
/// which accepts everything.
pub(crate) struct ScriptedStore {
    accept_on_call: usize,
    rejection: Rejection,
    pub submissions: Mutex<Vec<Vec<String>>>,
    pub rejections: Mutex<Vec<Vec<String>>>,
}

impl ScriptedStore {
    pub fn new(accept_on_call: usize) -> Self {
        Self::with_rejection(accept_on_call, Rejection::TrailingHalf)
    }

    pub fn with_rejection(accept_on_call: usize, rejection: Rejection) -> Self {
        Self {
            accept_on_call,
            rejection,
            submissions: Mutex::new(Vec::new()),
            rejections: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl BatchWriteStore for ScriptedStore {
    async fn batch_write(&self, request_items: RequestItems) -> Result<RequestItems> {
        let mut unprocessed = RequestItems::new();
        let mut submissions = self.submissions.lock().unwrap();
        let call = submissions.len() + 1;

        for (table, mut requests) in request_items {
            submissions.push(keys(&requests));
            if call < self.accept_on_call {
                let rejected: Vec<WriteRequest> = match self.rejection {
                    Rejection::TrailingHalf => {
                        let keep = requests.len() / 2;
                        requests.split_off(keep)
                    }
                    Rejection::EvenPositions => requests.into_iter().step_by(2).collect(),
                };
                self.rejections.lock().unwrap().push(keys(&rejected));
                unprocessed.insert(table, rejected);
            }
        }

        Ok(unprocessed)
    }
}

/// Accepts nothing, ever.
#[derive(Default)]
pub(crate) struct ThrottlingStore {
    pub calls: AtomicUsize,
}

#[async_trait]
impl BatchWriteStore for ThrottlingStore {
    async fn batch_write(&self, request_items: RequestItems) -> Result<RequestItems> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(request_items)
    }
}

/// Fails any call carrying one of `fail_keys`, or every call when empty.
#[derive(Default)]
pub(crate) struct FailingStore {
    fail_keys: HashSet<String>,
    pub calls: AtomicUsize,
}

impl FailingStore {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn on_key(key: &str) -> Self {
        Self {
            fail_keys: HashSet::from([key.to_string()]),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BatchWriteStore for FailingStore {
    async fn batch_write(&self, request_items: RequestItems) -> Result<RequestItems> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let hit = self.fail_keys.is_empty()
            || request_items
                .values()
                .flat_map(|requests| requests.iter().filter_map(WriteRequest::primary_key))
                .any(|key| self.fail_keys.contains(key));

        if hit {
            return Err(SeederError::Store(
                "ProvisionedThroughputExceededException: rate of requests exceeds the allowed throughput".to_string(),
            ));
        }
        Ok(RequestItems::new())
    }
}

/// Accepts everything after `delay`, tracking how many calls overlap.
pub(crate) struct SlowStore {
    delay: Duration,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BatchWriteStore for SlowStore {
    async fn batch_write(&self, _request_items: RequestItems) -> Result<RequestItems> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(RequestItems::new())
    }
}
