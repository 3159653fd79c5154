use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::batch::{batch_count, batch_ranges, build_batch};
use crate::config::{validate_batch_size, SeedConfig};
use crate::driver::{BatchWriteDriver, DriverReport};
use crate::outcome::{RunSummary, WriteOutcome};
use crate::store::BatchWriteStore;
use crate::{Result, SeederError};

///
/// # Write scheduler
///
/// Splits the record space into disjoint index ranges, builds one batch per
/// range and applies every batch on its own task. All tasks are joined before
/// the run outcome is decided.
///
pub struct WriteScheduler {
    config: SeedConfig,
    driver: BatchWriteDriver,
}

impl WriteScheduler {
    pub fn new(config: SeedConfig, store: Arc<dyn BatchWriteStore>) -> Self {
        let driver = BatchWriteDriver::new(store, config.table_name.clone(), config.retry.clone());
        Self { config, driver }
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Writes the configured record count with the configured batch size.
    pub async fn run(&self) -> WriteOutcome {
        self.run_with(self.config.total_records, self.config.batch_size).await
    }

    pub async fn run_with(&self, total_records: usize, batch_size: usize) -> WriteOutcome {
        let started_at = Utc::now();
        let start = Instant::now();

        if let Err(error) = self.config.validate().and_then(|_| validate_batch_size(batch_size)) {
            error!("refusing to start run: {}", error);
            return WriteOutcome::Failure {
                error,
                summary: RunSummary::new(started_at, 0),
            };
        }

        let batches = batch_count(total_records, batch_size);
        info!(
            "writing {} records to table [{}] in {} batches of up to {}",
            total_records,
            self.driver.table_name(),
            batches,
            batch_size
        );

        let permits = self.config.max_in_flight.map(|n| Arc::new(Semaphore::new(n)));
        let handles: Vec<JoinHandle<Result<DriverReport>>> = batch_ranges(total_records, batch_size)
            .map(|range| {
                let batch = build_batch(range);
                let driver = self.driver.clone();
                let permits = permits.clone();
                tokio::spawn(async move {
                    let _permit = match permits {
                        Some(permits) => permits.acquire_owned().await.ok(),
                        None => None,
                    };
                    driver.apply(batch).await
                })
            })
            .collect();

        let abort_handles: Vec<_> = handles.iter().map(JoinHandle::abort_handle).collect();
        let joined = match self.config.deadline {
            None => join_all(handles).await,
            Some(deadline) => match tokio::time::timeout(deadline, join_all(handles)).await {
                Ok(results) => results,
                Err(_) => {
                    abort_handles.iter().for_each(|handle| handle.abort());
                    let mut summary = RunSummary::new(started_at, batches);
                    summary.elapsed = start.elapsed();
                    error!("run did not finish within {:?}, remaining batches aborted", deadline);
                    return WriteOutcome::Failure {
                        error: SeederError::DeadlineExceeded(deadline),
                        summary,
                    };
                }
            },
        };

        let mut summary = RunSummary::new(started_at, batches);
        let mut first_error = None;
        for (index, result) in joined.into_iter().enumerate() {
            match result.map_err(SeederError::from).and_then(|r| r) {
                Ok(report) => {
                    summary.succeeded += 1;
                    summary.items_written += report.items;
                    summary.rounds += u64::from(report.rounds);
                }
                Err(e) => {
                    error!("batch {} failed: {}", index, e);
                    summary.failed += 1;
                    first_error.get_or_insert(e);
                }
            }
        }
        summary.elapsed = start.elapsed();

        match first_error {
            None => {
                info!(
                    "wrote {} items in {} batches ({} bulk-write calls) in {:?}",
                    summary.items_written, summary.succeeded, summary.rounds, summary.elapsed
                );
                WriteOutcome::Success(summary)
            }
            Some(error) => {
                error!(
                    "{} of {} batches failed, {} items written",
                    summary.failed, summary.batches, summary.items_written
                );
                WriteOutcome::Failure { error, summary }
            }
        }
    }
}
