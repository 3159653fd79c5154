//! # dynamo-seeder
//!
//! `dynamo-seeder` fills a DynamoDB table with synthetic user records using
//! concurrent `BatchWriteItem` calls.
//!
//! ## Features
//!
//! - Splits a fixed record count into batches of at most 25 put requests.
//! - Applies every batch on its own task, optionally bounded in number.
//! - Resubmits unprocessed items until the store accepts them, with an
//!   optional round cap and inter-round delay.
//! - Reports a single success/failure for the run.
//!
//! ## Usage
//!
//! 1. Build a [`SeedConfig`], or load it with [`SeedConfig::from_env`].
//! 2. Pick a store: [`store::DynamoStore`] or, for dry runs, [`store::InMemoryStore`].
//! 3. Call [`handler::handle`], or drive a [`scheduler::WriteScheduler`] directly.
//!
//! ### Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use anyhow::Result;
//! use dynamo_seeder::{SeedConfig, WriteScheduler};
//! use dynamo_seeder::store::DynamoStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = SeedConfig::builder()
//!         .table_name("users")
//!         .total_records(10_000)
//!         .build();
//!     config.validate()?;
//!
//!     let store = Arc::new(DynamoStore::from_env().await);
//!     let outcome = WriteScheduler::new(config, store).run().await;
//!     println!("success: {}", outcome.is_success());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - `batch`: record generation and index-range partitioning.
//! - `store`: the bulk-write contract and its DynamoDB and in-memory implementations.
//! - `driver`: applies one batch, resubmitting unprocessed items.
//! - `scheduler`: fans batches out to tasks and aggregates the outcome.
//! - `handler`: the invocation entry point.

pub mod batch;
pub mod config;
pub mod driver;
pub mod error;
pub mod handler;
pub mod outcome;
pub mod scheduler;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::{RetryPolicy, SeedConfig};
pub use error::{Result, SeederError};
pub use outcome::{RunSummary, WriteOutcome};
pub use scheduler::WriteScheduler;
