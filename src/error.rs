//! Custom error types for the DynamoDB seeder.

use thiserror::Error;

/// Custom error type for seeding operations.
#[derive(Error, Debug)]
pub enum SeederError {
    /// The store rejected or failed a bulk-write call outright.
    #[error("Store error: {0}")]
    Store(String),

    /// A request or response could not be mapped between the store and the crate.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Config error.
    #[error("Config error: {0}")]
    Config(String),

    /// The configured round cap was reached with items still unprocessed.
    #[error("Retries exhausted after {rounds} rounds with {remaining} items unprocessed")]
    RetriesExhausted { rounds: u32, remaining: usize },

    /// A worker task panicked or was cancelled before reporting.
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The run did not finish before its deadline.
    #[error("Deadline of {0:?} exceeded")]
    DeadlineExceeded(std::time::Duration),
}

/// A specialized `Result` type for seeding operations.
pub type Result<T> = std::result::Result<T, SeederError>;
