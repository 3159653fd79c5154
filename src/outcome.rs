use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::SeederError;

/// Counters gathered over one scheduler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// Batches the record space was split into
    pub batches: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Items belonging to fully accepted batches
    pub items_written: usize,
    /// Bulk-write calls made by fully accepted batches
    pub rounds: u64,
}

impl RunSummary {
    pub(crate) fn new(started_at: DateTime<Utc>, batches: usize) -> Self {
        Self {
            started_at,
            elapsed: Duration::ZERO,
            batches,
            succeeded: 0,
            failed: 0,
            items_written: 0,
            rounds: 0,
        }
    }
}

/// Aggregate result of a run: every batch written, or at least one failed.
#[derive(Debug)]
pub enum WriteOutcome {
    Success(RunSummary),
    /// Keeps the first failure; batches already written stay written.
    Failure { error: SeederError, summary: RunSummary },
}

impl WriteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WriteOutcome::Success(_))
    }

    pub fn summary(&self) -> &RunSummary {
        match self {
            WriteOutcome::Success(summary) => summary,
            WriteOutcome::Failure { summary, .. } => summary,
        }
    }

    pub fn error(&self) -> Option<&SeederError> {
        match self {
            WriteOutcome::Success(_) => None,
            WriteOutcome::Failure { error, .. } => Some(error),
        }
    }
}
