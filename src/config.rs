//! Seeding configuration and environment loading.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use typed_builder::TypedBuilder;

use crate::batch::MAX_BATCH_WRITE_ITEMS;
use crate::{Result, SeederError};

pub const ENV_TABLE_NAME: &str = "DYNAMODB_TABLE_NAME";
pub const ENV_TOTAL_RECORDS: &str = "SEED_TOTAL_RECORDS";
pub const ENV_BATCH_SIZE: &str = "SEED_BATCH_SIZE";
pub const ENV_MAX_IN_FLIGHT: &str = "SEED_MAX_IN_FLIGHT";
pub const ENV_MAX_ROUNDS: &str = "SEED_MAX_ROUNDS";
pub const ENV_ROUND_DELAY_MS: &str = "SEED_ROUND_DELAY_MS";
pub const ENV_DEADLINE_SECS: &str = "SEED_DEADLINE_SECS";
pub const ENV_DRY_RUN: &str = "SEED_DRY_RUN";

pub const DEFAULT_TOTAL_RECORDS: usize = 10_000;
pub const DEFAULT_BATCH_SIZE: usize = MAX_BATCH_WRITE_ITEMS;

/// How the driver treats unprocessed items.
///
/// The default resubmits immediately and never gives up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of submissions per batch, `None` for no cap.
    pub max_rounds: Option<u32>,
    /// Pause before each resubmission.
    pub round_delay: Duration,
}

impl RetryPolicy {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn bounded(max_rounds: u32, round_delay: Duration) -> Self {
        Self {
            max_rounds: Some(max_rounds),
            round_delay,
        }
    }

    /// Whether another submission is allowed after `rounds` have been made.
    pub fn allows_round(&self, rounds: u32) -> bool {
        self.max_rounds.is_none_or(|max| rounds < max)
    }
}

#[derive(TypedBuilder, Debug, Clone)]
pub struct SeedConfig {
    /// Destination table
    #[builder(setter(into))]
    pub table_name: String,

    /// Number of records generated for the run
    #[builder(default = DEFAULT_TOTAL_RECORDS)]
    pub total_records: usize,

    /// Write requests per batch
    #[builder(default = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Upper bound on batches in flight, unbounded when unset
    #[builder(default, setter(strip_option))]
    pub max_in_flight: Option<usize>,

    #[builder(default)]
    pub retry: RetryPolicy,

    /// Overall time limit for a run
    #[builder(default, setter(strip_option))]
    pub deadline: Option<Duration>,

    /// Write to the in-memory store instead of DynamoDB
    #[builder(default)]
    pub dry_run: bool,
}

impl SeedConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Loads the configuration from a set of environment-style variables.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let table_name = vars
            .get(ENV_TABLE_NAME)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SeederError::Config(format!("{} must be set", ENV_TABLE_NAME)))?;

        let retry = RetryPolicy {
            max_rounds: parse_var(vars, ENV_MAX_ROUNDS)?,
            round_delay: Duration::from_millis(parse_var(vars, ENV_ROUND_DELAY_MS)?.unwrap_or(0)),
        };

        let config = SeedConfig {
            table_name,
            total_records: parse_var(vars, ENV_TOTAL_RECORDS)?.unwrap_or(DEFAULT_TOTAL_RECORDS),
            batch_size: parse_var(vars, ENV_BATCH_SIZE)?.unwrap_or(DEFAULT_BATCH_SIZE),
            max_in_flight: parse_var(vars, ENV_MAX_IN_FLIGHT)?,
            retry,
            deadline: parse_var(vars, ENV_DEADLINE_SECS)?.map(Duration::from_secs),
            dry_run: parse_flag(vars, ENV_DRY_RUN)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.table_name.is_empty() {
            return Err(SeederError::Config("table name cannot be empty".to_string()));
        }
        validate_batch_size(self.batch_size)?;
        if self.max_in_flight == Some(0) {
            return Err(SeederError::Config("max in-flight batches must be at least 1".to_string()));
        }
        if self.retry.max_rounds == Some(0) {
            return Err(SeederError::Config("max rounds must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Checks a batch size against the per-call ceiling of the store.
pub fn validate_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 || batch_size > MAX_BATCH_WRITE_ITEMS {
        return Err(SeederError::Config(format!(
            "batch size must be between 1 and {}, got {}",
            MAX_BATCH_WRITE_ITEMS, batch_size
        )));
    }
    Ok(())
}

fn parse_var<T>(vars: &HashMap<String, String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| SeederError::Config(format!("invalid {}={}: {}", name, value, e))),
    }
}

fn parse_flag(vars: &HashMap<String, String>, name: &str) -> Result<bool> {
    match vars.get(name).map(|v| v.trim().to_lowercase()) {
        None => Ok(false),
        Some(value) => match value.as_str() {
            "" | "0" | "false" | "no" => Ok(false),
            "1" | "true" | "yes" => Ok(true),
            _ => Err(SeederError::Config(format!(
                "invalid {}={}: expected 'true', 'false', '1', or '0'",
                name, value
            ))),
        },
    }
}
