//! Invocation entry point.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::config::SeedConfig;
use crate::outcome::WriteOutcome;
use crate::scheduler::WriteScheduler;
use crate::store::BatchWriteStore;

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 500;

pub const SUCCESS_MESSAGE: &str = "Items successfully written to DynamoDB";
pub const FAILURE_MESSAGE: &str = "Error writing items to DynamoDB";

/// Two-valued result returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status: u16,
    #[serde(rename = "body")]
    pub message: String,
}

impl InvocationResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

impl From<&WriteOutcome> for InvocationResponse {
    fn from(outcome: &WriteOutcome) -> Self {
        match outcome {
            WriteOutcome::Success(_) => Self {
                status: STATUS_OK,
                message: SUCCESS_MESSAGE.to_string(),
            },
            WriteOutcome::Failure { .. } => Self {
                status: STATUS_ERROR,
                message: FAILURE_MESSAGE.to_string(),
            },
        }
    }
}

/// Seeds the configured table once. `event` and `context` are accepted for
/// the invocation contract and otherwise ignored.
pub async fn handle(
    _event: Value,
    _context: Value,
    config: SeedConfig,
    store: Arc<dyn BatchWriteStore>,
) -> InvocationResponse {
    info!("seeding invocation started for table [{}]", config.table_name);

    let scheduler = WriteScheduler::new(config, store);
    let outcome = scheduler.run().await;

    if let Some(e) = outcome.error() {
        error!("Error writing items to DynamoDB: {}", e);
    }

    InvocationResponse::from(&outcome)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::InMemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_handle_success() {
        let store = Arc::new(InMemoryStore::new());
        let config = SeedConfig::builder().table_name("users").total_records(60).build();

        let response = handle(json!({}), Value::Null, config, store.clone()).await;

        assert!(response.is_success());
        assert_eq!(response.message, SUCCESS_MESSAGE);
        assert_eq!(store.item_count("users").await, 60);
        assert_eq!(store.call_count(), 3);
    }

    #[tokio::test]
    async fn test_handle_failure() {
        let store = Arc::new(InMemoryStore::new());
        let config = SeedConfig::builder().table_name("users").batch_size(0).build();

        let response = handle(Value::Null, Value::Null, config, store).await;

        assert_eq!(response.status, STATUS_ERROR);
        assert_eq!(response.message, FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_handle_invalid_config_terminates() {
        let store = Arc::new(InMemoryStore::new());
        let config = SeedConfig::builder().table_name("users").max_in_flight(0).build();

        let response = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            handle(Value::Null, Value::Null, config, store.clone()),
        )
        .await
        .expect("invocation must terminate");

        assert_eq!(response.status, STATUS_ERROR);
        assert_eq!(store.call_count(), 0);
    }

    #[test]
    fn test_response_wire_shape() {
        let response = InvocationResponse {
            status: STATUS_OK,
            message: SUCCESS_MESSAGE.to_string(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"statusCode": 200, "body": "Items successfully written to DynamoDB"})
        );
    }
}
