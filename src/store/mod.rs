// Bulk-write contract of the destination store
pub mod dynamo;
pub mod memory;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::batch::WriteRequest;
use crate::Result;

/// Write requests grouped by destination table.
pub type RequestItems = HashMap<String, Vec<WriteRequest>>;

/// A store accepting bounded bulk writes.
///
/// The store may decline any subset of a call under load; those requests are
/// returned, in the same shape as submitted, as the unprocessed items. An
/// `Err` means the whole call failed.
#[async_trait]
pub trait BatchWriteStore: Send + Sync {
    async fn batch_write(&self, request_items: RequestItems) -> Result<RequestItems>;
}

pub use dynamo::DynamoStore;
pub use memory::InMemoryStore;
