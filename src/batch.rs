//! Record generation and partitioning of the record space into write batches.

use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

/// Attribute holding the primary key of every generated record.
pub const PRIMARY_KEY_ATTRIBUTE: &str = "user_id";
/// Attribute holding the nested placeholder payload.
pub const METADATA_ATTRIBUTE: &str = "metadata";
/// Upper bound on write requests per bulk-write call imposed by DynamoDB.
pub const MAX_BATCH_WRITE_ITEMS: usize = 25;

/// Typed attribute value, limited to the shapes the record format uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// String value
    S(String),
    /// Nested attribute map
    M(BTreeMap<String, AttributeValue>),
}

/// A single item: attribute name to value.
pub type Item = BTreeMap<String, AttributeValue>;

/// One write operation inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteRequest {
    /// Insert-or-replace of a full item.
    Put(Item),
}

impl WriteRequest {
    /// Primary key of the item this request writes, if it carries one.
    pub fn primary_key(&self) -> Option<&str> {
        match self {
            WriteRequest::Put(item) => match item.get(PRIMARY_KEY_ATTRIBUTE) {
                Some(AttributeValue::S(key)) => Some(key.as_str()),
                _ => None,
            },
        }
    }
}

/// Ordered group of write requests submitted together.
///
/// A batch built by [`build_batch`] is never empty and never repeats a
/// primary key. The driver shrinks it to the unprocessed subset between
/// rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    requests: Vec<WriteRequest>,
}

impl Batch {
    pub fn new(requests: Vec<WriteRequest>) -> Self {
        Self { requests }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[WriteRequest] {
        &self.requests
    }

    pub fn into_requests(self) -> Vec<WriteRequest> {
        self.requests
    }

    /// Primary keys in submission order.
    pub fn keys(&self) -> Vec<&str> {
        self.requests.iter().filter_map(WriteRequest::primary_key).collect()
    }

    /// True when no two requests share a primary key.
    pub fn has_unique_keys(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.requests.len());
        self.requests
            .iter()
            .filter_map(WriteRequest::primary_key)
            .all(|key| seen.insert(key))
    }
}

/// Builds the synthetic record for one index.
pub fn generate_item(index: usize) -> Item {
    let mut metadata = BTreeMap::new();
    metadata.insert("first_name".to_string(), AttributeValue::S("John".to_string()));

    let mut item = Item::new();
    item.insert(PRIMARY_KEY_ATTRIBUTE.to_string(), AttributeValue::S(index.to_string()));
    item.insert(METADATA_ATTRIBUTE.to_string(), AttributeValue::M(metadata));
    item
}

/// Builds one put request per index in the half-open range.
pub fn build_batch(range: Range<usize>) -> Batch {
    Batch::new(range.map(|i| WriteRequest::Put(generate_item(i))).collect())
}

/// Number of batches needed to cover `total_records`.
pub fn batch_count(total_records: usize, batch_size: usize) -> usize {
    total_records.div_ceil(batch_size)
}

/// Splits `[0, total_records)` into consecutive ranges of at most `batch_size`.
///
/// `batch_size` must be non-zero.
pub fn batch_ranges(total_records: usize, batch_size: usize) -> impl Iterator<Item = Range<usize>> {
    (0..batch_count(total_records, batch_size)).map(move |i| {
        let start = i * batch_size;
        start..(start + batch_size).min(total_records)
    })
}
