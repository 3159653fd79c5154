use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeValue as SdkAttributeValue, PutRequest, WriteRequest as SdkWriteRequest,
};
use aws_sdk_dynamodb::Client;

use crate::batch::{AttributeValue, Item, WriteRequest};
use crate::store::{BatchWriteStore, RequestItems};
use crate::{Result, SeederError};

/// [`BatchWriteStore`] backed by DynamoDB `BatchWriteItem`.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient AWS configuration (env, profile, IMDS).
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl BatchWriteStore for DynamoStore {
    async fn batch_write(&self, request_items: RequestItems) -> Result<RequestItems> {
        let mut sdk_items = HashMap::with_capacity(request_items.len());
        for (table, requests) in request_items {
            let requests = requests
                .iter()
                .map(to_sdk_request)
                .collect::<Result<Vec<_>>>()?;
            sdk_items.insert(table, requests);
        }

        let output = self
            .client
            .batch_write_item()
            .set_request_items(Some(sdk_items))
            .send()
            .await
            .map_err(|e| SeederError::Store(DisplayErrorContext(&e).to_string()))?;

        let mut unprocessed = RequestItems::new();
        for (table, requests) in output.unprocessed_items.unwrap_or_default() {
            if requests.is_empty() {
                continue;
            }
            let requests = requests
                .into_iter()
                .map(from_sdk_request)
                .collect::<Result<Vec<_>>>()?;
            unprocessed.insert(table, requests);
        }

        Ok(unprocessed)
    }
}

pub(crate) fn to_sdk_value(value: &AttributeValue) -> SdkAttributeValue {
    match value {
        AttributeValue::S(s) => SdkAttributeValue::S(s.clone()),
        AttributeValue::M(map) => SdkAttributeValue::M(
            map.iter()
                .map(|(name, value)| (name.clone(), to_sdk_value(value)))
                .collect(),
        ),
    }
}

pub(crate) fn from_sdk_value(value: SdkAttributeValue) -> Result<AttributeValue> {
    match value {
        SdkAttributeValue::S(s) => Ok(AttributeValue::S(s)),
        SdkAttributeValue::M(map) => Ok(AttributeValue::M(from_sdk_item(map)?)),
        other => Err(SeederError::Conversion(format!(
            "unsupported attribute value: {:?}",
            other
        ))),
    }
}

fn from_sdk_item(item: HashMap<String, SdkAttributeValue>) -> Result<Item> {
    item.into_iter()
        .map(|(name, value)| Ok((name, from_sdk_value(value)?)))
        .collect::<Result<BTreeMap<_, _>>>()
}

pub(crate) fn to_sdk_request(request: &WriteRequest) -> Result<SdkWriteRequest> {
    match request {
        WriteRequest::Put(item) => {
            let put = PutRequest::builder()
                .set_item(Some(
                    item.iter()
                        .map(|(name, value)| (name.clone(), to_sdk_value(value)))
                        .collect(),
                ))
                .build()
                .map_err(|e| SeederError::Conversion(e.to_string()))?;
            Ok(SdkWriteRequest::builder().put_request(put).build())
        }
    }
}

pub(crate) fn from_sdk_request(request: SdkWriteRequest) -> Result<WriteRequest> {
    match request.put_request {
        Some(put) => Ok(WriteRequest::Put(from_sdk_item(put.item)?)),
        None => Err(SeederError::Conversion(
            "unprocessed item is not a put request".to_string(),
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::batch::generate_item;

    #[test]
    fn test_put_request_wire_shape() {
        let request = to_sdk_request(&WriteRequest::Put(generate_item(7))).unwrap();
        let item = &request.put_request.as_ref().unwrap().item;

        assert_eq!(item.get("user_id"), Some(&SdkAttributeValue::S("7".to_string())));
        let metadata = item.get("metadata").unwrap().as_m().unwrap();
        assert_eq!(metadata.get("first_name"), Some(&SdkAttributeValue::S("John".to_string())));
        assert!(request.delete_request.is_none());
    }

    #[test]
    fn test_unprocessed_request_maps_back() {
        let original = WriteRequest::Put(generate_item(3));
        let sdk = to_sdk_request(&original).unwrap();
        assert_eq!(from_sdk_request(sdk).unwrap(), original);
    }

    #[test]
    fn test_unsupported_value_rejected() {
        let result = from_sdk_value(SdkAttributeValue::Bool(true));
        assert!(matches!(result, Err(SeederError::Conversion(_))));
    }

    #[test]
    fn test_non_put_request_rejected() {
        let request = SdkWriteRequest::builder().build();
        assert!(matches!(from_sdk_request(request), Err(SeederError::Conversion(_))));
    }
}
