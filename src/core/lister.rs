use crate::domain::model::{RawRecord, ServiceDescriptor};
use crate::domain::ports::ResourceLister;
use crate::utils::error::{ExportError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Listers keyed by service key.
#[derive(Clone, Default)]
pub struct ListerSet {
    listers: HashMap<String, Arc<dyn ResourceLister>>,
}

impl ListerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, service_key: impl Into<String>, lister: Arc<dyn ResourceLister>) {
        self.listers.insert(service_key.into(), lister);
    }

    pub fn with(mut self, service_key: impl Into<String>, lister: Arc<dyn ResourceLister>) -> Self {
        self.insert(service_key, lister);
        self
    }

    pub fn get(&self, service_key: &str) -> Option<Arc<dyn ResourceLister>> {
        self.listers.get(service_key).cloned()
    }
}

/// Run the descriptor's listing operation and pull out its collection.
///
/// Every failure, including a response of the wrong shape, is reported as
/// `ListingFailed` for the descriptor's service.
pub async fn list_resources(
    lister: &dyn ResourceLister,
    descriptor: &ServiceDescriptor,
) -> Result<Vec<RawRecord>> {
    let service = descriptor.service_key.as_str();

    tracing::debug!(
        "Invoking {}.{} (collection '{}')",
        service,
        descriptor.listing_operation,
        descriptor.response_collection_key
    );

    let response = lister
        .invoke(&descriptor.listing_operation)
        .await
        .map_err(|e| match e {
            ExportError::ListingFailed { .. } => e,
            other => ExportError::listing_failed(service, other),
        })?;

    extract_collection(service, response, &descriptor.response_collection_key)
}

fn extract_collection(
    service: &str,
    response: serde_json::Value,
    collection_key: &str,
) -> Result<Vec<RawRecord>> {
    let serde_json::Value::Object(mut body) = response else {
        return Err(ExportError::listing_failed(
            service,
            "response is not a JSON object",
        ));
    };

    let collection = body.remove(collection_key).ok_or_else(|| {
        ExportError::listing_failed(
            service,
            format!("response has no '{}' collection", collection_key),
        )
    })?;

    let serde_json::Value::Array(items) = collection else {
        return Err(ExportError::listing_failed(
            service,
            format!("'{}' is not an array", collection_key),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            serde_json::Value::Object(obj) => Ok(RawRecord::from(obj)),
            _ => Err(ExportError::listing_failed(
                service,
                format!("item {} of '{}' is not an object", index, collection_key),
            )),
        })
        .collect()
}
