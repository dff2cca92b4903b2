use crate::core::lister::ListerSet;
use crate::core::registry::Registry;
use crate::domain::ports::ResourceLister;
use crate::utils::error::{ExportError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Lists resources through an HTTP gateway.
///
/// `invoke("list_buckets")` for service `s3` issues
/// `GET {endpoint}/s3/list_buckets` and expects the raw JSON response body.
pub struct HttpLister {
    client: Client,
    endpoint: String,
    service_key: String,
    headers: Arc<HashMap<String, String>>,
}

impl HttpLister {
    pub fn new(
        client: Client,
        endpoint: &str,
        service_key: &str,
        headers: Arc<HashMap<String, String>>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            headers,
        }
    }

    fn operation_url(&self, operation: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.service_key, operation)
    }
}

#[async_trait]
impl ResourceLister for HttpLister {
    async fn invoke(&self, operation: &str) -> Result<serde_json::Value> {
        let url = self.operation_url(operation);
        tracing::debug!("Making API request to: {}", url);

        let mut request = self.client.get(&url);
        for (key, value) in self.headers.iter() {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(ExportError::listing_failed(
                &self.service_key,
                format!("HTTP {} from {}", response.status(), url),
            ));
        }

        Ok(response.json().await?)
    }
}

/// One `HttpLister` per registered service, sharing a single client.
pub fn http_listers(
    registry: &Registry,
    endpoint: &str,
    headers: HashMap<String, String>,
    timeout: Duration,
) -> Result<ListerSet> {
    let client = Client::builder().timeout(timeout).build()?;
    let headers = Arc::new(headers);

    let mut listers = ListerSet::new();
    for service in registry.services() {
        listers.insert(
            service.service_key.clone(),
            Arc::new(HttpLister::new(
                client.clone(),
                endpoint,
                &service.service_key,
                Arc::clone(&headers),
            )),
        );
    }
    Ok(listers)
}
