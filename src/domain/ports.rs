use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Capability to run a named listing operation against one service.
///
/// Implementations own transport, authentication and pagination. The
/// exporter calls `invoke` once per run and selector.
#[async_trait]
pub trait ResourceLister: Send + Sync {
    async fn invoke(&self, operation: &str) -> Result<serde_json::Value>;
}

pub trait ConfigProvider: Send + Sync {
    fn csv_dir(&self) -> &Path;
    fn zip_dir(&self) -> &Path;
    fn archive_name(&self) -> &str;
    fn concurrency(&self) -> usize;
    fn listing_timeout(&self) -> Duration;
}
