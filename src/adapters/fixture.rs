use crate::core::lister::ListerSet;
use crate::core::registry::Registry;
use crate::domain::ports::ResourceLister;
use crate::utils::error::{ExportError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Serves recorded responses from `{dir}/{service_key}/{operation}.json`.
pub struct FixtureLister {
    dir: PathBuf,
    service_key: String,
}

impl FixtureLister {
    pub fn new(dir: &Path, service_key: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            service_key: service_key.to_string(),
        }
    }

    fn fixture_path(&self, operation: &str) -> PathBuf {
        self.dir
            .join(&self.service_key)
            .join(format!("{}.json", operation))
    }
}

#[async_trait]
impl ResourceLister for FixtureLister {
    async fn invoke(&self, operation: &str) -> Result<serde_json::Value> {
        let path = self.fixture_path(operation);
        tracing::debug!("Reading fixture {}", path.display());

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            ExportError::listing_failed(
                &self.service_key,
                format!("cannot read {}: {}", path.display(), e),
            )
        })?;

        Ok(serde_json::from_str(&content)?)
    }
}

pub fn fixture_listers(registry: &Registry, dir: &Path) -> ListerSet {
    let mut listers = ListerSet::new();
    for service in registry.services() {
        listers.insert(
            service.service_key.clone(),
            Arc::new(FixtureLister::new(dir, &service.service_key)),
        );
    }
    listers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_fixture_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("glue")).unwrap();
        std::fs::write(
            dir.path().join("glue").join("get_jobs.json"),
            r#"{"Jobs": [{"Name": "nightly", "MaxRetries": 1}]}"#,
        )
        .unwrap();

        let body = FixtureLister::new(dir.path(), "glue")
            .invoke("get_jobs")
            .await
            .unwrap();
        assert_eq!(body["Jobs"][0]["MaxRetries"], 1);
    }

    #[test]
    fn test_missing_fixture_is_listing_failure() {
        let dir = tempfile::tempdir().unwrap();
        let lister = FixtureLister::new(dir.path(), "dms");

        let err = tokio_test::block_on(lister.invoke("describe_replication_tasks")).unwrap_err();
        assert!(matches!(err, ExportError::ListingFailed { ref service, .. } if service == "dms"));
    }
}
