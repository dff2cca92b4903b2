use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Value written in place of a missing or non-scalar attribute.
pub const MISSING_VALUE: &str = "N/A";

/// How to list one service and which attributes become CSV columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub service_key: String,
    pub listing_operation: String,
    pub response_collection_key: String,
    /// Column order of the exported file.
    pub attributes: Vec<String>,
}

impl ServiceDescriptor {
    pub fn new(
        service_key: &str,
        listing_operation: &str,
        response_collection_key: &str,
        attributes: &[&str],
    ) -> Self {
        Self {
            service_key: service_key.to_string(),
            listing_operation: listing_operation.to_string(),
            response_collection_key: response_collection_key.to_string(),
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorEntry {
    pub selector: String,
    pub base_filename: String,
    pub service_key: String,
}

impl SelectorEntry {
    pub fn new(selector: &str, base_filename: &str, service_key: &str) -> Self {
        Self {
            selector: selector.to_string(),
            base_filename: base_filename.to_string(),
            service_key: service_key.to_string(),
        }
    }
}

/// One item of a listing response. No schema is guaranteed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub data: HashMap<String, serde_json::Value>,
}

impl From<serde_json::Map<String, serde_json::Value>> for RawRecord {
    fn from(obj: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            data: obj.into_iter().collect(),
        }
    }
}

/// Field values in attribute order.
pub type ProjectedRow = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub selector: String,
    pub path: PathBuf,
    pub row_count: usize,
}

impl ExportArtifact {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorStatus {
    Exported(ExportArtifact),
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOutcome {
    pub selector: String,
    pub service_key: String,
    pub status: SelectorStatus,
}

impl SelectorOutcome {
    pub fn artifact(&self) -> Option<&ExportArtifact> {
        match &self.status {
            SelectorStatus::Exported(artifact) => Some(artifact),
            SelectorStatus::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SelectorStatus::Failed { .. })
    }
}

/// Result of a complete run, in selector resolution order.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcomes: Vec<SelectorOutcome>,
    pub archive_path: PathBuf,
}

impl RunReport {
    pub fn artifacts(&self) -> impl Iterator<Item = &ExportArtifact> {
        self.outcomes.iter().filter_map(SelectorOutcome::artifact)
    }

    pub fn failures(&self) -> impl Iterator<Item = &SelectorOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(SelectorOutcome::is_failed)
    }

    pub fn total_rows(&self) -> usize {
        self.artifacts().map(|a| a.row_count).sum()
    }

    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        out.push_str("Exported Resources:\n");
        out.push_str("====================\n\n");
        out.push_str(&format!(
            "{:<10} {:<16} {:<8} {:>6}  {}\n",
            "Selector", "Service", "Status", "Rows", "Exported File"
        ));
        out.push_str(&"-".repeat(80));
        out.push('\n');

        for outcome in &self.outcomes {
            match &outcome.status {
                SelectorStatus::Exported(artifact) => out.push_str(&format!(
                    "{:<10} {:<16} {:<8} {:>6}  {}\n",
                    outcome.selector,
                    outcome.service_key,
                    "OK",
                    artifact.row_count,
                    artifact.path.display()
                )),
                SelectorStatus::Failed { reason } => out.push_str(&format!(
                    "{:<10} {:<16} {:<8} {:>6}  {}\n",
                    outcome.selector, outcome.service_key, "FAILED", "-", reason
                )),
            }
        }

        out.push_str(&format!(
            "\nAll files compressed at : {}\n",
            self.archive_path.display()
        ));
        out
    }
}
