pub mod archive;
pub mod exporter;
pub mod lister;
pub mod naming;
pub mod orchestrator;
pub mod projector;
pub mod registry;

pub use crate::domain::model::{ExportArtifact, ProjectedRow, RawRecord, RunReport};
pub use crate::domain::ports::{ConfigProvider, ResourceLister};
pub use crate::utils::error::Result;
