pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{toml_config::ExporterConfig, CliArgs};
pub use core::{
    lister::ListerSet,
    orchestrator::{ExportContext, Exporter},
    registry::Registry,
};
pub use domain::model::{RunReport, SelectorOutcome, SelectorStatus};
pub use domain::ports::ResourceLister;
pub use utils::error::{ExportError, Result};
