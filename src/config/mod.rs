pub mod defaults;
pub mod toml_config;

use clap::Parser;
use std::path::PathBuf;
use toml_config::ExporterConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "inventory-exporter")]
#[command(about = "Export cloud resource inventories to CSV files bundled in a zip archive")]
#[command(after_help = "Options go before selectors. Selectors: -lb -sf -eb -s3 -ds -gl, or -all (the default). Use --list to show the registry.")]
pub struct CliArgs {
    /// Selectors to export; -all or none exports every registered selector
    #[arg(value_name = "SELECTOR", allow_hyphen_values = true)]
    pub selectors: Vec<String>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the HTTP resource lister
    #[arg(long, conflicts_with = "fixtures")]
    pub endpoint: Option<String>,

    /// Directory of recorded listing responses ({service}/{operation}.json)
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    #[arg(long)]
    pub csv_dir: Option<PathBuf>,

    #[arg(long)]
    pub zip_dir: Option<PathBuf>,

    #[arg(long)]
    pub archive_name: Option<String>,

    /// Maximum number of selectors exported at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Timeout for a single listing call
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Exit with status 2 when any selector failed
    #[arg(long)]
    pub fail_on_error: bool,

    /// Print the registered selectors and exit
    #[arg(long)]
    pub list: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CliArgs {
    /// Command-line options take precedence over the configuration file.
    pub fn apply_to(&self, config: &mut ExporterConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.lister.endpoint = Some(endpoint.clone());
            config.lister.fixtures_dir = None;
        }
        if let Some(dir) = &self.fixtures {
            config.lister.fixtures_dir = Some(dir.clone());
            config.lister.endpoint = None;
        }
        if let Some(dir) = &self.csv_dir {
            config.output.csv_dir = dir.clone();
        }
        if let Some(dir) = &self.zip_dir {
            config.output.zip_dir = dir.clone();
        }
        if let Some(name) = &self.archive_name {
            config.output.archive_name = name.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.lister.concurrency = Some(concurrency);
        }
        if let Some(timeout) = self.timeout_seconds {
            config.lister.timeout_seconds = Some(timeout);
        }
    }
}
