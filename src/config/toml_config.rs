use crate::config::defaults::{
    default_selectors, default_services, DEFAULT_ARCHIVE_NAME, DEFAULT_CONCURRENCY,
    DEFAULT_CSV_DIR, DEFAULT_TIMEOUT_SECONDS, DEFAULT_ZIP_DIR,
};
use crate::core::registry::Registry;
use crate::domain::model::{SelectorEntry, ServiceDescriptor};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{
    validate_file_stem, validate_path, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub lister: ListerConfig,
    /// Replaces the built-in services when non-empty.
    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,
    /// Replaces the built-in selectors when non-empty.
    #[serde(default)]
    pub selectors: Vec<SelectorEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,
    #[serde(default = "default_zip_dir")]
    pub zip_dir: PathBuf,
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
}

fn default_csv_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CSV_DIR)
}

fn default_zip_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ZIP_DIR)
}

fn default_archive_name() -> String {
    DEFAULT_ARCHIVE_NAME.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_dir: default_csv_dir(),
            zip_dir: default_zip_dir(),
            archive_name: default_archive_name(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListerConfig {
    pub endpoint: Option<String>,
    pub fixtures_dir: Option<PathBuf>,
    pub timeout_seconds: Option<u64>,
    pub concurrency: Option<usize>,
    pub headers: Option<HashMap<String, String>>,
}

/// Where listing responses come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListerSource<'a> {
    Http(&'a str),
    Fixtures(&'a Path),
}

impl ExporterConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` references with environment values; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExportError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn registry(&self) -> Result<Registry> {
        let services = if self.services.is_empty() {
            default_services()
        } else {
            self.services.clone()
        };
        let selectors = if self.selectors.is_empty() {
            default_selectors()
        } else {
            self.selectors.clone()
        };
        Registry::new(services, selectors)
    }

    pub fn lister_source(&self) -> Result<ListerSource<'_>> {
        match (&self.lister.endpoint, &self.lister.fixtures_dir) {
            (Some(_), Some(_)) => Err(ExportError::ConfigError {
                message: "lister.endpoint and lister.fixtures_dir are mutually exclusive"
                    .to_string(),
            }),
            (Some(endpoint), None) => Ok(ListerSource::Http(endpoint)),
            (None, Some(dir)) => Ok(ListerSource::Fixtures(dir)),
            (None, None) => Err(ExportError::MissingConfigError {
                field: "lister.endpoint or lister.fixtures_dir".to_string(),
            }),
        }
    }

    pub fn listing_timeout_duration(&self) -> Duration {
        Duration::from_secs(
            self.lister
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path(
            "output.csv_dir",
            &self.output.csv_dir.to_string_lossy(),
        )?;
        validate_path(
            "output.zip_dir",
            &self.output.zip_dir.to_string_lossy(),
        )?;
        validate_file_stem("output.archive_name", &self.output.archive_name)?;

        if let Some(endpoint) = &self.lister.endpoint {
            validate_url("lister.endpoint", endpoint)?;
        }
        if let Some(dir) = &self.lister.fixtures_dir {
            validate_path("lister.fixtures_dir", &dir.to_string_lossy())?;
        }
        if self.lister.endpoint.is_some() && self.lister.fixtures_dir.is_some() {
            self.lister_source()?;
        }
        if let Some(concurrency) = self.lister.concurrency {
            validate_positive_number("lister.concurrency", concurrency, 1)?;
        }
        if let Some(timeout) = self.lister.timeout_seconds {
            validate_positive_number("lister.timeout_seconds", timeout as usize, 1)?;
        }

        Ok(())
    }
}

impl ConfigProvider for ExporterConfig {
    fn csv_dir(&self) -> &Path {
        &self.output.csv_dir
    }

    fn zip_dir(&self) -> &Path {
        &self.output.zip_dir
    }

    fn archive_name(&self) -> &str {
        &self.output.archive_name
    }

    fn concurrency(&self) -> usize {
        self.lister.concurrency.unwrap_or(DEFAULT_CONCURRENCY)
    }

    fn listing_timeout(&self) -> Duration {
        self.listing_timeout_duration()
    }
}

impl Validate for ExporterConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
