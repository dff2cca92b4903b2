use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unknown selector: {selector}")]
    UnknownSelector { selector: String },

    #[error(
        "Unknown service '{service}'{}",
        .selector.as_ref().map(|s| format!(" referenced by selector '{}'", s)).unwrap_or_default()
    )]
    UnknownService {
        service: String,
        selector: Option<String>,
    },

    #[error("Listing failed for service '{service}': {message}")]
    ListingFailed { service: String, message: String },

    #[error("Failed to write export file {}: {message}", .path.display())]
    ExportIoFailure { path: PathBuf, message: String },

    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write archive {}: {message}", .path.display())]
    ArchiveWriteFailure { path: PathBuf, message: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// Whether an error ends the run or only the selector that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Recoverable,
    Fatal,
}

impl ExportError {
    pub fn listing_failed(service: impl Into<String>, message: impl ToString) -> Self {
        Self::ListingFailed {
            service: service.into(),
            message: message.to_string(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ListingFailed { .. } | Self::ExportIoFailure { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Fatal,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::UnknownSelector { .. } => "Run with --list to see the registered selectors",
            Self::UnknownService { .. } => {
                "Every [[selectors]] entry must name a service declared in [[services]]"
            }
            Self::ListingFailed { .. } | Self::ApiError(_) => {
                "Check the lister endpoint, credentials and network access"
            }
            Self::ExportIoFailure { .. } | Self::CsvError(_) => {
                "Check free disk space and write permissions of the CSV directory"
            }
            Self::DirectoryCreationFailure { .. } => {
                "Check that the output directories can be created by this user"
            }
            Self::ArchiveWriteFailure { .. } | Self::ZipError(_) => {
                "Check free disk space and write permissions of the archive directory"
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file or command-line options",
            Self::IoError(_) | Self::SerializationError(_) => "Re-run with --verbose for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
