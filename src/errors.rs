//! Error types for distro_releases
//!
//! This module defines the error types for all components of the application.
//! Only failures that make a run unusable surface as errors; per-release
//! problems are logged and skipped by the components themselves.

use std::path::PathBuf;
use thiserror::Error;

/// Download and HTTP client errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Server returned error status
    #[error("Server error: HTTP {status} for {url}")]
    ServerError { status: u16, url: String },

    /// Rate limiter could not be configured
    #[error("Invalid rate limit: {rps} requests per second")]
    InvalidRateLimit { rps: u32 },
}

/// Directory listing errors
#[derive(Error, Debug)]
pub enum ListingError {
    /// The listing could not be opened
    #[error("Failed to open directory listing for {mirror}")]
    Open {
        mirror: String,
        #[source]
        source: DownloadError,
    },
}

/// Table export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV serialization failed
    #[error("CSV write failed")]
    Csv(#[from] csv::Error),

    /// I/O error while writing a table
    #[error("Failed to write table {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Release discovery preconditions
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// A mirror listing produced no releases at all
    #[error("No releases discovered on mirror {mirror}")]
    NoReleases { mirror: String },

    /// Nothing left after merging all mirrors
    #[error("Merged release set is empty")]
    EmptyCatalog,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Listing error
    #[error(transparent)]
    Listing(#[from] ListingError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Discovery error
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error only affects a single candidate release
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Download(DownloadError::Http(_))
                | AppError::Download(DownloadError::ServerError { .. })
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Download(_) => "download",
            AppError::Listing(_) => "listing",
            AppError::Export(_) => "export",
            AppError::Config(_) => "config",
            AppError::Discovery(_) => "discovery",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Export result type alias
pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
