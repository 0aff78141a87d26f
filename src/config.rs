//! Configuration management for distro_releases
//!
//! This module provides configuration loading from TOML files with
//! zero-config defaults: without a config file the tool crawls the Debian
//! and Ubuntu primary mirrors and writes `x86.csv` and `arm.csv`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::{ClientConfig, MirrorSpec, RunConfig, TableSpec};
use crate::constants::{config as paths, export, limits, logging, mirrors};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Output settings
    pub output: OutputConfig,
    /// Mirrors to crawl, in order
    pub mirrors: Vec<MirrorConfigToml>,
    /// Tables to write
    pub tables: Vec<TableConfigToml>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfigToml::default(),
            output: OutputConfig::default(),
            mirrors: vec![
                MirrorConfigToml {
                    name: "debian".to_string(),
                    url: mirrors::DEBIAN_URL.to_string(),
                },
                MirrorConfigToml {
                    name: "ubuntu".to_string(),
                    url: mirrors::UBUNTU_URL.to_string(),
                },
            ],
            tables: vec![
                TableConfigToml {
                    path: PathBuf::from(export::X86_TABLE),
                    architectures: export::X86_ARCHITECTURES
                        .iter()
                        .map(|a| a.to_string())
                        .collect(),
                },
                TableConfigToml {
                    path: PathBuf::from(export::ARM_TABLE),
                    architectures: export::ARM_ARCHITECTURES
                        .iter()
                        .map(|a| a.to_string())
                        .collect(),
                },
            ],
            logging: LoggingConfig::default(),
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// TCP keep-alive timeout in seconds (None = disabled)
    pub tcp_keepalive_secs: Option<u64>,
    /// Connection pool idle timeout in seconds (None = no timeout)
    pub pool_idle_timeout_secs: Option<u64>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        let defaults = ClientConfig::default();
        Self {
            tcp_keepalive_secs: defaults.tcp_keepalive.map(|d| d.as_secs()),
            pool_idle_timeout_secs: defaults.pool_idle_timeout.map(|d| d.as_secs()),
            pool_max_per_host: defaults.pool_max_per_host,
            request_timeout_secs: defaults.request_timeout.as_secs(),
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the tables are written to
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// A mirror entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfigToml {
    pub name: String,
    pub url: String,
}

/// A table entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfigToml {
    pub path: PathBuf,
    pub architectures: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration with precedence:
    /// 1. Explicit config file (must exist)
    /// 2. First config file found in the standard locations
    /// 3. Default values
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        if let Some(path) = config_file_override {
            if !path.exists() {
                return Err(ConfigError::NotFound { path });
            }
            return Self::load_from_file(&path).await;
        }

        match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path).await,
            None => {
                debug!("No config file found in standard locations, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(paths::LOCAL_CONFIG_FILE)];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }
        #[cfg(unix)]
        search_paths.push(
            Path::new("/etc")
                .join(paths::CONFIG_DIR_NAME)
                .join(paths::CONFIG_FILE_NAME),
        );

        search_paths.into_iter().find(|path| {
            let found = path.exists();
            if found {
                debug!("Found config file: {}", path.display());
            }
            found
        })
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(paths::CONFIG_DIR_NAME).join(paths::CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Convert to runtime configuration, validating every value
    pub fn to_runtime_config(
        &self,
        today: Option<NaiveDate>,
    ) -> ConfigResult<(ClientConfig, RunConfig)> {
        let client = self.client.to_runtime_config()?;

        if self.mirrors.is_empty() {
            return Err(invalid("mirrors", "[]", "At least one mirror is required"));
        }
        let mirrors = self
            .mirrors
            .iter()
            .map(MirrorConfigToml::to_runtime_config)
            .collect::<ConfigResult<Vec<_>>>()?;

        if self.tables.is_empty() {
            return Err(invalid("tables", "[]", "At least one table is required"));
        }
        let tables = self
            .tables
            .iter()
            .map(TableConfigToml::to_runtime_config)
            .collect::<ConfigResult<Vec<_>>>()?;

        let run = RunConfig {
            mirrors,
            tables,
            output_dir: self.output.directory.clone(),
            today,
        };
        Ok((client, run))
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# distro_releases configuration
# Every setting is optional; omitted values fall back to these defaults.

[client]
tcp_keepalive_secs = 30
pool_idle_timeout_secs = 90
pool_max_per_host = 2
request_timeout_secs = 300
connect_timeout_secs = 30
rate_limit_rps = {rps}

[output]
# Directory the tables are written to
directory = "."

# Mirrors are crawled in order; a release announced by several mirrors is
# kept as first seen.
[[mirrors]]
name = "debian"
url = "{debian}"

[[mirrors]]
name = "ubuntu"
url = "{ubuntu}"

[[tables]]
path = "{x86}"
architectures = [{x86_arches}]

[[tables]]
path = "{arm}"
architectures = [{arm_arches}]

[logging]
level = "{level}"  # error, warn, info, debug, trace
"#,
            rps = limits::DEFAULT_RATE_LIMIT_RPS,
            debian = mirrors::DEBIAN_URL,
            ubuntu = mirrors::UBUNTU_URL,
            x86 = export::X86_TABLE,
            x86_arches = quoted_list(export::X86_ARCHITECTURES),
            arm = export::ARM_TABLE,
            arm_arches = quoted_list(export::ARM_ARCHITECTURES),
            level = logging::DEFAULT_LOG_LEVEL,
        )
    }
}

fn quoted_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item))
        .collect::<Vec<_>>()
        .join(", ")
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ConfigResult<ClientConfig> {
        if self.rate_limit_rps == 0 {
            return Err(invalid(
                "client.rate_limit_rps",
                self.rate_limit_rps,
                "Rate limit must be non-zero",
            ));
        }

        Ok(ClientConfig {
            tcp_keepalive: self.tcp_keepalive_secs.map(Duration::from_secs),
            pool_idle_timeout: self.pool_idle_timeout_secs.map(Duration::from_secs),
            pool_max_per_host: self.pool_max_per_host,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            rate_limit_rps: self.rate_limit_rps,
        })
    }
}

impl MirrorConfigToml {
    /// Convert to runtime MirrorSpec
    pub fn to_runtime_config(&self) -> ConfigResult<MirrorSpec> {
        let url = Url::parse(&self.url)
            .map_err(|e| invalid("mirrors.url", &self.url, &e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                "mirrors.url",
                &self.url,
                "Only http and https mirrors are supported",
            ));
        }

        Ok(MirrorSpec {
            name: self.name.clone(),
            url,
        })
    }
}

impl TableConfigToml {
    /// Convert to runtime TableSpec
    pub fn to_runtime_config(&self) -> ConfigResult<TableSpec> {
        if self.architectures.is_empty() {
            return Err(invalid(
                "tables.architectures",
                self.path.display(),
                "A table needs at least one architecture",
            ));
        }

        Ok(TableSpec {
            path: self.path.clone(),
            architectures: self.architectures.clone(),
        })
    }
}
