//! TOML configuration for the crawler binary.
//!
//! ```toml
//! [scan]
//! date_marker = "Eingang:"
//! concurrency = 4
//!
//! [output]
//! file_name = "pdf_crawler.csv"
//! delimiter = ";"
//! ```
//!
//! Every key is optional; missing keys and sections use their defaults.

use std::path::{Path, PathBuf};

use pdf_crawler_output::CsvConfig;
use pdf_crawler_scan_models::ScanConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming a configuration file, used when `--config`
/// is not given.
pub const CONFIG_ENV_VAR: &str = "PDF_CRAWLER_CONFIG";

/// Errors from loading or rendering the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`CrawlerConfig`].
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("Failed to serialize to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Complete configuration of a crawler run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Record extraction and worker pool settings.
    pub scan: ScanConfig,
    /// Output file layout.
    pub output: CsvConfig,
}

impl CrawlerConfig {
    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if rendering fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads the configuration from `path`, or from the file named by
    /// [`CONFIG_ENV_VAR`], or falls back to defaults if neither is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the chosen file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let Some(path) = path else {
            log::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let contents =
            std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;

        log::info!("Loaded configuration from {}", path.display());

        Self::from_toml(&contents)
    }
}
