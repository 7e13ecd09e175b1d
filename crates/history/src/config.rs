//! Revision manager configuration via `history.toml`
//!
//! Every field has a default, so an empty file (or no file at all) gives
//! the standard behaviour.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_immutable_core::{Error, Result};

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "history.toml";

/// Revision manager settings
///
/// # Example
///
/// ```toml
/// # Bump timestamps that tie with the previous stamp by one microsecond
/// strict_timestamps = true
///
/// # Page size applied when a history query sets none
/// # default_batch_size = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Keep revision start times strictly increasing
    #[serde(default = "default_strict_timestamps")]
    pub strict_timestamps: bool,
    /// Page size for history queries that do not set one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_batch_size: Option<usize>,
}

fn default_strict_timestamps() -> bool {
    true
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            strict_timestamps: default_strict_timestamps(),
            default_batch_size: None,
        }
    }
}

impl ManagerConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Revision manager configuration
#
# Keep revision start times strictly increasing (default: true).
# When the clock returns a time equal to (or before) the previous stamp,
# the manager uses the previous stamp plus one microsecond instead.
strict_timestamps = true

# Page size applied to history queries that do not set batch_size.
# Unset means unlimited.
# default_batch_size = 50
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not valid for this schema.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ManagerConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse manager config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{} ({})", msg, path.display())),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn validate(&self) -> Result<()> {
        if self.default_batch_size == Some(0) {
            return Err(Error::Config(
                "default_batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
