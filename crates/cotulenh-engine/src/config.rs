//! Engine configuration.
//!
//! The defaults match the standard rules. A driver can override them from a
//! TOML file:
//!
//! ```toml
//! auto_commit = false
//! heroic_promotion = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Switches for optional rule behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Close a deploy session as soon as every unit is accounted for or no
    /// remaining unit can move.
    pub auto_commit: bool,
    /// Promote units that attack the enemy commander at the end of a turn.
    pub heroic_promotion: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            auto_commit: true,
            heroic_promotion: true,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML text. Missing keys take their default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if the text is not valid TOML or a
    /// key has the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
