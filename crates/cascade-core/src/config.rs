//! TOML configuration for a cascade session.
//!
//! ```toml
//! [session]
//! store_key = "devices"
//! settle_delay_ms = 150
//!
//! [[dropdown]]
//! id = "device"
//! label = "Device"
//! seed_options = ["Phone", { value = "tab", label = "Tablet" }]
//!
//! [[dropdown]]
//! id = "brand"
//! label = "Brand"
//! depends_on = "device"
//! creatable = true
//!
//! [dropdown.seed_contexts]
//! Phone = ["Apple", "Samsung"]
//! ```

use std::path::Path;
use std::time::Duration;

use cascade_model::DropdownSpec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Session-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Key the option store is persisted under.
    pub store_key: String,

    /// Delay before a requested selection commits, in milliseconds.
    pub settle_delay_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            store_key: "options".to_string(),
            settle_delay_ms: 150,
        }
    }
}

/// A complete session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    pub session: SessionSettings,

    /// Dropdowns in display order.
    #[serde(rename = "dropdown")]
    pub dropdowns: Vec<DropdownSpec>,
}

impl CascadeConfig {
    /// Read and parse a TOML configuration file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), dropdowns = config.dropdowns.len(), "loaded configuration");
        Ok(config)
    }

    /// Parse a TOML configuration string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.session.settle_delay_ms)
    }
}
