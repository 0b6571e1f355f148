use std::path::Path;

use geodid_assets::DEFAULT_MAX_CONCURRENT_PINS;
use geodid_store::StoreConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Controller address genesis identifiers are derived from.
    pub controller: String,
    /// Upper bound on in-flight asset pins per batch.
    pub max_concurrent_pins: usize,
    pub store: StoreConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            controller: "0x0000000000000000000000000000000000000000".into(),
            max_concurrent_pins: DEFAULT_MAX_CONCURRENT_PINS,
            store: StoreConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(source: &str) -> SdkResult<Self> {
        toml::from_str(source).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read a TOML config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = controller.into();
        self
    }
}
