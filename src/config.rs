use crate::components::early_decision_engine::ListLookup;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "phishguard.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path of the JSON classifier artifact
    #[serde(default = "default_model_path")]
    pub path: String,
    #[serde(default = "default_inference_timeout_ms")]
    pub inference_timeout_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// URLs always classified as phishing
    #[serde(default)]
    pub blocklist: Vec<String>,
    /// URLs always classified as safe
    #[serde(default)]
    pub allowlist: Vec<String>,
}

fn default_model_path() -> String {
    "model/phishguard-model.json".to_string()
}

fn default_inference_timeout_ms() -> u64 {
    2000
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            inference_timeout_ms: default_inference_timeout_ms(),
        }
    }
}

impl ModelConfig {
    pub fn inference_timeout(&self) -> Duration {
        Duration::from_millis(self.inference_timeout_ms)
    }
}

impl LookupConfig {
    pub fn is_empty(&self) -> bool {
        self.blocklist.is_empty() && self.allowlist.is_empty()
    }

    /// None when both lists are empty
    pub fn build(&self) -> Option<ListLookup> {
        if self.is_empty() {
            return None;
        }
        Some(ListLookup::from_lists(&self.blocklist, &self.allowlist))
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_yaml()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
