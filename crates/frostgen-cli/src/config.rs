//! Generator configuration

use std::path::{Path, PathBuf};

use frostgen_core::ThresholdParams;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, Result};

/// Environment variable holding the config file path
pub const CONFIG_ENV: &str = "FROSTGEN_CONFIG";

/// Environment variable overriding `bridge.validatorCnt`
pub const VALIDATOR_CNT_ENV: &str = "FROSTGEN_VALIDATOR_CNT";

/// Environment variable overriding `bridge.threshold`
pub const THRESHOLD_ENV: &str = "FROSTGEN_THRESHOLD";

/// Bridge validator set parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Number of validators (n)
    #[serde(rename = "validatorCnt")]
    pub validator_cnt: u16,

    /// Signatures needed to act for the group (t)
    pub threshold: u16,
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub bridge: BridgeConfig,

    /// Where the group descriptor is written
    #[serde(default = "GeneratorConfig::default_output")]
    pub output: PathBuf,
}

impl GeneratorConfig {
    fn default_output() -> PathBuf {
        PathBuf::from("./frost_group.json")
    }

    fn default_path() -> PathBuf {
        PathBuf::from("./config.json")
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            CliError::Config(format!("cannot parse {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    /// Load from the path in `FROSTGEN_CONFIG` and apply environment overrides
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// [`GeneratorConfig::from_env`] with an explicit variable lookup
    pub fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path);
        debug!(path = %path.display(), "Loading configuration");

        let mut config = Self::load(&path)?;
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Replace file values with any set override variables
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(VALIDATOR_CNT_ENV) {
            self.bridge.validator_cnt = parse_count(VALIDATOR_CNT_ENV, &value)?;
        }
        if let Some(value) = lookup(THRESHOLD_ENV) {
            self.bridge.threshold = parse_count(THRESHOLD_ENV, &value)?;
        }
        Ok(())
    }

    /// Validated (n, t)
    pub fn params(&self) -> Result<ThresholdParams> {
        ThresholdParams::new(self.bridge.validator_cnt, self.bridge.threshold)
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

fn parse_count(name: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("{} must be a count, got {:?}", name, value)))
}
