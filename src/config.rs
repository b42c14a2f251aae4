//! Host-side settings for one AA module instance.

use serde::{Deserialize, Serialize};

use aatest_plugin::DEFAULT_SERVER_URL;

use crate::{Error, Result};

pub const DEFAULT_SAMPLE_RATE: f64 = 48_000.0;
pub const DEFAULT_BLOCK_SIZE: usize = 512;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Plugin server the runtime fetches modules from.
    pub server_url: String,
    pub sample_rate: f64,
    /// Largest block the host will ask for; buffers are sized for it up front.
    pub block_size: usize,
    pub enabled: bool,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
            enabled: true,
        }
    }
}

impl ModuleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(Error::InvalidConfig("server URL is empty".to_string()));
        }
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.block_size == 0 {
            return Err(Error::InvalidConfig("block size must be non-zero".to_string()));
        }
        Ok(())
    }
}
