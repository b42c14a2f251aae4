//! Builder for configuring and constructing an [`AaTest`] module.

use aatest_plugin::ModuleConnector;

use crate::config::ModuleConfig;
use crate::{AaTest, Result};

/// # Example
///
/// ```ignore
/// use aatest::prelude::*;
///
/// let connector = DylibConnector::open("/usr/local/lib/libaa_wasmtime.so")?;
/// let mut module = AaTest::builder()
///     .sample_rate(44100.0)
///     .block_size(256)
///     .build(Box::new(connector))?;
///
/// module.set_module("tape_delay")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct AaTestBuilder {
    config: ModuleConfig,
}

impl AaTestBuilder {
    /// Start from an existing configuration.
    pub fn from_config(config: ModuleConfig) -> Self {
        Self { config }
    }

    /// Default: `http://127.0.0.1:8000`
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.config.server_url = url.into();
        self
    }

    /// Default: 48000
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Default: 512
    pub fn block_size(mut self, frames: usize) -> Self {
        self.config.block_size = frames;
        self
    }

    /// Default: enabled
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn build(self, connector: Box<dyn ModuleConnector>) -> Result<AaTest> {
        self.config.validate()?;
        Ok(AaTest::from_parts(self.config, connector))
    }
}
