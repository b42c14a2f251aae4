//! Centralized error type for the aatest umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

use crate::gui::SchemaError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Plugin: {0}")]
    Plugin(#[from] aatest_plugin::PluginError),

    #[error("MIDI: {0}")]
    Midi(#[from] aatest_midi::Error),

    #[error("UI descriptor: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
