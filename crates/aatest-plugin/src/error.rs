//! Error types for the AA plugin bridge

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Opening,
    Creation,
}

impl std::fmt::Display for LoadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStage::Opening => write!(f, "opening runtime"),
            LoadStage::Creation => write!(f, "creating module"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Plugin server unreachable: {0}")]
    ConnectionFailed(String),

    #[error("Module load failed at {stage} stage: {module}\n  Reason: {reason}")]
    LoadFailed {
        module: String,
        stage: LoadStage,
        reason: String,
    },

    #[error("Unknown AA module: {0}")]
    UnknownModule(String),

    #[error("Malformed module catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PluginError>;
