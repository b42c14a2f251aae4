//! Module catalog
//!
//! The plugin server publishes the modules it can instantiate as
//! `{"modules": [{"name": ..., "json_url": ...}]}`. The catalog caches those
//! pairs so the host can list names and resolve a name to the URL `create`
//! expects.

use crate::error::{PluginError, Result};
use crate::instance::ModuleConnector;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: String,
    pub json_url: String,
}

#[derive(Deserialize)]
struct CatalogDocument {
    modules: Vec<ModuleEntry>,
}

#[derive(Debug, Clone)]
pub struct ModuleCatalog {
    server_url: String,
    entries: Vec<ModuleEntry>,
}

impl Default for ModuleCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

impl ModuleCatalog {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            entries: Vec::new(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn parse(document: &str) -> Result<Vec<ModuleEntry>> {
        let doc: CatalogDocument = serde_json::from_str(document)?;
        Ok(doc.modules)
    }

    /// Re-query the server. Entries are replaced, not appended, so repeated
    /// rescans never list a module twice.
    pub fn rescan(&mut self, connector: &mut dyn ModuleConnector) -> Result<usize> {
        let document = connector
            .list_modules(&self.server_url)
            .ok_or_else(|| PluginError::ConnectionFailed(self.server_url.clone()))?;

        self.entries = Self::parse(&document)?;
        tracing::info!(
            "AA module catalog: {} modules from {}",
            self.entries.len(),
            self.server_url
        );
        Ok(self.entries.len())
    }

    /// Names of all known modules, optionally refreshing first. A failed
    /// refresh is logged and the cached list is returned.
    pub fn available_modules(
        &mut self,
        connector: &mut dyn ModuleConnector,
        rescan: bool,
    ) -> Vec<String> {
        if rescan {
            if let Err(e) = self.rescan(connector) {
                tracing::warn!("Failed to rescan AA modules: {}", e);
            }
        }
        self.names()
    }

    pub fn lookup(&self, name: &str) -> Option<&ModuleEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
