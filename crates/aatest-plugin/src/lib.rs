//! AA plugin ABI for aatest
//!
//! AA modules are audio processors whose DSP runs inside a WebAssembly sandbox
//! hosted by an external runtime. This crate describes what the host side needs
//! from that runtime and nothing more:
//!
//! - [`PluginHandle`]: one live module instance (parameters, notes, block compute)
//! - [`ModuleConnector`]: creates instances and lists the modules a server offers
//! - [`ModuleCatalog`]: cached `(name, url)` pairs from the plugin server
//! - [`ParameterAddress`]: the `(node, index)` pair that names a plugin parameter
//!
//! ## Usage
//!
//! ```ignore
//! use aatest_plugin::{DylibConnector, ModuleCatalog, ModuleConnector, ParameterAddress};
//!
//! let mut connector = DylibConnector::open("/usr/local/lib/libaa_wasmtime.so")?;
//! let mut catalog = ModuleCatalog::new("http://127.0.0.1:8000");
//! catalog.rescan(&mut connector)?;
//!
//! let entry = catalog.lookup("tape_delay").unwrap();
//! let mut plugin = connector
//!     .create(catalog.server_url(), &entry.json_url)
//!     .expect("module creation failed");
//! plugin.init(48000.0);
//! plugin.set_param(ParameterAddress::new(0, 3), 0.5);
//! ```

pub mod error;
pub use error::{LoadStage, PluginError, Result};

mod address;
pub use address::ParameterAddress;

mod metadata;
pub use metadata::AudioIO;

mod instance;
pub use instance::{ModuleConnector, PluginHandle};

mod catalog;
pub use catalog::{ModuleCatalog, ModuleEntry, DEFAULT_SERVER_URL};

#[cfg(feature = "dylib")]
mod dylib_loader;
#[cfg(feature = "dylib")]
pub use dylib_loader::{DylibConnector, DylibPlugin};
