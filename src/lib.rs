//! # aatest - AA plugin host module
//!
//! Hosts one externally defined "AA" audio module whose DSP runs inside a
//! WebAssembly sandbox, and builds its control surface from the JSON UI
//! descriptor the module ships.
//!
//! ## Architecture
//!
//! aatest is an umbrella crate over:
//! - **aatest-plugin** - plugin ABI, shared-library loader, module catalog
//! - **aatest-midi** - note decoding and KeyStep Pro transport SysEx
//!
//! and adds the pieces in between:
//! - [`gui`] - descriptor parsing, anchored layout, drawing seam
//! - [`binding`] - live widget values and their parameter mapping
//! - [`surface`] - descriptor to bindings and transport triggers
//! - [`router`] - widget and SysEx events to parameter writes
//! - [`dispatch`] - per-arity audio compute table
//!
//! ## Quick Start
//!
//! ```ignore
//! use aatest::prelude::*;
//!
//! let connector = DylibConnector::open("/usr/local/lib/libaa_wasmtime.so")?;
//! let mut module = AaTest::builder().sample_rate(48000.0).build(Box::new(connector))?;
//!
//! println!("{:?}", module.available_modules(true));
//! module.set_module("tape_delay")?;
//! module.set_target(Some("output".into()));
//!
//! let mut left = vec![0.0; 512];
//! let mut right = vec![0.0; 512];
//! module.process(&[], &mut [&mut left, &mut right]);
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - `dylib`
//! - `dylib` - load the AA runtime from a shared library

pub mod binding;
pub mod dispatch;
pub mod gui;
pub mod router;
pub mod surface;

mod builder;
mod config;
mod error;
mod module;

pub use builder::AaTestBuilder;
pub use config::{ModuleConfig, DEFAULT_BLOCK_SIZE, DEFAULT_SAMPLE_RATE};
pub use error::{Error, Result};
pub use module::{AaTest, ModuleSaveData, DEFAULT_TITLE};

/// Re-export of aatest-plugin for direct access
pub use aatest_plugin as plugin;

/// Re-export of aatest-midi for direct access
pub use aatest_midi as midi;

pub use aatest_plugin::{AudioIO, ModuleConnector, ParameterAddress, PluginHandle};

#[cfg(feature = "dylib")]
pub use aatest_plugin::DylibConnector;

pub use binding::{BindingId, BindingSet};
pub use dispatch::{ArityDispatcher, ChannelArity};
pub use gui::{Canvas, ControlId, Rect, SchemaError, UiDescriptor};
pub use router::{ControlEvent, EventRouter, RouterAction};
pub use surface::ControlSurface;

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        AaTest, AaTestBuilder, AudioIO, Canvas, ControlEvent, ControlId, Error, ModuleConfig,
        ModuleConnector, ModuleSaveData, ParameterAddress, PluginHandle, Rect, Result,
    };

    #[cfg(feature = "dylib")]
    pub use crate::DylibConnector;

    pub use aatest_midi::{SysEx, TransportCommand, TransportKind};
}
