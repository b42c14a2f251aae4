//! Schema-driven control surface: descriptor parsing, layout and drawing.

pub mod canvas;
pub mod layout;
pub mod schema;

pub use canvas::Canvas;
pub use layout::{AnchorDirection, LayoutChain, Placement, Rect};
pub use schema::{SchemaError, UiDescriptor, WidgetDescriptor, WidgetKind};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one on-screen control, as carried by widget-changed callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControlId(pub u32);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "control#{}", self.0)
    }
}

/// Hands out fresh [`ControlId`]s. Ids are never reused within one allocator.
#[derive(Debug, Default)]
pub struct ControlIdAllocator {
    next: u32,
}

impl ControlIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> ControlId {
        let id = ControlId(self.next);
        self.next += 1;
        id
    }

    pub fn allocated(&self) -> u32 {
        self.next
    }
}
