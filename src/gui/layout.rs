//! Widget placement.
//!
//! A widget is either placed at explicit coordinates or anchored to the most
//! recently placed widget of its own kind. Each kind keeps its own chain, so a
//! dropdown can never anchor to a slider.

use serde::{Deserialize, Serialize};

use super::schema::WidgetKind;

/// Gap between a widget and the one it is anchored to.
pub const ANCHOR_GAP: f32 = 2.0;
/// Gap used by `anchored_right_padded`.
pub const ANCHOR_PADDED_GAP: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorDirection {
    Below,
    Right,
    RightPadded,
}

impl AnchorDirection {
    /// Parse the descriptor spelling (`anchored_below`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "anchored_below" => Some(AnchorDirection::Below),
            "anchored_right" => Some(AnchorDirection::Right),
            "anchored_right_padded" => Some(AnchorDirection::RightPadded),
            _ => None,
        }
    }

    /// Position of a `w`×`h` widget placed next to `anchor`.
    pub fn place(self, anchor: &Rect, w: f32, h: f32) -> Rect {
        match self {
            AnchorDirection::Below => Rect::new(anchor.x, anchor.bottom() + ANCHOR_GAP, w, h),
            AnchorDirection::Right => Rect::new(anchor.right() + ANCHOR_GAP, anchor.y, w, h),
            AnchorDirection::RightPadded => {
                Rect::new(anchor.right() + ANCHOR_PADDED_GAP, anchor.y, w, h)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Absolute { x: f32, y: f32 },
    Anchored(AnchorDirection),
}

/// Per-kind "previous widget" context threaded through one surface build.
#[derive(Debug, Default)]
pub struct LayoutChain {
    previous: [Option<Rect>; WidgetKind::COUNT],
}

impl LayoutChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a placement and record the result as the new chain tail.
    ///
    /// Returns `None` when the widget is anchored but nothing of its kind has
    /// been placed yet; such a widget is dropped by the caller.
    pub fn place(
        &mut self,
        kind: WidgetKind,
        name: &str,
        placement: Placement,
        w: f32,
        h: f32,
    ) -> Option<Rect> {
        let rect = match placement {
            Placement::Absolute { x, y } => Rect::new(x, y, w, h),
            Placement::Anchored(direction) => match &self.previous[kind.index()] {
                Some(anchor) => direction.place(anchor, w, h),
                None => {
                    tracing::warn!(
                        "Dropping {} '{}': anchored with no previous {} to anchor to",
                        kind,
                        name,
                        kind
                    );
                    return None;
                }
            },
        };
        self.previous[kind.index()] = Some(rect);
        Some(rect)
    }

    pub fn last(&self, kind: WidgetKind) -> Option<Rect> {
        self.previous[kind.index()]
    }
}
