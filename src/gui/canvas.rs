//! Drawing seam.
//!
//! The host owns the actual vector canvas; bindings describe themselves to it
//! through [`Canvas`] and never touch pixels.

use super::layout::Rect;

/// Immediate-mode drawing target supplied by the host.
pub trait Canvas {
    fn float_slider(
        &mut self,
        name: &str,
        rect: Rect,
        value: f32,
        min: f32,
        max: f32,
        digits: Option<u32>,
    );

    fn int_slider(&mut self, name: &str, rect: Rect, value: i32, min: i32, max: i32);

    fn dropdown(&mut self, name: &str, rect: Rect, options: &[&str], selected: Option<usize>);

    fn radio_group(
        &mut self,
        name: &str,
        rect: Rect,
        options: &[&str],
        selected: Option<usize>,
        horizontal: bool,
    );

    fn checkbox(&mut self, name: &str, rect: Rect, checked: bool);

    /// `stages` are display values in A, D, S, R order.
    fn adsr(&mut self, name: &str, rect: Rect, stages: [f32; 4], active: bool);

    fn logo(&mut self, _x: f32, _y: f32, _scale_x: f32, _scale_y: f32) {}

    fn four_track(&mut self, _x: f32, _y: f32, _w: f32, _length_secs: f32) {}
}
