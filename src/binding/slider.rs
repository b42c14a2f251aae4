use aatest_plugin::ParameterAddress;

use super::{clamp_to_range, map_to};
use crate::gui::schema::{FloatSliderSpec, IntSliderSpec, ParameterValue};
use crate::gui::{Canvas, ControlId, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct FloatSliderBinding {
    name: String,
    control: ControlId,
    rect: Rect,
    address: ParameterAddress,
    value: f32,
    min: f32,
    max: f32,
    digits: Option<u32>,
}

impl FloatSliderBinding {
    pub fn new(
        name: impl Into<String>,
        control: ControlId,
        rect: Rect,
        address: ParameterAddress,
        init: f32,
        min: f32,
        max: f32,
    ) -> Self {
        Self {
            name: name.into(),
            control,
            rect,
            address,
            value: clamp_to_range(init, min, max),
            min,
            max,
            digits: None,
        }
    }

    pub fn from_spec(spec: &FloatSliderSpec, control: ControlId, rect: Rect) -> Self {
        Self::new(
            spec.frame.name.clone(),
            control,
            rect,
            spec.address,
            spec.init,
            spec.min,
            spec.max,
        )
        .with_digits(spec.digits)
    }

    /// Display precision; `None` lets the host pick.
    pub fn with_digits(mut self, digits: Option<u32>) -> Self {
        self.digits = digits;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn control(&self) -> ControlId {
        self.control
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn address(&self) -> ParameterAddress {
        self.address
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn range(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = clamp_to_range(value, self.min, self.max);
    }

    /// Identity mapping: the plugin sees exactly the displayed value.
    pub fn push(&self) -> ParameterValue {
        ParameterValue {
            address: self.address,
            value: self.value,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.float_slider(
            &self.name,
            self.rect,
            self.value,
            self.min,
            self.max,
            self.digits,
        );
    }
}

/// How an integer slider position becomes a plugin float.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum IntCurve {
    #[default]
    Identity,
    /// Slider `[min, max]` maps linearly onto `[out_min, out_max]`.
    Linear { out_min: f32, out_max: f32 },
}

impl IntCurve {
    pub fn apply(&self, value: i32, min: i32, max: i32) -> f32 {
        match *self {
            IntCurve::Identity => value as f32,
            IntCurve::Linear { out_min, out_max } => {
                map_to(value as f32, min as f32, max as f32, out_min, out_max)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntSliderBinding {
    name: String,
    control: ControlId,
    rect: Rect,
    address: ParameterAddress,
    value: i32,
    min: i32,
    max: i32,
    curve: IntCurve,
}

impl IntSliderBinding {
    pub fn new(
        name: impl Into<String>,
        control: ControlId,
        rect: Rect,
        address: ParameterAddress,
        init: i32,
        min: i32,
        max: i32,
    ) -> Self {
        let (lo, hi) = (min.min(max), min.max(max));
        Self {
            name: name.into(),
            control,
            rect,
            address,
            value: init.clamp(lo, hi),
            min,
            max,
            curve: IntCurve::Identity,
        }
    }

    pub fn from_spec(spec: &IntSliderSpec, control: ControlId, rect: Rect) -> Self {
        let curve = spec
            .map_to_float
            .map_or(IntCurve::Identity, |range| IntCurve::Linear {
                out_min: range.min,
                out_max: range.max,
            });
        Self::new(
            spec.frame.name.clone(),
            control,
            rect,
            spec.address,
            spec.init,
            spec.min,
            spec.max,
        )
        .with_curve(curve)
    }

    pub fn with_curve(mut self, curve: IntCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn control(&self) -> ControlId {
        self.control
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn address(&self) -> ParameterAddress {
        self.address
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn range(&self) -> (i32, i32) {
        (self.min, self.max)
    }

    pub fn curve(&self) -> IntCurve {
        self.curve
    }

    pub fn set_value(&mut self, value: i32) {
        let (lo, hi) = (self.min.min(self.max), self.min.max(self.max));
        self.value = value.clamp(lo, hi);
    }

    pub fn mapped_value(&self) -> f32 {
        self.curve.apply(self.value, self.min, self.max)
    }

    pub fn push(&self) -> ParameterValue {
        ParameterValue {
            address: self.address,
            value: self.mapped_value(),
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.int_slider(&self.name, self.rect, self.value, self.min, self.max);
    }
}
