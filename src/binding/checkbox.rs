use aatest_plugin::ParameterAddress;

use crate::gui::schema::{CheckboxSpec, ParameterValue};
use crate::gui::{Canvas, ControlId, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxBinding {
    name: String,
    control: ControlId,
    rect: Rect,
    address: ParameterAddress,
    checked: bool,
}

impl CheckboxBinding {
    pub fn new(
        name: impl Into<String>,
        control: ControlId,
        rect: Rect,
        address: ParameterAddress,
        checked: bool,
    ) -> Self {
        Self {
            name: name.into(),
            control,
            rect,
            address,
            checked,
        }
    }

    pub fn from_spec(spec: &CheckboxSpec, control: ControlId, rect: Rect) -> Self {
        Self::new(spec.frame.name.clone(), control, rect, spec.address, spec.init)
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

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn toggle(&mut self) {
        self.checked = !self.checked;
    }

    /// Sent as `0.0` / `1.0`.
    pub fn push(&self) -> ParameterValue {
        ParameterValue {
            address: self.address,
            value: if self.checked { 1.0 } else { 0.0 },
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.checkbox(&self.name, self.rect, self.checked);
    }
}
