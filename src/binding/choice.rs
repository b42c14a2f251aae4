use super::BindingId;
use crate::gui::schema::{ChoiceSpec, ParameterValue, RadioDirection};
use crate::gui::{Canvas, ControlId, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceStyle {
    Dropdown,
    Radio(RadioDirection),
}

/// One selectable entry: parameter writes, then mirrors into other bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub name: String,
    pub values: Vec<ParameterValue>,
    pub mirrors: Vec<(BindingId, f32)>,
}

/// Dropdown or radio group. Both behave identically; only drawing differs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceBinding {
    name: String,
    control: ControlId,
    rect: Rect,
    style: ChoiceStyle,
    options: Vec<ChoiceOption>,
    selected: Option<usize>,
}

impl ChoiceBinding {
    /// Mirrors are left empty; they are filled in once every binding of the
    /// surface exists and names can be resolved.
    pub fn from_spec(
        spec: &ChoiceSpec,
        style: ChoiceStyle,
        control: ControlId,
        rect: Rect,
    ) -> Self {
        let options = spec
            .options
            .iter()
            .map(|option| ChoiceOption {
                name: option.name.clone(),
                values: option.values.clone(),
                mirrors: Vec::new(),
            })
            .collect();
        Self::new(spec.frame.name.clone(), style, control, rect, options)
    }

    pub fn new(
        name: impl Into<String>,
        style: ChoiceStyle,
        control: ControlId,
        rect: Rect,
        options: Vec<ChoiceOption>,
    ) -> Self {
        let selected = if options.is_empty() { None } else { Some(0) };
        Self {
            name: name.into(),
            control,
            rect,
            style,
            options,
            selected,
        }
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

    pub fn style(&self) -> ChoiceStyle {
        self.style
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    pub(crate) fn option_mut(&mut self, index: usize) -> Option<&mut ChoiceOption> {
        self.options.get_mut(index)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_option(&self) -> Option<&ChoiceOption> {
        self.selected.and_then(|i| self.options.get(i))
    }

    /// Select option `index`. Out-of-range selections are ignored.
    pub fn select(&mut self, index: usize) -> Option<&ChoiceOption> {
        if index >= self.options.len() {
            return None;
        }
        self.selected = Some(index);
        self.options.get(index)
    }

    /// Select the option closest to `value` (mirrors carry indices as floats).
    pub fn select_nearest(&mut self, value: f32) -> Option<usize> {
        let last = self.options.len().checked_sub(1)?;
        let index = (value.round().max(0.0) as usize).min(last);
        self.selected = Some(index);
        Some(index)
    }

    /// Parameter writes of the current selection, in declared order.
    pub fn option_values(&self) -> impl Iterator<Item = ParameterValue> + '_ {
        self.selected_option()
            .into_iter()
            .flat_map(|option| option.values.iter().copied())
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let labels: Vec<&str> = self.options.iter().map(|o| o.name.as_str()).collect();
        match self.style {
            ChoiceStyle::Dropdown => canvas.dropdown(&self.name, self.rect, &labels, self.selected),
            ChoiceStyle::Radio(direction) => canvas.radio_group(
                &self.name,
                self.rect,
                &labels,
                self.selected,
                direction == RadioDirection::Horizontal,
            ),
        }
    }
}
