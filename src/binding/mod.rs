//! Widget bindings: live on-screen values tied to plugin parameters.
//!
//! A binding never talks to the plugin itself. It turns its current value into
//! [`ParameterValue`] writes and the router applies them, so a binding can be
//! dropped at any time without leaving dangling callbacks behind.

mod adsr;
mod checkbox;
mod choice;
mod slider;

pub use adsr::{AdsrBinding, EnvelopeStage, Stage};
pub use checkbox::CheckboxBinding;
pub use choice::{ChoiceBinding, ChoiceOption, ChoiceStyle};
pub use slider::{FloatSliderBinding, IntCurve, IntSliderBinding};

use smallvec::SmallVec;
use std::fmt;

use crate::gui::schema::{DecorativeSpec, ParameterValue, TriggerReaction, WidgetKind};
use crate::gui::{Canvas, ControlId};

/// Writes produced by one binding push. Only ADSR decay and option
/// selections ever produce more than two.
pub type Pushes = SmallVec<[ParameterValue; 2]>;

/// Linear remap of `x` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// `in_min == in_max` divides by zero; descriptors with degenerate ranges are
/// rejected before a binding is built.
#[inline]
pub fn map_to(x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Clamp that tolerates `min > max` from a sloppy descriptor.
#[inline]
pub(crate) fn clamp_to_range(value: f32, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    value.max(lo).min(hi)
}

/// Stable handle to one binding inside a [`BindingSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId {
    pub kind: WidgetKind,
    pub slot: usize,
}

impl BindingId {
    pub const fn new(kind: WidgetKind, slot: usize) -> Self {
        Self { kind, slot }
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.slot)
    }
}

/// Every binding of one module instance, in per-kind construction order.
#[derive(Debug, Default)]
pub struct BindingSet {
    pub float_sliders: Vec<FloatSliderBinding>,
    pub int_sliders: Vec<IntSliderBinding>,
    pub adsrs: Vec<AdsrBinding>,
    pub dropdowns: Vec<ChoiceBinding>,
    pub radio_groups: Vec<ChoiceBinding>,
    pub checkboxes: Vec<CheckboxBinding>,
    pub decorations: Vec<DecorativeSpec>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bindings of `kind`.
    pub fn count(&self, kind: WidgetKind) -> usize {
        match kind {
            WidgetKind::FloatSlider => self.float_sliders.len(),
            WidgetKind::IntSlider => self.int_sliders.len(),
            WidgetKind::Adsr => self.adsrs.len(),
            WidgetKind::Dropdown => self.dropdowns.len(),
            WidgetKind::RadioGroup => self.radio_groups.len(),
            WidgetKind::Checkbox => self.checkboxes.len(),
            WidgetKind::Decorative => self.decorations.len(),
        }
    }

    /// Number of interactive bindings.
    pub fn len(&self) -> usize {
        self.float_sliders.len()
            + self.int_sliders.len()
            + self.adsrs.len()
            + self.dropdowns.len()
            + self.radio_groups.len()
            + self.checkboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First binding called `name`, searching kinds in construction order.
    pub fn lookup_name(&self, name: &str) -> Option<BindingId> {
        fn find<T>(
            items: &[T],
            kind: WidgetKind,
            name_of: impl Fn(&T) -> &str,
            name: &str,
        ) -> Option<BindingId> {
            items
                .iter()
                .position(|item| name_of(item) == name)
                .map(|slot| BindingId::new(kind, slot))
        }

        find(&self.float_sliders, WidgetKind::FloatSlider, |b| b.name(), name)
            .or_else(|| find(&self.int_sliders, WidgetKind::IntSlider, |b| b.name(), name))
            .or_else(|| find(&self.adsrs, WidgetKind::Adsr, |b| b.name(), name))
            .or_else(|| find(&self.dropdowns, WidgetKind::Dropdown, |b| b.name(), name))
            .or_else(|| find(&self.radio_groups, WidgetKind::RadioGroup, |b| b.name(), name))
            .or_else(|| find(&self.checkboxes, WidgetKind::Checkbox, |b| b.name(), name))
    }

    /// Whether a mirror into `kind` has a single well-defined value to set.
    pub fn accepts_mirror(kind: WidgetKind) -> bool {
        !matches!(kind, WidgetKind::Adsr | WidgetKind::Decorative)
    }

    /// Set the binding's value and return the writes that bring the plugin in
    /// line with it. Unknown ids and non-mirrorable kinds produce nothing.
    pub fn mirror(&mut self, id: BindingId, value: f32) -> Pushes {
        let mut pushes = Pushes::new();
        match id.kind {
            WidgetKind::FloatSlider => {
                if let Some(b) = self.float_sliders.get_mut(id.slot) {
                    b.set_value(value);
                    pushes.push(b.push());
                }
            }
            WidgetKind::IntSlider => {
                if let Some(b) = self.int_sliders.get_mut(id.slot) {
                    b.set_value(value.round() as i32);
                    pushes.push(b.push());
                }
            }
            WidgetKind::Checkbox => {
                if let Some(b) = self.checkboxes.get_mut(id.slot) {
                    b.set_checked(value != 0.0);
                    pushes.push(b.push());
                }
            }
            WidgetKind::Dropdown | WidgetKind::RadioGroup => {
                let group = if id.kind == WidgetKind::Dropdown {
                    &mut self.dropdowns
                } else {
                    &mut self.radio_groups
                };
                if let Some(b) = group.get_mut(id.slot) {
                    if b.select_nearest(value).is_some() {
                        pushes.extend(b.option_values());
                    }
                }
            }
            WidgetKind::Adsr | WidgetKind::Decorative => {
                tracing::debug!("Ignoring mirror into {}", id);
            }
        }
        pushes
    }

    /// Value a transport reaction drives a slider or checkbox to: on/off pick
    /// its max/min (checked/unchecked), toggle flips between the two.
    pub fn reaction_target(&self, id: BindingId, reaction: TriggerReaction) -> Option<f32> {
        match id.kind {
            WidgetKind::FloatSlider => self.float_sliders.get(id.slot).map(|b| {
                let (min, max) = b.range();
                react_between(reaction, b.value() == max, min, max)
            }),
            WidgetKind::IntSlider => self.int_sliders.get(id.slot).map(|b| {
                let (min, max) = b.range();
                react_between(reaction, b.value() == max, min as f32, max as f32)
            }),
            WidgetKind::Checkbox => self
                .checkboxes
                .get(id.slot)
                .map(|b| react_between(reaction, b.is_checked(), 0.0, 1.0)),
            _ => None,
        }
    }

    /// Draw every binding, then decorations.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for b in &self.float_sliders {
            b.draw(canvas);
        }
        for b in &self.int_sliders {
            b.draw(canvas);
        }
        for b in &self.dropdowns {
            b.draw(canvas);
        }
        for b in &self.radio_groups {
            b.draw(canvas);
        }
        for b in &self.checkboxes {
            b.draw(canvas);
        }
        for b in &self.adsrs {
            b.draw(canvas);
        }
        for decoration in &self.decorations {
            match *decoration {
                DecorativeSpec::Logo {
                    x,
                    y,
                    scale_x,
                    scale_y,
                } => canvas.logo(x, y, scale_x, scale_y),
                DecorativeSpec::FourTrack {
                    x,
                    y,
                    w,
                    length_secs,
                } => canvas.four_track(x, y, w, length_secs),
            }
        }
    }

    /// The ADSR slot and envelope stage that own `control`.
    pub(crate) fn adsr_for(&self, control: ControlId) -> Option<(usize, Stage)> {
        self.adsrs
            .iter()
            .enumerate()
            .find_map(|(slot, adsr)| adsr.stage_for(control).map(|stage| (slot, stage)))
    }
}

fn react_between(reaction: TriggerReaction, engaged: bool, off: f32, on: f32) -> f32 {
    match reaction {
        TriggerReaction::On => on,
        TriggerReaction::Off => off,
        TriggerReaction::Toggle if engaged => off,
        TriggerReaction::Toggle => on,
    }
}
