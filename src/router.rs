//! Event routing: widget callbacks and transport SysEx in, parameter writes out.
//!
//! Routing is split in two steps. Producing the [`RouterAction`]s for an
//! event only inspects (and, for the edited widget itself, updates) binding
//! state; [`EventRouter::apply`] then performs them against the plugin in
//! order. All parameter writes of an action list happen synchronously.

use aatest_midi::{SysEx, TransportCommand};
use aatest_plugin::{ParameterAddress, PluginHandle};
use smallvec::SmallVec;

use crate::binding::{BindingId, BindingSet, ChoiceBinding, Pushes};
use crate::gui::schema::ParameterValue;
use crate::gui::ControlId;
use crate::surface::{ControlSurface, TriggerAction};

/// One program-driven mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouterAction {
    /// Write `value` to the plugin parameter at `address`.
    ParameterPush { address: ParameterAddress, value: f32 },
    /// Set the binding's value, then push it.
    WidgetMirror { binding: BindingId, value: f32 },
}

impl From<ParameterValue> for RouterAction {
    fn from(p: ParameterValue) -> Self {
        RouterAction::ParameterPush {
            address: p.address,
            value: p.value,
        }
    }
}

pub type Actions = SmallVec<[RouterAction; 4]>;

/// A widget-changed callback from the host UI layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    FloatSlider { control: ControlId, value: f32 },
    IntSlider { control: ControlId, value: i32 },
    Dropdown { control: ControlId, selected: usize },
    RadioButton { control: ControlId, selected: usize },
    Checkbox { control: ControlId, checked: bool },
}

impl ControlEvent {
    pub fn control(&self) -> ControlId {
        match *self {
            ControlEvent::FloatSlider { control, .. }
            | ControlEvent::IntSlider { control, .. }
            | ControlEvent::Dropdown { control, .. }
            | ControlEvent::RadioButton { control, .. }
            | ControlEvent::Checkbox { control, .. } => control,
        }
    }
}

#[derive(Debug, Default)]
pub struct EventRouter {
    surface: ControlSurface,
}

impl EventRouter {
    pub fn new(surface: ControlSurface) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &ControlSurface {
        &self.surface
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.surface.bindings
    }

    /// Record a widget change and return the writes it causes.
    ///
    /// Float-slider events are matched against ADSR sub-controls before plain
    /// float sliders. Unknown controls produce no actions.
    pub fn control_changed(&mut self, event: ControlEvent) -> Actions {
        let bindings = &mut self.surface.bindings;
        let mut actions = Actions::new();

        match event {
            ControlEvent::FloatSlider { control, value } => {
                if let Some((slot, stage)) = bindings.adsr_for(control) {
                    let adsr = &mut bindings.adsrs[slot];
                    adsr.set_display(stage, value);
                    extend(&mut actions, adsr.stage_updates(stage));
                } else if let Some(slider) = bindings
                    .float_sliders
                    .iter_mut()
                    .find(|b| b.control() == control)
                {
                    slider.set_value(value);
                    actions.push(slider.push().into());
                }
            }
            ControlEvent::IntSlider { control, value } => {
                if let Some(slider) = bindings
                    .int_sliders
                    .iter_mut()
                    .find(|b| b.control() == control)
                {
                    slider.set_value(value);
                    actions.push(slider.push().into());
                }
            }
            ControlEvent::Dropdown { control, selected } => {
                if let Some(choice) = bindings
                    .dropdowns
                    .iter_mut()
                    .find(|b| b.control() == control)
                {
                    select(&mut actions, choice, selected);
                }
            }
            ControlEvent::RadioButton { control, selected } => {
                if let Some(choice) = bindings
                    .radio_groups
                    .iter_mut()
                    .find(|b| b.control() == control)
                {
                    select(&mut actions, choice, selected);
                }
            }
            ControlEvent::Checkbox { control, checked } => {
                if let Some(checkbox) = bindings
                    .checkboxes
                    .iter_mut()
                    .find(|b| b.control() == control)
                {
                    checkbox.set_checked(checked);
                    actions.push(checkbox.push().into());
                }
            }
        }

        if actions.is_empty() {
            tracing::trace!("No parameter writes for {:?}", event);
        }
        actions
    }

    /// Actions for a transport SysEx payload (framing already stripped).
    ///
    /// Anything that is not a well-formed KeyStep Pro transport message is
    /// ignored.
    pub fn handle_sysex(&self, sysex: &SysEx) -> Actions {
        match sysex.transport_command() {
            Some(command) => self.transport(command),
            None => Actions::new(),
        }
    }

    /// Fire every trigger registered for `command`'s kind, in registration order.
    pub fn transport(&self, command: TransportCommand) -> Actions {
        let kind = command.kind();
        let bindings = &self.surface.bindings;
        let mut actions = Actions::new();

        for trigger in self.surface.triggers.iter().filter(|t| t.kind == kind) {
            match &trigger.action {
                TriggerAction::Widget { binding, reaction } => {
                    if let Some(value) = bindings.reaction_target(*binding, *reaction) {
                        actions.push(RouterAction::WidgetMirror {
                            binding: *binding,
                            value,
                        });
                    }
                }
                TriggerAction::Global { values, mirrors } => {
                    actions.extend(values.iter().copied().map(RouterAction::from));
                    actions.extend(mirrors.iter().map(|&(binding, value)| {
                        RouterAction::WidgetMirror { binding, value }
                    }));
                }
            }
        }

        tracing::debug!("Transport {:?}: {} actions", command, actions.len());
        actions
    }

    /// Perform `actions` in order. Returns the number of parameter writes.
    pub fn apply(&mut self, actions: &[RouterAction], plugin: &mut dyn PluginHandle) -> usize {
        let mut writes = 0;
        for action in actions {
            match *action {
                RouterAction::ParameterPush { address, value } => {
                    plugin.set_param(address, value);
                    writes += 1;
                }
                RouterAction::WidgetMirror { binding, value } => {
                    for push in self.surface.bindings.mirror(binding, value) {
                        plugin.set_param(push.address, push.value);
                        writes += 1;
                    }
                }
            }
        }
        writes
    }
}

fn extend(actions: &mut Actions, pushes: Pushes) {
    actions.extend(pushes.into_iter().map(RouterAction::from));
}

/// Option writes first, then its mirrors, each in declared order.
fn select(actions: &mut Actions, choice: &mut ChoiceBinding, index: usize) {
    if let Some(option) = choice.select(index) {
        actions.extend(option.values.iter().copied().map(RouterAction::from));
        actions.extend(
            option
                .mirrors
                .iter()
                .map(|&(binding, value)| RouterAction::WidgetMirror { binding, value }),
        );
    }
}
