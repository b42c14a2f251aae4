//! Materializes a parsed [`UiDescriptor`] into live bindings and triggers.

use aatest_midi::TransportKind;

use crate::binding::{
    AdsrBinding, BindingId, BindingSet, CheckboxBinding, ChoiceBinding, ChoiceStyle,
    FloatSliderBinding, IntSliderBinding,
};
use crate::gui::schema::{
    ChoiceSpec, MidiTriggerSpec, ParameterValue, SchemaError, SchemaResult, TriggerReaction,
    UiDescriptor, WidgetAssignment, WidgetDescriptor, WidgetFrame, WidgetKind,
};
use crate::gui::{ControlIdAllocator, LayoutChain, Rect};

/// What a transport trigger does when its button is pressed.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerAction {
    /// Drive one widget (from `midi_toggle` / `midi_on` / `midi_off`).
    Widget {
        binding: BindingId,
        reaction: TriggerReaction,
    },
    /// Module-wide writes and mirrors (from `global_midi`).
    Global {
        values: Vec<ParameterValue>,
        mirrors: Vec<(BindingId, f32)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MidiTrigger {
    pub kind: TransportKind,
    pub action: TriggerAction,
}

/// Bindings plus transport triggers of one module instance.
#[derive(Debug, Default)]
pub struct ControlSurface {
    pub bindings: BindingSet,
    /// Registration order.
    pub triggers: Vec<MidiTrigger>,
}

/// Option side effects awaiting name resolution.
struct PendingMirrors<'a> {
    binding: BindingId,
    option: usize,
    context: String,
    assignments: &'a [WidgetAssignment],
}

impl ControlSurface {
    /// Build every binding described by `descriptor`.
    ///
    /// Nothing is returned on error: a descriptor either yields a complete
    /// surface or none at all.
    pub fn build(descriptor: &UiDescriptor, ids: &mut ControlIdAllocator) -> SchemaResult<Self> {
        let mut bindings = BindingSet::new();
        let mut chain = LayoutChain::new();
        let mut pending = Vec::new();
        let mut widget_triggers = Vec::new();

        for widget in &descriptor.widgets {
            let kind = widget.kind();
            match widget {
                WidgetDescriptor::FloatSlider(spec) => {
                    let Some(rect) = place(&mut chain, kind, &spec.frame) else {
                        continue;
                    };
                    let id = BindingId::new(kind, bindings.float_sliders.len());
                    bindings
                        .float_sliders
                        .push(FloatSliderBinding::from_spec(spec, ids.allocate(), rect));
                    register(&mut widget_triggers, id, &spec.triggers);
                }
                WidgetDescriptor::IntSlider(spec) => {
                    let Some(rect) = place(&mut chain, kind, &spec.frame) else {
                        continue;
                    };
                    let id = BindingId::new(kind, bindings.int_sliders.len());
                    bindings
                        .int_sliders
                        .push(IntSliderBinding::from_spec(spec, ids.allocate(), rect));
                    register(&mut widget_triggers, id, &spec.triggers);
                }
                WidgetDescriptor::Adsr(spec) => {
                    let Some(rect) = place(&mut chain, kind, &spec.frame) else {
                        continue;
                    };
                    let controls = [ids.allocate(), ids.allocate(), ids.allocate(), ids.allocate()];
                    bindings
                        .adsrs
                        .push(AdsrBinding::from_spec(spec, controls, rect));
                }
                WidgetDescriptor::Dropdown(spec) => {
                    let Some(rect) = place(&mut chain, kind, &spec.frame) else {
                        continue;
                    };
                    let id = BindingId::new(kind, bindings.dropdowns.len());
                    bindings.dropdowns.push(ChoiceBinding::from_spec(
                        spec,
                        ChoiceStyle::Dropdown,
                        ids.allocate(),
                        rect,
                    ));
                    defer_mirrors(&mut pending, id, spec);
                }
                WidgetDescriptor::RadioGroup(spec) => {
                    let Some(rect) = place(&mut chain, kind, &spec.choice.frame) else {
                        continue;
                    };
                    let id = BindingId::new(kind, bindings.radio_groups.len());
                    bindings.radio_groups.push(ChoiceBinding::from_spec(
                        &spec.choice,
                        ChoiceStyle::Radio(spec.direction),
                        ids.allocate(),
                        rect,
                    ));
                    defer_mirrors(&mut pending, id, &spec.choice);
                }
                WidgetDescriptor::Checkbox(spec) => {
                    let Some(rect) = place(&mut chain, kind, &spec.frame) else {
                        continue;
                    };
                    let id = BindingId::new(kind, bindings.checkboxes.len());
                    bindings
                        .checkboxes
                        .push(CheckboxBinding::from_spec(spec, ids.allocate(), rect));
                    register(&mut widget_triggers, id, &spec.triggers);
                }
                WidgetDescriptor::Decorative(spec) => bindings.decorations.push(spec.clone()),
            }
        }

        for p in pending {
            let mirrors = resolve(&bindings, p.assignments, &p.context)?;
            let group = match p.binding.kind {
                WidgetKind::Dropdown => &mut bindings.dropdowns,
                _ => &mut bindings.radio_groups,
            };
            if let Some(option) = group
                .get_mut(p.binding.slot)
                .and_then(|choice| choice.option_mut(p.option))
            {
                option.mirrors = mirrors;
            }
        }

        let mut triggers = widget_triggers;
        for (i, global) in descriptor.global_midi.iter().enumerate() {
            let context = format!("global_midi[{}]", i);
            triggers.push(MidiTrigger {
                kind: global.kind,
                action: TriggerAction::Global {
                    values: global.values.clone(),
                    mirrors: resolve(&bindings, &global.set_widgets, &context)?,
                },
            });
        }

        for adsr in &mut bindings.adsrs {
            adsr.set_active(true);
        }

        tracing::debug!(
            "Built control surface '{}': {} bindings, {} triggers",
            descriptor.name,
            bindings.len(),
            triggers.len()
        );

        Ok(Self { bindings, triggers })
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.bindings.decorations.is_empty()
    }
}

fn place(chain: &mut LayoutChain, kind: WidgetKind, frame: &WidgetFrame) -> Option<Rect> {
    chain.place(kind, &frame.name, frame.placement, frame.w, frame.h)
}

fn register(triggers: &mut Vec<MidiTrigger>, binding: BindingId, specs: &[MidiTriggerSpec]) {
    triggers.extend(specs.iter().map(|spec| MidiTrigger {
        kind: spec.kind,
        action: TriggerAction::Widget {
            binding,
            reaction: spec.reaction,
        },
    }));
}

fn defer_mirrors<'a>(
    pending: &mut Vec<PendingMirrors<'a>>,
    binding: BindingId,
    spec: &'a ChoiceSpec,
) {
    for (option, entry) in spec.options.iter().enumerate() {
        if entry.set_widgets.is_empty() {
            continue;
        }
        pending.push(PendingMirrors {
            binding,
            option,
            context: format!("{} '{}' option '{}'", binding.kind, spec.frame.name, entry.name),
            assignments: &entry.set_widgets,
        });
    }
}

fn resolve(
    bindings: &BindingSet,
    assignments: &[WidgetAssignment],
    context: &str,
) -> SchemaResult<Vec<(BindingId, f32)>> {
    assignments
        .iter()
        .map(|assignment| {
            let id = bindings.lookup_name(&assignment.widget).ok_or_else(|| {
                SchemaError::UnknownWidgetReference {
                    context: context.to_string(),
                    widget: assignment.widget.clone(),
                }
            })?;
            if !BindingSet::accepts_mirror(id.kind) {
                return Err(SchemaError::InvalidMirrorTarget {
                    context: context.to_string(),
                    widget: assignment.widget.clone(),
                    kind: id.kind,
                });
            }
            Ok((id, assignment.value))
        })
        .collect()
}
