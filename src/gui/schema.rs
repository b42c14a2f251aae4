//! JSON UI descriptor parsing.
//!
//! A module's descriptor is parsed into a closed set of typed widget
//! descriptions before any binding is created. Categories that are absent
//! mean "no widgets of that kind"; a present element that lacks a required
//! field, or carries one of the wrong JSON type, rejects the whole document.

use aatest_midi::TransportKind;
use aatest_plugin::ParameterAddress;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use super::layout::{AnchorDirection, Placement};

const SLIDERS: &str = "sliders";
const ADSRS: &str = "adsrs";
const DROPDOWNS: &str = "dropdowns";
const CHECKBOXES: &str = "checkboxes";
const RADIO_BUTTONS: &str = "radio_buttons";
const GLOBAL_MIDI: &str = "global_midi";
const LOGOS: &str = "logos";
const FOUR_TRACKS: &str = "four_tracks";

const CATEGORIES: [&str; 8] = [
    SLIDERS,
    ADSRS,
    DROPDOWNS,
    CHECKBOXES,
    RADIO_BUTTONS,
    GLOBAL_MIDI,
    LOGOS,
    FOUR_TRACKS,
];

pub const DROPDOWN_WIDTH: f32 = 80.0;
pub const DROPDOWN_HEIGHT: f32 = 15.0;
pub const CHECKBOX_WIDTH: f32 = 60.0;
pub const CHECKBOX_HEIGHT: f32 = 15.0;
pub const RADIO_ITEM_WIDTH: f32 = 60.0;
pub const RADIO_ITEM_HEIGHT: f32 = 15.0;
pub const FOUR_TRACK_HEIGHT: f32 = 160.0;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{context}: expected a JSON object")]
    NotAnObject { context: String },

    #[error("{context}: missing required field '{field}'")]
    MissingField { context: String, field: &'static str },

    #[error("{context}: field '{field}' must be {expected}")]
    WrongType {
        context: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("{context}: invalid value {value} for '{field}'")]
    InvalidValue {
        context: String,
        field: &'static str,
        value: String,
    },

    #[error("{context}: unknown widget type '{kind}'")]
    UnknownWidgetKind { context: String, kind: String },

    #[error("Unknown widget category '{0}'")]
    UnknownCategory(String),

    #[error("{context}: no widget named '{widget}'")]
    UnknownWidgetReference { context: String, widget: String },

    #[error("{context}: widget '{widget}' is a {kind} and cannot mirror a value")]
    InvalidMirrorTarget {
        context: String,
        widget: String,
        kind: WidgetKind,
    },
}

pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    FloatSlider,
    IntSlider,
    Adsr,
    Dropdown,
    Checkbox,
    RadioGroup,
    Decorative,
}

impl WidgetKind {
    pub const COUNT: usize = 7;

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::FloatSlider => "float slider",
            WidgetKind::IntSlider => "int slider",
            WidgetKind::Adsr => "ADSR",
            WidgetKind::Dropdown => "dropdown",
            WidgetKind::Checkbox => "checkbox",
            WidgetKind::RadioGroup => "radio group",
            WidgetKind::Decorative => "decoration",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name, size and placement shared by every interactive widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetFrame {
    pub name: String,
    pub placement: Placement,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReaction {
    Toggle,
    On,
    Off,
}

/// Widget-level reaction to a transport button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiTriggerSpec {
    pub kind: TransportKind,
    pub reaction: TriggerReaction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatSliderSpec {
    pub frame: WidgetFrame,
    pub address: ParameterAddress,
    pub init: f32,
    pub min: f32,
    pub max: f32,
    /// `None` = automatic display precision.
    pub digits: Option<u32>,
    pub triggers: Vec<MidiTriggerSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntSliderSpec {
    pub frame: WidgetFrame,
    pub address: ParameterAddress,
    pub init: i32,
    pub min: i32,
    pub max: i32,
    pub map_to_float: Option<FloatRange>,
    pub triggers: Vec<MidiTriggerSpec>,
}

/// One envelope leg: where it lives in the plugin and its plugin-side range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeStageSpec {
    pub index: i32,
    pub init: f32,
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdsrSpec {
    pub frame: WidgetFrame,
    pub node: i32,
    pub attack: EnvelopeStageSpec,
    pub decay: EnvelopeStageSpec,
    pub sustain: EnvelopeStageSpec,
    pub release: EnvelopeStageSpec,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterValue {
    pub address: ParameterAddress,
    pub value: f32,
}

/// Side effect: mirror `value` into the binding called `widget`.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetAssignment {
    pub widget: String,
    pub value: f32,
}

/// One dropdown entry or radio button.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    pub name: String,
    pub values: Vec<ParameterValue>,
    pub set_widgets: Vec<WidgetAssignment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceSpec {
    pub frame: WidgetFrame,
    pub options: Vec<OptionSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadioDirection {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadioSpec {
    pub choice: ChoiceSpec,
    pub direction: RadioDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxSpec {
    pub frame: WidgetFrame,
    pub address: ParameterAddress,
    pub init: bool,
    pub triggers: Vec<MidiTriggerSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecorativeSpec {
    Logo {
        x: f32,
        y: f32,
        scale_x: f32,
        scale_y: f32,
    },
    FourTrack {
        x: f32,
        y: f32,
        w: f32,
        length_secs: f32,
    },
}

/// Module-wide reaction to a transport button.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalMidiSpec {
    pub kind: TransportKind,
    pub values: Vec<ParameterValue>,
    pub set_widgets: Vec<WidgetAssignment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetDescriptor {
    FloatSlider(FloatSliderSpec),
    IntSlider(IntSliderSpec),
    Adsr(AdsrSpec),
    Dropdown(ChoiceSpec),
    Checkbox(CheckboxSpec),
    RadioGroup(RadioSpec),
    Decorative(DecorativeSpec),
}

impl WidgetDescriptor {
    pub fn kind(&self) -> WidgetKind {
        match self {
            WidgetDescriptor::FloatSlider(_) => WidgetKind::FloatSlider,
            WidgetDescriptor::IntSlider(_) => WidgetKind::IntSlider,
            WidgetDescriptor::Adsr(_) => WidgetKind::Adsr,
            WidgetDescriptor::Dropdown(_) => WidgetKind::Dropdown,
            WidgetDescriptor::Checkbox(_) => WidgetKind::Checkbox,
            WidgetDescriptor::RadioGroup(_) => WidgetKind::RadioGroup,
            WidgetDescriptor::Decorative(_) => WidgetKind::Decorative,
        }
    }
}

/// Parsed UI descriptor. Widgets keep JSON array order within each category.
#[derive(Debug, Clone, PartialEq)]
pub struct UiDescriptor {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub widgets: Vec<WidgetDescriptor>,
    pub global_midi: Vec<GlobalMidiSpec>,
}

impl UiDescriptor {
    pub fn from_json(text: &str) -> SchemaResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> SchemaResult<Self> {
        let root = Element::root(value)?;
        let name = root.string("name")?;
        let width = root.number("width")?;
        let height = root.number("height")?;

        let mut descriptor = UiDescriptor {
            name,
            width,
            height,
            widgets: Vec::new(),
            global_midi: Vec::new(),
        };

        let Some(widgets) = root.opt_object("widgets")? else {
            return Ok(descriptor);
        };

        if let Some(unknown) = widgets.keys().find(|k| !CATEGORIES.contains(&k.as_str())) {
            return Err(SchemaError::UnknownCategory(unknown.clone()));
        }

        for (i, value) in elements(widgets, SLIDERS)?.iter().enumerate() {
            descriptor
                .widgets
                .push(parse_slider(&Element::new(SLIDERS, i, value)?)?);
        }
        for (i, value) in elements(widgets, ADSRS)?.iter().enumerate() {
            let element = Element::new(ADSRS, i, value)?;
            descriptor
                .widgets
                .push(WidgetDescriptor::Adsr(parse_adsr(&element)?));
        }
        for (i, value) in elements(widgets, DROPDOWNS)?.iter().enumerate() {
            let element = Element::new(DROPDOWNS, i, value)?;
            descriptor
                .widgets
                .push(WidgetDescriptor::Dropdown(parse_dropdown(&element)?));
        }
        for (i, value) in elements(widgets, RADIO_BUTTONS)?.iter().enumerate() {
            let element = Element::new(RADIO_BUTTONS, i, value)?;
            descriptor
                .widgets
                .push(WidgetDescriptor::RadioGroup(parse_radio(&element)?));
        }
        for (i, value) in elements(widgets, CHECKBOXES)?.iter().enumerate() {
            let element = Element::new(CHECKBOXES, i, value)?;
            descriptor
                .widgets
                .push(WidgetDescriptor::Checkbox(parse_checkbox(&element)?));
        }
        for (i, value) in elements(widgets, LOGOS)?.iter().enumerate() {
            let element = Element::new(LOGOS, i, value)?;
            descriptor.widgets.push(WidgetDescriptor::Decorative(
                DecorativeSpec::Logo {
                    x: element.int("x")? as f32,
                    y: element.int("y")? as f32,
                    scale_x: element.opt_number("scale_x")?.unwrap_or(1.0),
                    scale_y: element.opt_number("scale_y")?.unwrap_or(1.0),
                },
            ));
        }
        for (i, value) in elements(widgets, FOUR_TRACKS)?.iter().enumerate() {
            let element = Element::new(FOUR_TRACKS, i, value)?;
            descriptor.widgets.push(WidgetDescriptor::Decorative(
                DecorativeSpec::FourTrack {
                    x: element.int("x")? as f32,
                    y: element.int("y")? as f32,
                    w: element.int("w")? as f32,
                    length_secs: element.opt_number("length_secs")?.unwrap_or(8.0),
                },
            ));
        }
        for (i, value) in elements(widgets, GLOBAL_MIDI)?.iter().enumerate() {
            let element = Element::new(GLOBAL_MIDI, i, value)?;
            descriptor.global_midi.push(parse_global_midi(&element)?);
        }

        Ok(descriptor)
    }

    pub fn count(&self, kind: WidgetKind) -> usize {
        self.widgets.iter().filter(|w| w.kind() == kind).count()
    }
}

fn elements<'a>(
    widgets: &'a Map<String, Value>,
    category: &'static str,
) -> SchemaResult<&'a [Value]> {
    match widgets.get(category) {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(SchemaError::WrongType {
            context: "widgets".to_string(),
            field: category,
            expected: "an array",
        }),
    }
}

/// Integers may be written as integral reals (`10.0`) by float-only encoders.
fn as_int(value: &Value) -> Option<i32> {
    if let Some(n) = value.as_i64() {
        return i32::try_from(n).ok();
    }
    let n = value.as_f64()?;
    let in_range = n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX);
    (n.fract() == 0.0 && in_range).then_some(n as i32)
}

/// Typed field access on one JSON object, reporting errors with its location.
struct Element<'a> {
    context: String,
    fields: &'a Map<String, Value>,
}

impl<'a> Element<'a> {
    fn root(value: &'a Value) -> SchemaResult<Self> {
        Self::with_context("descriptor".to_string(), value)
    }

    fn new(category: &str, index: usize, value: &'a Value) -> SchemaResult<Self> {
        Self::with_context(format!("{}[{}]", category, index), value)
    }

    fn nested(&self, field: &str, index: usize, value: &'a Value) -> SchemaResult<Self> {
        Self::with_context(format!("{}.{}[{}]", self.context, field, index), value)
    }

    fn with_context(context: String, value: &'a Value) -> SchemaResult<Self> {
        match value.as_object() {
            Some(fields) => Ok(Self { context, fields }),
            None => Err(SchemaError::NotAnObject { context }),
        }
    }

    /// `null` counts as absent.
    fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    fn missing(&self, field: &'static str) -> SchemaError {
        SchemaError::MissingField {
            context: self.context.clone(),
            field,
        }
    }

    fn wrong_type(&self, field: &'static str, expected: &'static str) -> SchemaError {
        SchemaError::WrongType {
            context: self.context.clone(),
            field,
            expected,
        }
    }

    fn invalid(&self, field: &'static str, value: impl fmt::Display) -> SchemaError {
        SchemaError::InvalidValue {
            context: self.context.clone(),
            field,
            value: value.to_string(),
        }
    }

    fn opt_string(&self, field: &'static str) -> SchemaResult<Option<String>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.wrong_type(field, "a string")),
        }
    }

    fn string(&self, field: &'static str) -> SchemaResult<String> {
        self.opt_string(field)?.ok_or_else(|| self.missing(field))
    }

    fn opt_int(&self, field: &'static str) -> SchemaResult<Option<i32>> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => as_int(v)
                .map(Some)
                .ok_or_else(|| self.wrong_type(field, "an integer")),
        }
    }

    fn int(&self, field: &'static str) -> SchemaResult<i32> {
        self.opt_int(field)?.ok_or_else(|| self.missing(field))
    }

    fn opt_number(&self, field: &'static str) -> SchemaResult<Option<f32>> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .map(|n| Some(n as f32))
                .ok_or_else(|| self.wrong_type(field, "a number")),
        }
    }

    fn number(&self, field: &'static str) -> SchemaResult<f32> {
        self.opt_number(field)?.ok_or_else(|| self.missing(field))
    }

    fn opt_bool(&self, field: &'static str) -> SchemaResult<Option<bool>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.wrong_type(field, "a boolean")),
        }
    }

    fn opt_object(&self, field: &'static str) -> SchemaResult<Option<&'a Map<String, Value>>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(self.wrong_type(field, "an object")),
        }
    }

    fn child(&self, field: &'static str) -> SchemaResult<Option<Element<'a>>> {
        Ok(self.opt_object(field)?.map(|fields| Element {
            context: format!("{}.{}", self.context, field),
            fields,
        }))
    }

    fn opt_array(&self, field: &'static str) -> SchemaResult<&'a [Value]> {
        match self.get(field) {
            None => Ok(&[][..]),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(self.wrong_type(field, "an array")),
        }
    }

    fn address(&self) -> SchemaResult<ParameterAddress> {
        Ok(ParameterAddress::new(self.int("node")?, self.int("index")?))
    }

    fn placement(&self) -> SchemaResult<Placement> {
        match self.opt_string("anchored")? {
            Some(name) => AnchorDirection::from_name(&name)
                .map(Placement::Anchored)
                .ok_or_else(|| self.invalid("anchored", name)),
            None => Ok(Placement::Absolute {
                x: self.int("x")? as f32,
                y: self.int("y")? as f32,
            }),
        }
    }

    fn frame(&self, default_size: Option<(f32, f32)>) -> SchemaResult<WidgetFrame> {
        let (w, h) = match default_size {
            Some((w, h)) => (
                self.opt_int("w")?.map_or(w, |v| v as f32),
                self.opt_int("h")?.map_or(h, |v| v as f32),
            ),
            None => (self.int("w")? as f32, self.int("h")? as f32),
        };
        Ok(WidgetFrame {
            name: self.string("name")?,
            placement: self.placement()?,
            w,
            h,
        })
    }

    fn triggers(&self) -> SchemaResult<Vec<MidiTriggerSpec>> {
        let mut triggers = Vec::new();
        for (field, reaction) in [
            ("midi_toggle", TriggerReaction::Toggle),
            ("midi_on", TriggerReaction::On),
            ("midi_off", TriggerReaction::Off),
        ] {
            if let Some(name) = self.opt_string(field)? {
                let kind =
                    TransportKind::from_name(&name).ok_or_else(|| self.invalid(field, &name))?;
                triggers.push(MidiTriggerSpec { kind, reaction });
            }
        }
        Ok(triggers)
    }

    fn parameter_values(&self) -> SchemaResult<Vec<ParameterValue>> {
        self.opt_array("values")?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let value = self.nested("values", i, v)?;
                Ok(ParameterValue {
                    address: value.address()?,
                    value: value.number("value")?,
                })
            })
            .collect()
    }

    fn widget_assignments(&self) -> SchemaResult<Vec<WidgetAssignment>> {
        self.opt_array("set_widgets")?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let assignment = self.nested("set_widgets", i, v)?;
                Ok(WidgetAssignment {
                    widget: assignment.string("widget")?,
                    value: assignment.number("value")?,
                })
            })
            .collect()
    }
}

fn parse_slider(element: &Element) -> SchemaResult<WidgetDescriptor> {
    let kind = element
        .opt_string("type")?
        .unwrap_or_else(|| "float_slider".to_string());

    match kind.as_str() {
        "float_slider" => Ok(WidgetDescriptor::FloatSlider(FloatSliderSpec {
            frame: element.frame(None)?,
            address: element.address()?,
            init: element.number("init")?,
            min: element.number("min")?,
            max: element.number("max")?,
            digits: element
                .opt_int("digits")?
                .and_then(|d| u32::try_from(d).ok()),
            triggers: element.triggers()?,
        })),
        "int_slider" => {
            let min = element.int("min")?;
            let max = element.int("max")?;
            let map_to_float = match element.child("map_to_float")? {
                Some(curve) => {
                    if min == max {
                        return Err(element.invalid("min", format!("{min} (equal to max)")));
                    }
                    Some(FloatRange {
                        min: curve.number("min")?,
                        max: curve.number("max")?,
                    })
                }
                None => None,
            };
            Ok(WidgetDescriptor::IntSlider(IntSliderSpec {
                frame: element.frame(None)?,
                address: element.address()?,
                init: element.int("init")?,
                min,
                max,
                map_to_float,
                triggers: element.triggers()?,
            }))
        }
        _ => Err(SchemaError::UnknownWidgetKind {
            context: element.context.clone(),
            kind,
        }),
    }
}

fn parse_stage(
    element: &Element,
    index: &'static str,
    init: &'static str,
    min: &'static str,
    max: &'static str,
) -> SchemaResult<EnvelopeStageSpec> {
    let stage = EnvelopeStageSpec {
        index: element.int(index)?,
        init: element.number(init)?,
        min: element.number(min)?,
        max: element.number(max)?,
    };
    if stage.min == stage.max {
        return Err(element.invalid(min, format!("{} (equal to {})", stage.min, max)));
    }
    Ok(stage)
}

fn parse_adsr(element: &Element) -> SchemaResult<AdsrSpec> {
    Ok(AdsrSpec {
        frame: element.frame(None)?,
        node: element.int("node")?,
        attack: parse_stage(element, "indexA", "initA", "minA", "maxA")?,
        decay: parse_stage(element, "indexD", "initD", "minD", "maxD")?,
        sustain: parse_stage(element, "indexS", "initS", "minS", "maxS")?,
        release: parse_stage(element, "indexR", "initR", "minR", "maxR")?,
    })
}

fn parse_options(element: &Element) -> SchemaResult<Vec<OptionSpec>> {
    element
        .opt_array("params")?
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let option = element.nested("params", i, v)?;
            Ok(OptionSpec {
                name: option.string("name")?,
                values: option.parameter_values()?,
                set_widgets: option.widget_assignments()?,
            })
        })
        .collect()
}

fn parse_dropdown(element: &Element) -> SchemaResult<ChoiceSpec> {
    Ok(ChoiceSpec {
        frame: element.frame(Some((DROPDOWN_WIDTH, DROPDOWN_HEIGHT)))?,
        options: parse_options(element)?,
    })
}

fn parse_radio(element: &Element) -> SchemaResult<RadioSpec> {
    let direction = match element.opt_string("direction")?.as_deref() {
        None | Some("direction_vertical") => RadioDirection::Vertical,
        Some("direction_horizontal") => RadioDirection::Horizontal,
        Some(other) => return Err(element.invalid("direction", other)),
    };
    let options = parse_options(element)?;
    let count = options.len().max(1) as f32;
    let default_size = match direction {
        RadioDirection::Vertical => (RADIO_ITEM_WIDTH, RADIO_ITEM_HEIGHT * count),
        RadioDirection::Horizontal => (RADIO_ITEM_WIDTH * count, RADIO_ITEM_HEIGHT),
    };
    Ok(RadioSpec {
        choice: ChoiceSpec {
            frame: element.frame(Some(default_size))?,
            options,
        },
        direction,
    })
}

fn parse_checkbox(element: &Element) -> SchemaResult<CheckboxSpec> {
    Ok(CheckboxSpec {
        frame: element.frame(Some((CHECKBOX_WIDTH, CHECKBOX_HEIGHT)))?,
        address: element.address()?,
        init: element.opt_bool("init")?.unwrap_or(false),
        triggers: element.triggers()?,
    })
}

fn parse_global_midi(element: &Element) -> SchemaResult<GlobalMidiSpec> {
    let name = element.string("trigger")?;
    let kind = TransportKind::from_name(&name).ok_or_else(|| element.invalid("trigger", &name))?;
    Ok(GlobalMidiSpec {
        kind,
        values: element.parameter_values()?,
        set_widgets: element.widget_assignments()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> SchemaResult<UiDescriptor> {
        UiDescriptor::from_value(&value)
    }

    fn float_slider(name: &str) -> Value {
        json!({
            "name": name, "x": 5, "y": 10, "w": 100, "h": 15,
            "init": 0.5, "min": 0.0, "max": 1.0, "node": 0, "index": 1
        })
    }

    #[test]
    fn test_missing_widgets_is_empty() {
        let ui = parse(json!({"name": "Sine", "width": 200, "height": 120.5})).unwrap();
        assert_eq!(ui.name, "Sine");
        assert_eq!(ui.width, 200.0);
        assert_eq!(ui.height, 120.5);
        assert!(ui.widgets.is_empty());
        assert!(ui.global_midi.is_empty());
    }

    #[test]
    fn test_missing_category_is_zero_widgets() {
        let ui = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"sliders": [float_slider("gain")]}
        }))
        .unwrap();
        assert_eq!(ui.count(WidgetKind::FloatSlider), 1);
        assert_eq!(ui.count(WidgetKind::Dropdown), 0);
    }

    #[test]
    fn test_top_level_fields_required() {
        let err = parse(json!({"width": 1, "height": 1})).unwrap_err();
        assert!(matches!(err, SchemaError::MissingField { field: "name", .. }));

        let err = parse(json!({"name": "m", "width": "wide", "height": 1})).unwrap_err();
        assert!(matches!(err, SchemaError::WrongType { field: "width", .. }));
    }

    #[test]
    fn test_float_slider_fields() {
        let mut slider = float_slider("cutoff");
        slider["digits"] = json!(3);
        let ui = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"sliders": [slider]}
        }))
        .unwrap();
        match &ui.widgets[0] {
            WidgetDescriptor::FloatSlider(spec) => {
                assert_eq!(spec.frame.name, "cutoff");
                assert_eq!(spec.frame.placement, Placement::Absolute { x: 5.0, y: 10.0 });
                assert_eq!(spec.address, ParameterAddress::new(0, 1));
                assert_eq!(spec.digits, Some(3));
            }
            other => panic!("Expected float slider, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_digits_means_automatic() {
        let mut slider = float_slider("gain");
        slider["digits"] = json!(-1);
        let ui = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"sliders": [slider]}
        }))
        .unwrap();
        let WidgetDescriptor::FloatSlider(spec) = &ui.widgets[0] else {
            panic!("Expected float slider");
        };
        assert_eq!(spec.digits, None);
    }

    #[test]
    fn test_missing_required_field_names_element() {
        let mut broken = float_slider("b");
        broken.as_object_mut().unwrap().remove("index");
        let err = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"sliders": [float_slider("a"), broken]}
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "sliders[1]: missing required field 'index'"
        );
    }

    #[test]
    fn test_wrong_type_is_fatal() {
        let mut broken = float_slider("a");
        broken["init"] = json!("loud");
        let err = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"sliders": [broken]}
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::WrongType { field: "init", .. }));
    }

    #[test]
    fn test_integral_reals_accepted_as_integers() {
        let mut slider = float_slider("gain");
        slider["x"] = json!(10.0);
        slider["w"] = json!(120.0);
        slider["node"] = json!(2.0);
        let ui = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"sliders": [
                slider,
                {"type": "int_slider", "name": "steps", "x": 0, "y": 30.0, "w": 100, "h": 15,
                 "init": 1.0, "min": 0.0, "max": 4.0, "node": 0, "index": 3.0}
            ]}
        }))
        .unwrap();

        let WidgetDescriptor::FloatSlider(spec) = &ui.widgets[0] else {
            panic!("Expected float slider");
        };
        assert_eq!(spec.frame.placement, Placement::Absolute { x: 10.0, y: 10.0 });
        assert_eq!(spec.frame.w, 120.0);
        assert_eq!(spec.address, ParameterAddress::new(2, 1));

        let WidgetDescriptor::IntSlider(spec) = &ui.widgets[1] else {
            panic!("Expected int slider");
        };
        assert_eq!((spec.init, spec.min, spec.max), (1, 0, 4));
        assert_eq!(spec.address, ParameterAddress::new(0, 3));
    }

    #[test]
    fn test_fractional_or_out_of_range_integer_rejected() {
        for x in [json!(10.5), json!(1e12), json!(-3_000_000_000i64)] {
            let mut slider = float_slider("gain");
            slider["x"] = x;
            let err = parse(json!({
                "name": "m", "width": 1, "height": 1,
                "widgets": {"sliders": [slider]}
            }))
            .unwrap_err();
            assert!(matches!(err, SchemaError::WrongType { field: "x", .. }));
        }
    }

    #[test]
    fn test_int_slider_with_curve() {
        let ui = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"sliders": [{
                "type": "int_slider", "name": "steps", "x": 0, "y": 0, "w": 80, "h": 15,
                "init": 2, "min": 0, "max": 8, "node": 1, "index": 0,
                "map_to_float": {"min": 0.0, "max": 1.0}
            }]}
        }))
        .unwrap();
        let WidgetDescriptor::IntSlider(spec) = &ui.widgets[0] else {
            panic!("Expected int slider");
        };
        assert_eq!(spec.map_to_float, Some(FloatRange { min: 0.0, max: 1.0 }));
        assert_eq!((spec.min, spec.max, spec.init), (0, 8, 2));
    }

    #[test]
    fn test_int_slider_degenerate_curve_rejected() {
        let err = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"sliders": [{
                "type": "int_slider", "name": "one", "x": 0, "y": 0, "w": 80, "h": 15,
                "init": 3, "min": 3, "max": 3, "node": 1, "index": 0,
                "map_to_float": {"min": 0.0, "max": 1.0}
            }]}
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidValue { field: "min", .. }));
    }

    #[test]
    fn test_unknown_slider_type_rejected() {
        let mut slider = float_slider("a");
        slider["type"] = json!("knob");
        let err = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"sliders": [slider]}
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownWidgetKind { ref kind, .. } if kind == "knob"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"knobs": []}
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownCategory(ref k) if k == "knobs"));
    }

    #[test]
    fn test_anchored_needs_no_coordinates() {
        let ui = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"sliders": [
                float_slider("a"),
                {"name": "b", "anchored": "anchored_right_padded", "w": 100, "h": 15,
                 "init": 0.0, "min": 0.0, "max": 1.0, "node": 0, "index": 2}
            ]}
        }))
        .unwrap();
        let WidgetDescriptor::FloatSlider(spec) = &ui.widgets[1] else {
            panic!("Expected float slider");
        };
        assert_eq!(
            spec.frame.placement,
            Placement::Anchored(AnchorDirection::RightPadded)
        );
    }

    #[test]
    fn test_unknown_anchor_direction_rejected() {
        let mut slider = float_slider("a");
        slider["anchored"] = json!("anchored_left");
        let err = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"sliders": [slider]}
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidValue { field: "anchored", .. }));
    }

    #[test]
    fn test_dropdown_options_preserve_order() {
        let ui = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"dropdowns": [{
                "name": "preset", "x": 0, "y": 0,
                "params": [
                    {"name": "Soft", "values": [
                        {"node": 0, "index": 1, "value": 0.2},
                        {"node": 0, "index": 2, "value": 0.4}
                    ], "set_widgets": [{"widget": "gain", "value": 0.2}]},
                    {"name": "Empty"}
                ]
            }]}
        }))
        .unwrap();
        let WidgetDescriptor::Dropdown(spec) = &ui.widgets[0] else {
            panic!("Expected dropdown");
        };
        assert_eq!(spec.frame.w, DROPDOWN_WIDTH);
        assert_eq!(spec.options.len(), 2);
        assert_eq!(spec.options[0].values[1].address, ParameterAddress::new(0, 2));
        assert_eq!(spec.options[0].set_widgets[0].widget, "gain");
        assert!(spec.options[1].values.is_empty());
    }

    #[test]
    fn test_nested_error_context() {
        let err = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"dropdowns": [{
                "name": "preset", "x": 0, "y": 0,
                "params": [{"name": "Soft", "values": [{"node": 0, "value": 0.2}]}]
            }]}
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "dropdowns[0].params[0].values[0]: missing required field 'index'"
        );
    }

    #[test]
    fn test_checkbox_triggers() {
        let ui = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"checkboxes": [{
                "name": "rec", "x": 0, "y": 0, "node": 2, "index": 0,
                "midi_toggle": "record", "midi_off": "stop"
            }]}
        }))
        .unwrap();
        let WidgetDescriptor::Checkbox(spec) = &ui.widgets[0] else {
            panic!("Expected checkbox");
        };
        assert!(!spec.init);
        assert_eq!(
            spec.triggers,
            vec![
                MidiTriggerSpec {
                    kind: TransportKind::Record,
                    reaction: TriggerReaction::Toggle
                },
                MidiTriggerSpec {
                    kind: TransportKind::Stop,
                    reaction: TriggerReaction::Off
                },
            ]
        );
    }

    #[test]
    fn test_radio_direction_and_size() {
        let ui = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"radio_buttons": [{
                "name": "wave", "x": 0, "y": 0, "direction": "direction_horizontal",
                "params": [{"name": "sin"}, {"name": "saw"}, {"name": "sqr"}]
            }]}
        }))
        .unwrap();
        let WidgetDescriptor::RadioGroup(spec) = &ui.widgets[0] else {
            panic!("Expected radio group");
        };
        assert_eq!(spec.direction, RadioDirection::Horizontal);
        assert_eq!(spec.choice.frame.w, RADIO_ITEM_WIDTH * 3.0);
    }

    #[test]
    fn test_global_midi() {
        let ui = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"global_midi": [
                {"trigger": "stop", "values": [{"node": 3, "index": 0, "value": 0.0}]}
            ]}
        }))
        .unwrap();
        assert_eq!(ui.global_midi.len(), 1);
        assert_eq!(ui.global_midi[0].kind, TransportKind::Stop);

        let err = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"global_midi": [{"trigger": "rewind"}]}
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidValue { field: "trigger", .. }));
    }

    #[test]
    fn test_adsr_stage_range_must_not_be_degenerate() {
        let err = parse(json!({
            "name": "m", "width": 1, "height": 1,
            "widgets": {"adsrs": [{
                "name": "env", "x": 0, "y": 0, "w": 100, "h": 60, "node": 1,
                "indexA": 0, "initA": 0.1, "minA": 0.0, "maxA": 2.0,
                "indexD": 1, "initD": 0.1, "minD": 0.0, "maxD": 2.0,
                "indexS": 2, "initS": 0.5, "minS": 1.0, "maxS": 1.0,
                "indexR": 3, "initR": 0.1, "minR": 0.0, "maxR": 2.0
            }]}
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidValue { field: "minS", .. }));
    }

    #[test]
    fn test_invalid_json_text() {
        assert!(matches!(
            UiDescriptor::from_json("{not json"),
            Err(SchemaError::Json(_))
        ));
    }
}
