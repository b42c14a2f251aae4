//! Control-surface construction from UI descriptors.

mod helpers;
use helpers::*;

use aatest::gui::schema::WidgetKind;
use aatest::gui::ControlIdAllocator;
use aatest::{ControlSurface, Rect, SchemaError, UiDescriptor};
use serde_json::json;

fn build(widgets: serde_json::Value) -> Result<ControlSurface, SchemaError> {
    let descriptor = UiDescriptor::from_value(&descriptor(widgets))?;
    ControlSurface::build(&descriptor, &mut ControlIdAllocator::new())
}

#[test]
fn test_binding_counts_match_descriptor() {
    let surface = build(json!({
        "sliders": [
            float_slider("a", 0, 0, 0.0, 1.0),
            float_slider("b", 0, 1, 0.0, 1.0),
            int_slider("c", 2, 0, 4, None)
        ],
        "adsrs": [adsr("env", 1)],
        "dropdowns": [{"name": "d", "x": 0, "y": 0, "params": [{"name": "x"}]}],
        "radio_buttons": [{"name": "r", "x": 0, "y": 50, "params": [{"name": "x"}, {"name": "y"}]}],
        "checkboxes": [checkbox("c1", 2, 0), checkbox("c2", 2, 1)]
    }))
    .unwrap();

    let bindings = &surface.bindings;
    assert_eq!(bindings.count(WidgetKind::FloatSlider), 2);
    assert_eq!(bindings.count(WidgetKind::IntSlider), 1);
    assert_eq!(bindings.count(WidgetKind::Adsr), 1);
    assert_eq!(bindings.count(WidgetKind::Dropdown), 1);
    assert_eq!(bindings.count(WidgetKind::RadioGroup), 1);
    assert_eq!(bindings.count(WidgetKind::Checkbox), 2);
    assert_eq!(bindings.len(), 8);
}

#[test]
fn test_missing_categories_are_empty() {
    let surface = build(json!({})).unwrap();
    assert!(surface.bindings.is_empty());
    assert!(surface.triggers.is_empty());
}

#[test]
fn test_malformed_element_aborts_whole_surface() {
    let mut broken = float_slider("b", 0, 1, 0.0, 1.0);
    broken.as_object_mut().unwrap().remove("max");
    let result = build(json!({
        "sliders": [float_slider("a", 0, 0, 0.0, 1.0), broken],
        "checkboxes": [checkbox("c", 0, 2)]
    }));
    assert!(matches!(result, Err(SchemaError::MissingField { field: "max", .. })));
}

#[test]
fn test_first_slider_anchored_below_yields_no_sliders() {
    let mut slider = float_slider("a", 0, 0, 0.0, 1.0);
    slider.as_object_mut().unwrap().remove("x");
    slider.as_object_mut().unwrap().remove("y");
    slider["anchored"] = json!("anchored_below");

    let surface = build(json!({"sliders": [slider]})).unwrap();
    assert!(surface.bindings.float_sliders.is_empty());
}

#[test]
fn test_anchor_follows_previous_of_same_kind_only() {
    let mut anchored = float_slider("b", 0, 1, 0.0, 1.0);
    anchored["anchored"] = json!("anchored_right_padded");
    let surface = build(json!({
        "sliders": [float_slider("a", 0, 0, 0.0, 1.0), anchored],
        "checkboxes": [{"name": "c", "anchored": "anchored_below", "node": 0, "index": 2}]
    }))
    .unwrap();

    let sliders = &surface.bindings.float_sliders;
    assert_eq!(sliders.len(), 2);
    assert_eq!(sliders[1].rect(), Rect::new(140.0, 10.0, 120.0, 15.0));
    // No checkbox placed before it, so the anchored checkbox is dropped.
    assert!(surface.bindings.checkboxes.is_empty());
}

#[test]
fn test_anchored_position_is_deterministic() {
    let widgets = json!({
        "sliders": [
            float_slider("a", 0, 0, 0.0, 1.0),
            {"name": "b", "anchored": "anchored_below", "w": 120, "h": 15,
             "init": 0.0, "min": 0.0, "max": 1.0, "node": 0, "index": 1}
        ]
    });
    let first = build(widgets.clone()).unwrap();
    let second = build(widgets).unwrap();
    assert_eq!(
        first.bindings.float_sliders[1].rect(),
        second.bindings.float_sliders[1].rect()
    );
    assert_eq!(
        first.bindings.float_sliders[1].rect(),
        Rect::new(10.0, 27.0, 120.0, 15.0)
    );
}

#[test]
fn test_unknown_widget_kind_rejected() {
    let result = build(json!({"knobs": [{"name": "k"}]}));
    assert!(matches!(result, Err(SchemaError::UnknownCategory(_))));
}

#[test]
fn test_int_slider_curve_recorded() {
    let slider = int_slider("steps", 4, 0, 10, Some((0.0, 1.0)));
    let surface = build(json!({ "sliders": [slider] })).unwrap();
    let slider = &surface.bindings.int_sliders[0];
    assert_eq!(slider.range(), (0, 10));
    assert_eq!(slider.push().value, 0.0);
}
