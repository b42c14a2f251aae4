//! Test helpers and fixtures for aatest integration tests
//!
//! The AA runtime is replaced by a [`RecordingPlugin`] that logs every call
//! it receives, so tests can assert on the exact sequence of parameter
//! writes, notes and compute calls a module produces.

#![allow(dead_code)]

pub mod tolerances;

use aatest::prelude::*;
use aatest::UiDescriptor;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

pub const TEST_SAMPLE_RATE: f64 = 48000.0;
pub const TEST_BUFFER_SIZE: usize = 64;
pub const TEST_SERVER: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq)]
pub enum PluginCall {
    Init(f64),
    SetParam(ParameterAddress, f32),
    NoteOn(u8, f32),
    NoteOff(u8, f32),
    Compute {
        inputs: usize,
        outputs: usize,
        frames: usize,
    },
    Destroyed,
}

pub type CallLog = Arc<Mutex<Vec<PluginCall>>>;

/// Route `tracing` output through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Parameter writes only, in order.
pub fn param_writes(log: &CallLog) -> Vec<(ParameterAddress, f32)> {
    log.lock()
        .iter()
        .filter_map(|call| match call {
            PluginCall::SetParam(address, value) => Some((*address, *value)),
            _ => None,
        })
        .collect()
}

pub fn computes(log: &CallLog) -> Vec<PluginCall> {
    log.lock()
        .iter()
        .filter(|call| matches!(call, PluginCall::Compute { .. }))
        .cloned()
        .collect()
}

/// Mock module: every output sample is `input + level`.
pub struct RecordingPlugin {
    io: AudioIO,
    descriptor: Option<String>,
    level: f32,
    calls: CallLog,
}

impl RecordingPlugin {
    pub fn new(io: AudioIO, descriptor: Option<String>, calls: CallLog) -> Self {
        Self {
            io,
            descriptor,
            level: 0.5,
            calls,
        }
    }

    pub fn boxed(
        io: AudioIO,
        descriptor: Option<String>,
        calls: &CallLog,
    ) -> Box<dyn PluginHandle> {
        Box::new(Self::new(io, descriptor, calls.clone()))
    }

    fn record(&self, call: PluginCall) {
        self.calls.lock().push(call);
    }

    fn compute(&self, frames: usize) {
        self.record(PluginCall::Compute {
            inputs: self.io.inputs,
            outputs: self.io.outputs,
            frames,
        });
    }

    fn render(&self, frames: usize, input: Option<&[f32]>, output: &mut [f32]) {
        for (i, sample) in output.iter_mut().take(frames).enumerate() {
            *sample = input.map_or(0.0, |input| input[i]) + self.level;
        }
    }
}

impl PluginHandle for RecordingPlugin {
    fn init(&mut self, sample_rate: f64) {
        self.record(PluginCall::Init(sample_rate));
    }

    fn input_count(&self) -> usize {
        self.io.inputs
    }

    fn output_count(&self) -> usize {
        self.io.outputs
    }

    fn gui_descriptor(&mut self) -> Option<String> {
        self.descriptor.clone()
    }

    fn set_param(&mut self, address: ParameterAddress, value: f32) {
        self.record(PluginCall::SetParam(address, value));
    }

    fn note_on(&mut self, pitch: u8, velocity: f32) {
        self.record(PluginCall::NoteOn(pitch, velocity));
    }

    fn note_off(&mut self, pitch: u8, value: f32) {
        self.record(PluginCall::NoteOff(pitch, value));
    }

    fn compute_zero_one(&mut self, frames: usize, output: &mut [f32]) {
        self.compute(frames);
        self.render(frames, None, output);
    }

    fn compute_zero_two(&mut self, frames: usize, left: &mut [f32], right: &mut [f32]) {
        self.compute(frames);
        self.render(frames, None, left);
        self.render(frames, None, right);
    }

    fn compute_one_one(&mut self, frames: usize, input: &[f32], output: &mut [f32]) {
        self.compute(frames);
        self.render(frames, Some(input), output);
    }

    fn compute_one_two(
        &mut self,
        frames: usize,
        input: &[f32],
        left: &mut [f32],
        right: &mut [f32],
    ) {
        self.compute(frames);
        self.render(frames, Some(input), left);
        self.render(frames, Some(input), right);
    }

    fn compute_two_two(
        &mut self,
        frames: usize,
        input_left: &[f32],
        input_right: &[f32],
        left: &mut [f32],
        right: &mut [f32],
    ) {
        self.compute(frames);
        self.render(frames, Some(input_left), left);
        self.render(frames, Some(input_right), right);
    }
}

impl Drop for RecordingPlugin {
    fn drop(&mut self) {
        self.record(PluginCall::Destroyed);
    }
}

struct MockModule {
    name: String,
    io: AudioIO,
    descriptor: Option<String>,
}

/// Mock plugin server.
pub struct RecordingConnector {
    modules: Vec<MockModule>,
    reachable: bool,
    refuse_creation: bool,
    calls: CallLog,
    scans: Arc<Mutex<usize>>,
}

impl RecordingConnector {
    pub fn new(calls: &CallLog) -> Self {
        Self {
            modules: Vec::new(),
            reachable: true,
            refuse_creation: false,
            calls: calls.clone(),
            scans: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_module(mut self, name: &str, io: AudioIO, descriptor: Option<Value>) -> Self {
        self.modules.push(MockModule {
            name: name.to_string(),
            io,
            descriptor: descriptor.map(|d| d.to_string()),
        });
        self
    }

    /// Descriptor given as raw text (for malformed documents).
    pub fn with_raw_module(mut self, name: &str, io: AudioIO, descriptor: &str) -> Self {
        self.modules.push(MockModule {
            name: name.to_string(),
            io,
            descriptor: Some(descriptor.to_string()),
        });
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    /// Lists modules but the runtime returns no instance for any of them.
    pub fn refusing_creation(mut self) -> Self {
        self.refuse_creation = true;
        self
    }

    /// Shared counter of catalog requests.
    pub fn scans(&self) -> Arc<Mutex<usize>> {
        self.scans.clone()
    }
}

pub fn module_url(name: &str) -> String {
    format!("{}/modules/{}.json", TEST_SERVER, name)
}

impl ModuleConnector for RecordingConnector {
    fn list_modules(&mut self, _server_url: &str) -> Option<String> {
        *self.scans.lock() += 1;
        if !self.reachable {
            return None;
        }
        let modules: Vec<Value> = self
            .modules
            .iter()
            .map(|m| json!({"name": m.name, "json_url": module_url(&m.name)}))
            .collect();
        Some(json!({ "modules": modules }).to_string())
    }

    fn create(&mut self, _server_url: &str, url: &str) -> Option<Box<dyn PluginHandle>> {
        if !self.reachable || self.refuse_creation {
            return None;
        }
        let module = self.modules.iter().find(|m| module_url(&m.name) == url)?;
        Some(RecordingPlugin::boxed(
            module.io,
            module.descriptor.clone(),
            &self.calls,
        ))
    }
}

/// Module wired to a [`RecordingConnector`], with a target set so it renders.
pub fn test_module(connector: RecordingConnector) -> AaTest {
    let mut module = AaTest::builder()
        .server_url(TEST_SERVER)
        .sample_rate(TEST_SAMPLE_RATE)
        .block_size(TEST_BUFFER_SIZE)
        .build(Box::new(connector))
        .expect("Failed to create test module");
    module.set_target(Some("output".to_string()));
    module
}

/// Module with `descriptor` loaded through [`AaTest::install_plugin`].
pub fn loaded_module(io: AudioIO, descriptor: Value, log: &CallLog) -> AaTest {
    let mut module = test_module(RecordingConnector::new(log));
    module
        .install_plugin("test", RecordingPlugin::boxed(io, Some(descriptor.to_string()), log))
        .expect("Failed to install test plugin");
    log.lock().clear();
    module
}

pub fn parse(descriptor: &Value) -> UiDescriptor {
    UiDescriptor::from_value(descriptor).expect("Invalid test descriptor")
}

// =============================================================================
// Descriptor fixtures
// =============================================================================

pub fn descriptor(widgets: Value) -> Value {
    json!({"name": "Test Module", "width": 300, "height": 200, "widgets": widgets})
}

pub fn float_slider(name: &str, node: i32, index: i32, min: f32, max: f32) -> Value {
    json!({
        "name": name, "x": 10, "y": 10, "w": 120, "h": 15,
        "init": min, "min": min, "max": max, "node": node, "index": index
    })
}

pub fn int_slider(name: &str, index: i32, min: i32, max: i32, curve: Option<(f32, f32)>) -> Value {
    let mut slider = json!({
        "type": "int_slider", "name": name, "x": 10, "y": 30, "w": 120, "h": 15,
        "init": min, "min": min, "max": max, "node": 0, "index": index
    });
    if let Some((lo, hi)) = curve {
        slider["map_to_float"] = json!({"min": lo, "max": hi});
    }
    slider
}

pub fn adsr(name: &str, node: i32) -> Value {
    json!({
        "name": name, "x": 10, "y": 60, "w": 160, "h": 80, "node": node,
        "indexA": 0, "initA": 0.01, "minA": 0.001, "maxA": 2.0,
        "indexD": 1, "initD": 0.2, "minD": 0.0, "maxD": 2.0,
        "indexS": 2, "initS": 0.7, "minS": 0.0, "maxS": 1.0,
        "indexR": 3, "initR": 0.5, "minR": 0.01, "maxR": 4.0
    })
}

pub fn checkbox(name: &str, node: i32, index: i32) -> Value {
    json!({"name": name, "x": 200, "y": 10, "node": node, "index": index})
}

// =============================================================================
// Canvas
// =============================================================================

/// Records what was drawn, one entry per call.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub drawn: Vec<String>,
}

impl Canvas for RecordingCanvas {
    fn float_slider(
        &mut self,
        name: &str,
        _rect: Rect,
        value: f32,
        _min: f32,
        _max: f32,
        _digits: Option<u32>,
    ) {
        self.drawn.push(format!("float_slider:{}={}", name, value));
    }

    fn int_slider(&mut self, name: &str, _rect: Rect, value: i32, _min: i32, _max: i32) {
        self.drawn.push(format!("int_slider:{}={}", name, value));
    }

    fn dropdown(&mut self, name: &str, _rect: Rect, options: &[&str], selected: Option<usize>) {
        self.drawn
            .push(format!("dropdown:{}:{}:{:?}", name, options.join("|"), selected));
    }

    fn radio_group(
        &mut self,
        name: &str,
        _rect: Rect,
        options: &[&str],
        selected: Option<usize>,
        horizontal: bool,
    ) {
        self.drawn.push(format!(
            "radio:{}:{}:{:?}:{}",
            name,
            options.join("|"),
            selected,
            horizontal
        ));
    }

    fn checkbox(&mut self, name: &str, _rect: Rect, checked: bool) {
        self.drawn.push(format!("checkbox:{}={}", name, checked));
    }

    fn adsr(&mut self, name: &str, _rect: Rect, _stages: [f32; 4], active: bool) {
        self.drawn.push(format!("adsr:{}:{}", name, active));
    }

    fn logo(&mut self, x: f32, y: f32, _scale_x: f32, _scale_y: f32) {
        self.drawn.push(format!("logo:{},{}", x, y));
    }
}
