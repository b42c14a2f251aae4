use aatest_plugin::ParameterAddress;

use super::{clamp_to_range, map_to, Pushes};
use crate::gui::schema::{AdsrSpec, EnvelopeStageSpec, ParameterValue};
use crate::gui::{Canvas, ControlId, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Attack,
    Decay,
    Sustain,
    Release,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Attack, Stage::Decay, Stage::Sustain, Stage::Release];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Range the envelope editor works in, independent of the plugin.
    pub fn display_range(self) -> (f32, f32) {
        match self {
            Stage::Attack => (1.0, 1000.0),
            Stage::Decay => (0.0, 1000.0),
            Stage::Sustain => (0.0, 1.0),
            Stage::Release => (1.0, 1000.0),
        }
    }
}

/// One envelope leg: editor value plus the plugin range it maps onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeStage {
    pub index: i32,
    pub min: f32,
    pub max: f32,
    display: f32,
}

impl EnvelopeStage {
    fn new(stage: Stage, spec: &EnvelopeStageSpec) -> Self {
        let (lo, hi) = stage.display_range();
        Self {
            index: spec.index,
            min: spec.min,
            max: spec.max,
            display: clamp_to_range(map_to(spec.init, spec.min, spec.max, lo, hi), lo, hi),
        }
    }

    pub fn display(&self) -> f32 {
        self.display
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdsrBinding {
    name: String,
    rect: Rect,
    node: i32,
    controls: [ControlId; 4],
    stages: [EnvelopeStage; 4],
    active: bool,
}

impl AdsrBinding {
    /// `controls` are the editor's sub-controls in A, D, S, R order.
    pub fn from_spec(spec: &AdsrSpec, controls: [ControlId; 4], rect: Rect) -> Self {
        Self {
            name: spec.frame.name.clone(),
            rect,
            node: spec.node,
            controls,
            stages: [
                EnvelopeStage::new(Stage::Attack, &spec.attack),
                EnvelopeStage::new(Stage::Decay, &spec.decay),
                EnvelopeStage::new(Stage::Sustain, &spec.sustain),
                EnvelopeStage::new(Stage::Release, &spec.release),
            ],
            active: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn controls(&self) -> [ControlId; 4] {
        self.controls
    }

    pub fn control(&self, stage: Stage) -> ControlId {
        self.controls[stage.index()]
    }

    pub fn stage(&self, stage: Stage) -> &EnvelopeStage {
        &self.stages[stage.index()]
    }

    pub fn stage_for(&self, control: ControlId) -> Option<Stage> {
        Stage::ALL
            .into_iter()
            .find(|stage| self.controls[stage.index()] == control)
    }

    pub fn address(&self, stage: Stage) -> ParameterAddress {
        ParameterAddress::new(self.node, self.stages[stage.index()].index)
    }

    pub fn set_display(&mut self, stage: Stage, value: f32) {
        let (lo, hi) = stage.display_range();
        self.stages[stage.index()].display = clamp_to_range(value, lo, hi);
    }

    /// Plugin-side value of one stage.
    pub fn plugin_value(&self, stage: Stage) -> f32 {
        let (lo, hi) = stage.display_range();
        let s = &self.stages[stage.index()];
        map_to(s.display, lo, hi, s.min, s.max)
    }

    /// Writes after editing `stage`. Decay also re-sends sustain: the
    /// envelope editor moves both legs together.
    pub fn stage_updates(&self, stage: Stage) -> Pushes {
        let write = |stage: Stage| ParameterValue {
            address: self.address(stage),
            value: self.plugin_value(stage),
        };
        let mut pushes = Pushes::new();
        pushes.push(write(stage));
        if stage == Stage::Decay {
            pushes.push(write(Stage::Sustain));
        }
        pushes
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let stages = Stage::ALL.map(|stage| self.stages[stage.index()].display);
        canvas.adsr(&self.name, self.rect, stages, self.active);
    }
}
