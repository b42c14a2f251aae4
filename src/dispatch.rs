//! Channel-arity dispatch.
//!
//! The runtime exposes one compute entry point per supported
//! `(inputs, outputs)` pair. The pair is read once at load time and the
//! matching entry is looked up in [`COMPUTE_TABLE`]; an unsupported pair leaves
//! the dispatcher unconfigured and every block renders nothing.

use aatest_plugin::{AudioIO, PluginHandle};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelArity {
    pub inputs: usize,
    pub outputs: usize,
}

impl ChannelArity {
    pub const fn new(inputs: usize, outputs: usize) -> Self {
        Self { inputs, outputs }
    }
}

impl From<AudioIO> for ChannelArity {
    fn from(io: AudioIO) -> Self {
        Self::new(io.inputs, io.outputs)
    }
}

impl fmt::Display for ChannelArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.inputs, self.outputs)
    }
}

/// Render `frames` samples. `inputs` holds exactly `arity.inputs` slices and
/// `outputs` exactly `arity.outputs` buffers, each at least `frames` long.
pub type ComputeFn = fn(&mut dyn PluginHandle, usize, &[&[f32]], &mut [Vec<f32>]);

fn zero_one(plugin: &mut dyn PluginHandle, frames: usize, _: &[&[f32]], out: &mut [Vec<f32>]) {
    plugin.compute_zero_one(frames, &mut out[0]);
}

fn zero_two(plugin: &mut dyn PluginHandle, frames: usize, _: &[&[f32]], out: &mut [Vec<f32>]) {
    let (left, right) = out.split_at_mut(1);
    plugin.compute_zero_two(frames, &mut left[0], &mut right[0]);
}

fn one_one(plugin: &mut dyn PluginHandle, frames: usize, input: &[&[f32]], out: &mut [Vec<f32>]) {
    plugin.compute_one_one(frames, input[0], &mut out[0]);
}

fn one_two(plugin: &mut dyn PluginHandle, frames: usize, input: &[&[f32]], out: &mut [Vec<f32>]) {
    let (left, right) = out.split_at_mut(1);
    plugin.compute_one_two(frames, input[0], &mut left[0], &mut right[0]);
}

fn two_two(plugin: &mut dyn PluginHandle, frames: usize, input: &[&[f32]], out: &mut [Vec<f32>]) {
    let (left, right) = out.split_at_mut(1);
    plugin.compute_two_two(frames, input[0], input[1], &mut left[0], &mut right[0]);
}

/// Every arity the runtime can compute.
pub const COMPUTE_TABLE: [(ChannelArity, ComputeFn); 5] = [
    (ChannelArity::new(0, 1), zero_one),
    (ChannelArity::new(0, 2), zero_two),
    (ChannelArity::new(1, 1), one_one),
    (ChannelArity::new(1, 2), one_two),
    (ChannelArity::new(2, 2), two_two),
];

pub fn lookup(arity: ChannelArity) -> Option<ComputeFn> {
    COMPUTE_TABLE
        .iter()
        .find(|(supported, _)| *supported == arity)
        .map(|&(_, compute)| compute)
}

/// Holds the compute path picked at load time plus the module's write buffer.
#[derive(Default)]
pub struct ArityDispatcher {
    selected: Option<(ChannelArity, ComputeFn)>,
    write_buffer: Vec<Vec<f32>>,
    silence: Vec<f32>,
}

impl fmt::Debug for ArityDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArityDispatcher")
            .field("arity", &self.arity())
            .finish()
    }
}

impl ArityDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the compute path for `io`. Returns `false` (and stays
    /// unconfigured) when the pair is unsupported.
    pub fn configure(&mut self, io: AudioIO, block_size: usize) -> bool {
        let arity = ChannelArity::from(io);
        match lookup(arity) {
            Some(compute) => {
                self.selected = Some((arity, compute));
                self.write_buffer = vec![Vec::with_capacity(block_size); arity.outputs];
                self.silence = Vec::with_capacity(block_size);
                tracing::debug!("Compute path {} selected", arity);
                true
            }
            None => {
                self.reset();
                tracing::warn!("Unsupported channel arity {}: audio disabled", arity);
                false
            }
        }
    }

    pub fn reset(&mut self) {
        self.selected = None;
        self.write_buffer.clear();
        self.silence.clear();
    }

    pub fn is_configured(&self) -> bool {
        self.selected.is_some()
    }

    pub fn arity(&self) -> Option<ChannelArity> {
        self.selected.map(|(arity, _)| arity)
    }

    /// Render one block into the write buffer and return it.
    ///
    /// Missing or short input channels read as silence. Returns `None` when
    /// unconfigured.
    pub fn compute(
        &mut self,
        plugin: &mut dyn PluginHandle,
        frames: usize,
        inputs: &[&[f32]],
    ) -> Option<&[Vec<f32>]> {
        let (arity, compute) = self.selected?;

        for channel in &mut self.write_buffer {
            channel.clear();
            channel.resize(frames, 0.0);
        }
        self.silence.clear();
        self.silence.resize(frames, 0.0);

        let silence = self.silence.as_slice();
        let mut padded: [&[f32]; 2] = [silence, silence];
        for (ch, slot) in padded.iter_mut().enumerate().take(arity.inputs) {
            if let Some(input) = inputs.get(ch).filter(|input| input.len() >= frames) {
                *slot = &input[..frames];
            }
        }

        compute(plugin, frames, &padded[..arity.inputs], &mut self.write_buffer);
        Some(self.write_buffer.as_slice())
    }
}
