//! Plugin handle and connector traits.
//!
//! These mirror the fixed C ABI exported by the AA runtime. Teardown is `Drop`.

use crate::{AudioIO, ParameterAddress};

/// One live AA module instance.
///
/// All calls are synchronous and happen on the thread that owns the host
/// module; nothing here is queued or deferred.
pub trait PluginHandle: Send {
    fn init(&mut self, sample_rate: f64);

    fn input_count(&self) -> usize;

    fn output_count(&self) -> usize;

    fn audio_io(&self) -> AudioIO {
        AudioIO::new(self.input_count(), self.output_count())
    }

    /// JSON UI descriptor, if the module ships one.
    fn gui_descriptor(&mut self) -> Option<String>;

    /// Complete overwrite of one parameter; no read-modify-write.
    fn set_param(&mut self, address: ParameterAddress, value: f32);

    /// `velocity` is normalized 0..1.
    fn note_on(&mut self, pitch: u8, velocity: f32);

    fn note_off(&mut self, pitch: u8, value: f32);

    fn compute_zero_one(&mut self, frames: usize, output: &mut [f32]);

    fn compute_zero_two(&mut self, frames: usize, left: &mut [f32], right: &mut [f32]);

    fn compute_one_one(&mut self, frames: usize, input: &[f32], output: &mut [f32]);

    fn compute_one_two(
        &mut self,
        frames: usize,
        input: &[f32],
        left: &mut [f32],
        right: &mut [f32],
    );

    fn compute_two_two(
        &mut self,
        frames: usize,
        input_left: &[f32],
        input_right: &[f32],
        left: &mut [f32],
        right: &mut [f32],
    );
}

/// Entry points of the runtime that are not bound to an instance.
pub trait ModuleConnector {
    /// Raw catalog document from the plugin server, `None` when unreachable.
    fn list_modules(&mut self, server_url: &str) -> Option<String>;

    /// `None` when the server is unreachable or refuses the module.
    fn create(&mut self, server_url: &str, module_url: &str) -> Option<Box<dyn PluginHandle>>;
}
