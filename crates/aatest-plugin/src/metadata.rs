//! Audio channel configuration reported by a loaded module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio I/O configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioIO {
    /// Number of audio input channels
    pub inputs: usize,
    /// Number of audio output channels
    pub outputs: usize,
}

impl AudioIO {
    pub const fn new(inputs: usize, outputs: usize) -> Self {
        Self { inputs, outputs }
    }

    /// Generator with a single output
    pub const fn mono_source() -> Self {
        Self::new(0, 1)
    }

    /// Stereo in, stereo out
    pub const fn stereo() -> Self {
        Self::new(2, 2)
    }

    /// The runtime reports counts as C ints; negative counts mean "none".
    pub fn from_raw(inputs: i32, outputs: i32) -> Self {
        Self::new(inputs.max(0) as usize, outputs.max(0) as usize)
    }
}

impl fmt::Display for AudioIO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in / {} out", self.inputs, self.outputs)
    }
}
