use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one scalar parameter inside a loaded AA module.
///
/// The runtime addresses parameters by the DSP graph node that owns them and
/// the parameter's index within that node. Several controls may share one
/// address; the last push wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterAddress {
    pub node: i32,
    pub index: i32,
}

impl ParameterAddress {
    #[inline]
    pub const fn new(node: i32, index: i32) -> Self {
        Self { node, index }
    }
}

impl fmt::Display for ParameterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.index)
    }
}

impl From<(i32, i32)> for ParameterAddress {
    fn from((node, index): (i32, i32)) -> Self {
        Self { node, index }
    }
}
