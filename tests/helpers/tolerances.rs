//! Tolerance constants for float comparisons.

/// Exact operations (identity mapping, boundary values).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Values that went through a display-range round trip.
pub const MAPPING_EPSILON: f32 = 1e-4;
