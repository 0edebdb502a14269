//! Scale tolerances

use crate::Vec3;

/// Per-component threshold above which a scale counts as changed
pub const CHANGE_TOLERANCE: f32 = 1e-4;

/// Per-component distance from 1.0 below which a scale counts as identity
pub const IDENTITY_TOLERANCE: f32 = 1e-6;

/// True if any component differs by more than [`CHANGE_TOLERANCE`]
pub fn scale_changed(current: Vec3, cached: Vec3) -> bool {
    (current - cached)
        .to_array()
        .iter()
        .any(|d| d.abs() > CHANGE_TOLERANCE)
}

/// True if every component is within [`IDENTITY_TOLERANCE`] of 1.0
pub fn is_identity_scale(scale: Vec3) -> bool {
    scale
        .to_array()
        .iter()
        .all(|s| (s - 1.0).abs() < IDENTITY_TOLERANCE)
}
