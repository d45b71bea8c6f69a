//! Scalar helpers shared by the walk and the engine.

use glam::{DVec3, IVec3};

/// Largest integer not greater than `value`, saturating at the `i32` range.
///
/// Unlike `as` truncation this rounds negative non-integers down, so `-0.5`
/// lands in voxel `-1`.
pub fn floor_to_i32(value: f64) -> i32 {
    value.floor() as i32
}

/// Voxel containing `p`.
pub fn floor_vec(p: DVec3) -> IVec3 {
    IVec3::new(floor_to_i32(p.x), floor_to_i32(p.y), floor_to_i32(p.z))
}

/// Fractional part relative to the floor, always in `[0, 1)` for finite input.
pub fn frac(value: f64) -> f64 {
    value - value.floor()
}

pub(crate) fn signum(value: f64) -> i32 {
    if value == 0.0 {
        0
    } else if value > 0.0 {
        1
    } else {
        -1
    }
}
