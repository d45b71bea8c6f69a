//! Voxel stepping (DDA) along a finite segment.
//!
//! Distances are expressed as a fraction of the segment: `0.0` is the start
//! point and `1.0` the end point. For each axis the walk keeps the fraction at
//! which the segment next crosses an integer boundary on that axis and always
//! advances the axis that crosses first. The walk ends once every axis has run
//! past the end of the segment, which puts the voxel holding the end point last.

use glam::{DVec3, IVec3};
use sightline_voxel::{Axis, Direction};

use crate::math::{floor_vec, frac, signum};

/// One voxel visited by a [`VoxelWalk`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WalkStep {
    /// The voxel entered.
    pub voxel: IVec3,
    /// Face the segment entered through; `None` for the starting voxel.
    pub face: Option<Direction>,
    /// Segment fraction at which the voxel is entered, capped at `1.0`.
    pub enter: f64,
    /// Segment fraction of the next boundary crossing, capped at `1.0`.
    pub exit: f64,
}

/// Iterator over every voxel a segment passes through, nearest first.
///
/// An axis steps only when it crosses strictly before the others: X must beat
/// both Y and Z, Y beats X on a tie, and Z wins every tie it is part of.
/// An axis with no movement never steps. Non-finite inputs disable stepping,
/// leaving only the starting voxel.
#[derive(Clone, Debug)]
pub struct VoxelWalk {
    voxel: IVec3,
    inc: IVec3,
    /// Fraction advanced per voxel on each axis.
    delta: DVec3,
    /// Fraction at which each axis crosses its next boundary.
    percent: DVec3,
    started: bool,
}

impl VoxelWalk {
    pub fn new(start: DVec3, end: DVec3) -> Self {
        let dir = end - start;
        let (ix, dx, px) = axis_setup(start.x, dir.x);
        let (iy, dy, py) = axis_setup(start.y, dir.y);
        let (iz, dz, pz) = axis_setup(start.z, dir.z);
        Self {
            voxel: floor_vec(start),
            inc: IVec3::new(ix, iy, iz),
            delta: DVec3::new(dx, dy, dz),
            percent: DVec3::new(px, py, pz),
            started: false,
        }
    }

    /// Segment fraction of the next boundary crossing, capped at `1.0`.
    fn next_boundary(&self) -> f64 {
        self.percent.min_element().min(1.0)
    }

    fn finished(&self) -> bool {
        self.percent.x > 1.0 && self.percent.y > 1.0 && self.percent.z > 1.0
    }

    fn next_axis(&self) -> Axis {
        let p = self.percent;
        if p.x < p.y {
            if p.x < p.z { Axis::X } else { Axis::Z }
        } else if p.y < p.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }
}

impl Iterator for VoxelWalk {
    type Item = WalkStep;

    fn next(&mut self) -> Option<WalkStep> {
        if !self.started {
            self.started = true;
            return Some(WalkStep {
                voxel: self.voxel,
                face: None,
                enter: 0.0,
                exit: self.next_boundary(),
            });
        }
        if self.finished() {
            return None;
        }

        let axis = self.next_axis();
        let i = axis.index();
        let enter = self.percent[i];
        self.percent[i] += self.delta[i];
        self.voxel[i] = self.voxel[i].wrapping_add(self.inc[i]);

        Some(WalkStep {
            voxel: self.voxel,
            face: Some(Direction::entered_through(axis, self.inc[i] > 0)),
            enter: enter.min(1.0),
            exit: self.next_boundary(),
        })
    }
}

/// Returns `(inc, delta, percent)` for one axis.
fn axis_setup(start: f64, dir: f64) -> (i32, f64, f64) {
    let inc = signum(dir);
    let delta = f64::from(inc) / dir;
    if inc == 0 || !dir.is_finite() || !delta.is_finite() || !start.is_finite() {
        return (0, f64::MAX, f64::MAX);
    }
    let to_boundary = if inc > 0 { 1.0 - frac(start) } else { frac(start) };
    (inc, delta, delta * to_boundary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
