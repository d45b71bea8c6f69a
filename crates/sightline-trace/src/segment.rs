//! Obstruction tests for a single segment.
//!
//! Two modes share one walk:
//!
//! - **Binary** (`threshold <= 0`): the first opaque voxel blocks the segment.
//! - **Threshold**: every opaque voxel charges the length of segment it covers
//!   against the budget, and the segment is blocked once the budget is spent.
//!   Thin slivers of geometry are tolerated. Segments no longer than the
//!   budget are never blocked.

use glam::{DVec3, IVec3};
use sightline_voxel::Direction;

use crate::walk::VoxelWalk;

/// Answers whether the voxel at an integer coordinate blocks line of sight.
///
/// Called synchronously during a walk, in order of increasing distance from
/// the segment start. Implementations must not call back into the engine.
pub trait OpacitySource {
    fn is_opaque(&self, voxel: IVec3) -> bool;
}

impl<F> OpacitySource for F
where
    F: Fn(IVec3) -> bool,
{
    fn is_opaque(&self, voxel: IVec3) -> bool {
        self(voxel)
    }
}

/// Per-query settings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TraceOptions {
    /// Skip the run of opaque voxels the segment starts in. Only the run
    /// touching the start point is skipped; later obstructions count normally.
    pub ignore_start_if_opaque: bool,
    /// Obstruction length tolerated before the segment counts as blocked.
    /// Zero or negative selects binary mode.
    pub threshold: f64,
}

impl TraceOptions {
    /// Binary blocked/unblocked test.
    pub const BINARY: TraceOptions = TraceOptions {
        ignore_start_if_opaque: false,
        threshold: 0.0,
    };

    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::BINARY
        }
    }

    pub fn ignoring_start(mut self) -> Self {
        self.ignore_start_if_opaque = true;
        self
    }

    fn is_tolerant(&self) -> bool {
        self.threshold > 0.0
    }
}

/// The first obstruction found along a blocked segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// The opaque voxel.
    pub voxel: IVec3,
    /// World-space point where the segment enters `voxel`.
    pub point: DVec3,
    /// Face of `voxel` the segment entered through.
    pub face: Direction,
    /// Segment fraction of `point`, from `0.0` at the start to `1.0` at the end.
    pub fraction: f64,
}

/// Walks from `start` to `end` and returns the first obstruction if the
/// segment is blocked.
///
/// When the start voxel itself blocks, the hit is reported at `start` on the
/// face pointing back along the segment. In threshold mode the reported hit is
/// still the first opaque voxel met, even though the budget may run out
/// further along.
pub fn trace<F>(start: DVec3, end: DVec3, options: TraceOptions, mut is_opaque: F) -> Option<RayHit>
where
    F: FnMut(IVec3) -> bool,
{
    let dir = end - start;
    let tolerant = options.is_tolerant();
    if tolerant && dir.length_squared() <= options.threshold * options.threshold {
        return None;
    }

    let length = dir.length();
    let mut budget = options.threshold;
    let mut skipping = options.ignore_start_if_opaque;
    let mut first_hit: Option<RayHit> = None;

    for step in VoxelWalk::new(start, end) {
        let opaque = is_opaque(step.voxel);
        if skipping {
            skipping = opaque;
            continue;
        }
        if !opaque {
            continue;
        }

        let hit = RayHit {
            voxel: step.voxel,
            point: start + dir * step.enter,
            face: step
                .face
                .unwrap_or_else(|| Direction::classify(dir).opposite()),
            fraction: step.enter,
        };
        if !tolerant {
            return Some(hit);
        }

        let first = *first_hit.get_or_insert(hit);
        budget -= length * (step.exit - step.enter);
        if budget <= 0.0 {
            return Some(first);
        }
    }

    None
}

/// `true` if nothing blocks the segment from `start` to `end`.
pub fn march<F>(start: DVec3, end: DVec3, options: TraceOptions, is_opaque: F) -> bool
where
    F: FnMut(IVec3) -> bool,
{
    trace(start, end, options, is_opaque).is_none()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
