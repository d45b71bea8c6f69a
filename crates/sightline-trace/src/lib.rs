//! Line-of-sight tracing through a voxel grid.
//!
//! [`VoxelWalk`] enumerates the voxels a segment passes through, in order.
//! [`trace`] and [`march`] run that walk against an opacity predicate, either
//! stopping at the first opaque voxel or tolerating a bounded amount of
//! obstruction. [`TracingEngine`] ties the walk to the opacity and result
//! caches for callers that probe many targets from one origin.

mod engine;
mod math;
mod segment;
mod walk;

pub use engine::TracingEngine;
pub use math::{floor_to_i32, floor_vec, frac};
pub use segment::{OpacitySource, RayHit, TraceOptions, march, trace};
pub use walk::{VoxelWalk, WalkStep};

pub use sightline_voxel::{CacheError, Direction};
