//! Seeded random voxel scene used by the probe.

use std::cell::Cell;

use glam::IVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use sightline_trace::OpacitySource;

/// Depth of the ground surface below the voxel the viewer starts in.
const GROUND_DEPTH: i32 = 6;

/// Sparse voxel scene: an unbounded ground slab plus scattered opaque voxels.
///
/// Counts every opacity lookup so sweeps can report how much work the caches
/// saved.
pub struct Scene {
    scattered: FxHashSet<IVec3>,
    ground_top: i32,
    lookups: Cell<u64>,
}

impl Scene {
    /// Scatters opaque voxels with probability `density` over the box
    /// `min..=max`, above a ground slab whose top is `GROUND_DEPTH` below `center`.
    pub fn generate(seed: u64, density: f64, center: IVec3, min: IVec3, max: IVec3) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let ground_top = center.y - GROUND_DEPTH;
        let mut scattered = FxHashSet::default();

        for z in min.z..=max.z {
            for y in (ground_top + 1).max(min.y)..=max.y {
                for x in min.x..=max.x {
                    if rng.random::<f64>() < density {
                        scattered.insert(IVec3::new(x, y, z));
                    }
                }
            }
        }

        Self {
            scattered,
            ground_top,
            lookups: Cell::new(0),
        }
    }

    /// Whether `voxel` is solid, without counting a lookup.
    pub fn is_solid(&self, voxel: IVec3) -> bool {
        voxel.y <= self.ground_top || self.scattered.contains(&voxel)
    }

    pub fn scattered_count(&self) -> usize {
        self.scattered.len()
    }

    pub fn ground_top(&self) -> i32 {
        self.ground_top
    }

    /// Opacity lookups answered so far.
    pub fn lookups(&self) -> u64 {
        self.lookups.get()
    }
}

impl OpacitySource for Scene {
    fn is_opaque(&self, voxel: IVec3) -> bool {
        self.lookups.set(self.lookups.get() + 1);
        self.is_solid(voxel)
    }
}
