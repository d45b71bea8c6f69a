//! Common boolean interface over the two raytrace caches.

use glam::IVec3;

use crate::opacity_cache::OpacityCache;
use crate::result_cache::ResultCache;

/// A get-or-compute memo of booleans keyed by a position relative to the origin.
///
/// Implementations call `compute` at most once per key between clears when
/// they are able to store the key at all.
pub trait RaytraceCache {
    fn get_or_compute_bool(&mut self, key: IVec3, compute: impl FnOnce() -> bool) -> bool;

    /// Forgets every cached entry.
    fn clear(&mut self);
}

impl RaytraceCache for OpacityCache {
    fn get_or_compute_bool(&mut self, key: IVec3, compute: impl FnOnce() -> bool) -> bool {
        self.get_or_compute_opaque(key, compute)
    }

    fn clear(&mut self) {
        OpacityCache::clear(self);
    }
}

impl RaytraceCache for ResultCache {
    fn get_or_compute_bool(&mut self, key: IVec3, compute: impl FnOnce() -> bool) -> bool {
        self.get_or_compute(key, compute)
    }

    fn clear(&mut self) {
        ResultCache::clear(self);
    }
}
