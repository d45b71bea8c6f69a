//! Origin-centered tracing engine with opacity and result caches.
//!
//! The engine is built for many queries from one viewpoint: set the origin
//! with [`TracingEngine::recenter`], clear the caches, then probe as many
//! targets as needed. Opacity lookups go through an [`OpacityCache`] keyed on
//! the voxel offset from the origin voxel, so each voxel near the viewer is
//! asked of the [`OpacitySource`] at most once per epoch. Cached queries
//! additionally memoize their boolean outcome per target offset in a
//! [`ResultCache`].
//!
//! Both caches hold values relative to the origin. Moving the origin without
//! clearing them is a caller error; debug builds assert on the next query.

use glam::{DVec3, IVec3};
use sightline_voxel::{CacheError, OpacityCache, RaytraceCache, ResultCache};

use crate::math::floor_vec;
use crate::segment::{OpacitySource, RayHit, TraceOptions, trace};

/// Visibility engine owning an opacity source and both caches.
///
/// Not thread-safe: shard one engine per thread or put it behind a
/// lock if queries come from several threads.
pub struct TracingEngine<S> {
    origin: DVec3,
    origin_block: IVec3,
    opacity: OpacityCache,
    results: ResultCache,
    source: S,
    /// Set when the origin moved while the caches still held entries.
    stale: bool,
}

impl<S: OpacitySource> TracingEngine<S> {
    /// Creates an engine whose opacity cache spans `2 * cache_radius + 1`
    /// chunks per axis. The origin starts at `(0, 0, 0)`.
    pub fn new(cache_radius: u32, source: S) -> Result<Self, CacheError> {
        let opacity = OpacityCache::new(cache_radius)?;
        tracing::debug!(
            cache_radius,
            chunks = opacity.chunk_count(),
            "created tracing engine"
        );
        Ok(Self {
            origin: DVec3::ZERO,
            origin_block: IVec3::ZERO,
            opacity,
            results: ResultCache::new(),
            source,
            stale: false,
        })
    }

    /// Moves the origin. Follow with [`clear`](Self::clear) unless the caches
    /// are already empty; use [`relocate`](Self::relocate) to do both.
    pub fn recenter(&mut self, origin: DVec3) {
        if origin != self.origin && !(self.opacity.is_empty() && self.results.is_empty()) {
            self.stale = true;
        }
        self.origin = origin;
        self.origin_block = floor_vec(origin);
        tracing::debug!(
            x = origin.x,
            y = origin.y,
            z = origin.z,
            "recentered tracing engine"
        );
    }

    /// Moves the origin and clears both caches.
    pub fn relocate(&mut self, origin: DVec3) {
        self.recenter(origin);
        self.clear();
    }

    /// Clears both caches.
    pub fn clear(&mut self) {
        RaytraceCache::clear(&mut self.opacity);
        RaytraceCache::clear(&mut self.results);
        self.stale = false;
    }

    /// Clears cached opacity, e.g. after the underlying voxels changed.
    ///
    /// Cached results derived from the old opacity stay in place; clear those
    /// too when the change may affect them.
    pub fn clear_opacity_cache(&mut self) {
        self.opacity.clear();
        self.refresh_stale();
    }

    pub fn clear_result_cache(&mut self) {
        self.results.clear();
        self.refresh_stale();
    }

    /// Whether the segment from the origin to the corner of `target` is clear.
    /// Outcomes are memoized per target offset until the next clear.
    pub fn query_cached(&mut self, target: IVec3) -> bool {
        self.query_cached_threshold(target, 0.0)
    }

    /// Threshold-tolerant form of [`query_cached`](Self::query_cached).
    ///
    /// The result cache is keyed by target offset only; mixing thresholds for
    /// the same target within one epoch returns whichever outcome was stored
    /// first.
    pub fn query_cached_threshold(&mut self, target: IVec3, threshold: f64) -> bool {
        self.check_epoch();
        let offset = target.wrapping_sub(self.origin_block);
        let start = self.origin;
        let end = target.as_dvec3();
        let center = self.origin_block;
        let Self {
            opacity,
            results,
            source,
            ..
        } = self;
        results.get_or_compute_bool(offset, || {
            cached_trace(
                opacity,
                source,
                center,
                start,
                end,
                TraceOptions::with_threshold(threshold),
            )
            .is_none()
        })
    }

    /// Whether the segment from the origin to `end` is clear. Skips the result
    /// cache but still goes through the opacity cache.
    pub fn query_uncached(&mut self, end: DVec3) -> bool {
        self.query_uncached_threshold(end, 0.0)
    }

    pub fn query_uncached_threshold(&mut self, end: DVec3, threshold: f64) -> bool {
        let start = self.origin;
        self.march(start, end, TraceOptions::with_threshold(threshold))
    }

    /// Whether the arbitrary segment `start..end` is clear.
    pub fn march(&mut self, start: DVec3, end: DVec3, options: TraceOptions) -> bool {
        self.trace_hit(start, end, options).is_none()
    }

    /// First obstruction on the segment `start..end`, if it is blocked.
    pub fn trace_hit(&mut self, start: DVec3, end: DVec3, options: TraceOptions) -> Option<RayHit> {
        self.check_epoch();
        cached_trace(
            &mut self.opacity,
            &self.source,
            self.origin_block,
            start,
            end,
            options,
        )
    }

    /// The current origin.
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// The voxel containing the origin; the center of both caches.
    pub fn origin_block(&self) -> IVec3 {
        self.origin_block
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn opacity_cache(&self) -> &OpacityCache {
        &self.opacity
    }

    pub fn result_cache(&self) -> &ResultCache {
        &self.results
    }

    fn refresh_stale(&mut self) {
        if self.opacity.is_empty() && self.results.is_empty() {
            self.stale = false;
        }
    }

    fn check_epoch(&self) {
        debug_assert!(
            !self.stale,
            "tracing engine queried after recenter without clearing its caches"
        );
    }
}

fn cached_trace<S: OpacitySource>(
    opacity: &mut OpacityCache,
    source: &S,
    center: IVec3,
    start: DVec3,
    end: DVec3,
    options: TraceOptions,
) -> Option<RayHit> {
    trace(start, end, options, |voxel| {
        opacity.get_or_compute_bool(voxel.wrapping_sub(center), || source.is_opaque(voxel))
    })
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
