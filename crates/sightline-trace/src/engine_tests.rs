//! Unit tests for the cached tracing engine.

use std::cell::{Cell, RefCell};

use glam::{DVec3, IVec3};
use rustc_hash::FxHashSet;
use sightline_voxel::{CacheError, Direction, MAX_CACHE_RADIUS};

use crate::engine::TracingEngine;
use crate::segment::{OpacitySource, TraceOptions};

/// Sparse test world that counts how often it is asked about a voxel.
#[derive(Default)]
struct CountingWorld {
    opaque: RefCell<FxHashSet<IVec3>>,
    calls: Cell<usize>,
}

impl CountingWorld {
    fn with(voxels: impl IntoIterator<Item = IVec3>) -> Self {
        let world = Self::default();
        world.opaque.borrow_mut().extend(voxels);
        world
    }

    fn add(&self, voxel: IVec3) {
        self.opaque.borrow_mut().insert(voxel);
    }

    fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl OpacitySource for CountingWorld {
    fn is_opaque(&self, voxel: IVec3) -> bool {
        self.calls.set(self.calls.get() + 1);
        self.opaque.borrow().contains(&voxel)
    }
}

fn wall_at_x(x: i32) -> Vec<IVec3> {
    let mut wall = Vec::new();
    for y in -2..=2 {
        for z in -2..=2 {
            wall.push(IVec3::new(x, y, z));
        }
    }
    wall
}

const VIEWER: DVec3 = DVec3::new(0.5, 0.5, 0.5);

fn engine(world: CountingWorld) -> TracingEngine<CountingWorld> {
    let mut engine = TracingEngine::new(2, world).unwrap();
    engine.relocate(VIEWER);
    engine
}

#[test]
fn test_result_cache_reuse() {
    let mut engine = engine(CountingWorld::default());
    let target = IVec3::new(10, 0, 0);

    assert!(engine.query_cached(target));
    let after_first = engine.source().calls();
    assert!(after_first > 0);

    assert!(engine.query_cached(target));
    assert_eq!(engine.source().calls(), after_first);
    assert_eq!(engine.result_cache().get(target), Some(true));
}

#[test]
fn test_result_cache_reuse_from_world_origin() {
    let mut engine = TracingEngine::new(2, CountingWorld::default()).unwrap();
    engine.relocate(DVec3::ZERO);
    let target = IVec3::new(10, 0, 0);

    assert!(engine.query_cached(target));
    let after_first = engine.source().calls();
    assert!(after_first >= 10);

    assert!(engine.query_cached(target));
    assert_eq!(engine.source().calls(), after_first);
    assert_eq!(engine.result_cache().get(target), Some(true));

    engine.source().add(IVec3::new(5, 0, 0));
    engine.clear();
    assert!(!engine.query_cached(target));
}

#[test]
fn test_cached_query_through_exact_corner() {
    // The segment passes exactly through the corner shared with (1, 0, 0)
    // and steps through (0, 1, 0) instead.
    let mut engine = engine(CountingWorld::with([IVec3::new(1, 0, 0)]));
    assert!(engine.query_cached(IVec3::new(2, 2, 0)));
}

#[test]
fn test_uncached_query_still_uses_opacity_cache() {
    let mut engine = engine(CountingWorld::default());
    let end = DVec3::new(10.5, 0.5, 0.5);

    assert!(engine.query_uncached(end));
    let after_first = engine.source().calls();
    assert_eq!(after_first, 11);

    assert!(engine.query_uncached(end));
    assert_eq!(engine.source().calls(), after_first);
    assert!(engine.result_cache().is_empty());
    assert_eq!(engine.opacity_cache().dirty_chunk_count(), 1);
}

#[test]
fn test_cached_query_sees_wall() {
    let mut engine = engine(CountingWorld::with(wall_at_x(5)));
    assert!(!engine.query_cached(IVec3::new(10, 0, 0)));
    assert_eq!(engine.result_cache().get(IVec3::new(10, 0, 0)), Some(false));
    // In front of the wall is still visible.
    assert!(engine.query_cached(IVec3::new(4, 0, 0)));
}

#[test]
fn test_result_keyed_by_offset_from_origin_block() {
    let mut engine = TracingEngine::new(2, CountingWorld::default()).unwrap();
    engine.relocate(DVec3::new(100.5, 64.5, -20.5));
    assert_eq!(engine.origin_block(), IVec3::new(100, 64, -21));

    assert!(engine.query_cached(IVec3::new(110, 64, -21)));
    assert_eq!(engine.result_cache().get(IVec3::new(10, 0, 0)), Some(true));
}

#[test]
fn test_threshold_query_tolerates_thin_wall() {
    let mut engine = engine(CountingWorld::with(wall_at_x(5)));
    let target = IVec3::new(10, 0, 0);
    assert!(engine.query_cached_threshold(target, 2.0));

    engine.clear();
    assert!(!engine.query_cached_threshold(target, 0.5));
    engine.clear();
    assert!(!engine.query_cached(target));
}

#[test]
fn test_world_change_needs_clear() {
    let mut engine = engine(CountingWorld::default());
    let target = IVec3::new(10, 0, 0);
    assert!(engine.query_cached(target));

    engine.source().add(IVec3::new(5, 0, 0));
    // Stale until the caches are dropped.
    assert!(engine.query_cached(target));

    engine.clear_result_cache();
    // Opacity for (5, 0, 0) is still cached as transparent.
    assert!(engine.query_cached(target));

    engine.clear();
    assert!(!engine.query_cached(target));
}

#[test]
fn test_relocate_moves_center_and_empties_caches() {
    let mut engine = engine(CountingWorld::default());
    engine.query_cached(IVec3::new(3, 3, 3));
    assert!(!engine.result_cache().is_empty());
    assert!(!engine.opacity_cache().is_empty());

    engine.relocate(DVec3::new(-7.25, 2.0, 40.9));
    assert_eq!(engine.origin(), DVec3::new(-7.25, 2.0, 40.9));
    assert_eq!(engine.origin_block(), IVec3::new(-8, 2, 40));
    assert!(engine.result_cache().is_empty());
    assert!(engine.opacity_cache().is_empty());
}

#[test]
fn test_recenter_on_empty_caches_needs_no_clear() {
    let mut engine = TracingEngine::new(1, CountingWorld::default()).unwrap();
    engine.recenter(DVec3::new(3.5, 3.5, 3.5));
    engine.recenter(DVec3::new(9.5, 3.5, 3.5));
    assert!(engine.query_cached(IVec3::new(12, 3, 3)));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "without clearing")]
fn test_stale_origin_asserts_in_debug() {
    let mut engine = engine(CountingWorld::default());
    engine.query_cached(IVec3::new(5, 0, 0));
    engine.recenter(DVec3::new(20.5, 0.5, 0.5));
    engine.query_cached(IVec3::new(25, 0, 0));
}

#[test]
fn test_partial_clears_reset_staleness_once_both_empty() {
    let mut engine = engine(CountingWorld::default());
    engine.query_cached(IVec3::new(5, 0, 0));
    engine.recenter(DVec3::new(20.5, 0.5, 0.5));
    engine.clear_opacity_cache();
    engine.clear_result_cache();
    assert!(engine.query_cached(IVec3::new(25, 0, 0)));
}

#[test]
fn test_far_voxels_bypass_opacity_cache() {
    let mut engine = TracingEngine::new(0, CountingWorld::with([IVec3::new(60, 0, 0)])).unwrap();
    engine.relocate(VIEWER);
    let end = DVec3::new(100.5, 0.5, 0.5);

    assert!(!engine.query_uncached(end));
    let first = engine.source().calls();
    assert_eq!(first, 61);

    // Voxels 0..16 are cached, 16..=60 are asked again.
    assert!(!engine.query_uncached(end));
    assert_eq!(engine.source().calls(), first + 45);
}

#[test]
fn test_trace_hit_reports_entry_face() {
    let mut engine = engine(CountingWorld::with([IVec3::new(2, 0, 0)]));
    let hit = engine
        .trace_hit(VIEWER, DVec3::new(5.5, 0.5, 0.5), TraceOptions::BINARY)
        .unwrap();
    assert_eq!(hit.face, Direction::West);
    assert!((hit.point.x - 2.0).abs() < 1e-9);

    let hit = engine
        .trace_hit(DVec3::new(5.5, 0.5, 0.5), VIEWER, TraceOptions::BINARY)
        .unwrap();
    assert_eq!(hit.face, Direction::East);
    assert!((hit.point.x - 3.0).abs() < 1e-9);
}

#[test]
fn test_viewer_inside_geometry() {
    let mut engine = engine(CountingWorld::with([IVec3::ZERO]));
    let end = DVec3::new(5.5, 0.5, 0.5);
    assert!(!engine.march(VIEWER, end, TraceOptions::BINARY));
    assert!(engine.march(VIEWER, end, TraceOptions::BINARY.ignoring_start()));
}

#[test]
fn test_new_rejects_oversized_cache() {
    let result = TracingEngine::new(MAX_CACHE_RADIUS + 4, |_: IVec3| false);
    assert!(matches!(result, Err(CacheError::RadiusTooLarge { .. })));
}
