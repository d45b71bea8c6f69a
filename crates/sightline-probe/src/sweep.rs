//! Visibility sweeps over the cube of targets around the viewer.

use std::time::{Duration, Instant};

use glam::IVec3;
use sightline_config::TraceConfig;
use sightline_trace::{TraceOptions, TracingEngine};

use crate::scene::Scene;

/// Counters collected by one [`sweep`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SweepStats {
    pub targets: u64,
    pub visible: u64,
    /// Scene lookups the opacity cache could not answer.
    pub lookups: u64,
    pub cached_results: usize,
    pub dirty_chunks: usize,
    pub elapsed: Duration,
}

impl SweepStats {
    pub fn hidden(&self) -> u64 {
        self.targets - self.visible
    }
}

/// Queries every voxel within `reach` of the origin voxel on each axis.
///
/// Queries go through the result cache unless `ignore_start_if_opaque` is set;
/// cached queries always use the default start handling.
pub fn sweep(engine: &mut TracingEngine<Scene>, reach: i32, trace: &TraceConfig) -> SweepStats {
    let started = Instant::now();
    let lookups_before = engine.source().lookups();
    let center = engine.origin_block();
    let origin = engine.origin();

    let mut options = TraceOptions::with_threshold(trace.threshold);
    options.ignore_start_if_opaque = trace.ignore_start_if_opaque;

    let mut stats = SweepStats::default();
    for z in -reach..=reach {
        for y in -reach..=reach {
            for x in -reach..=reach {
                let target = center + IVec3::new(x, y, z);
                let visible = if trace.ignore_start_if_opaque {
                    engine.march(origin, target.as_dvec3(), options)
                } else if trace.threshold > 0.0 {
                    engine.query_cached_threshold(target, trace.threshold)
                } else {
                    engine.query_cached(target)
                };
                stats.targets += 1;
                stats.visible += u64::from(visible);
            }
        }
    }

    stats.lookups = engine.source().lookups() - lookups_before;
    stats.cached_results = engine.result_cache().len();
    stats.dirty_chunks = engine.opacity_cache().dirty_chunk_count();
    stats.elapsed = started.elapsed();
    stats
}
