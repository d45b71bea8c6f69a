//! Sightline probe: sweeps line-of-sight queries over a seeded voxel scene.
//!
//! Builds a random scene, centers a cached tracing engine on the configured
//! viewer, and sweeps every voxel in a cube around it. Repeated passes show the
//! result cache at work; a final sweep after moving the viewer by one chunk
//! shows the caches refilling from scratch.
//!
//! Run with: `cargo run -p sightline-probe -- --reach 32 --threshold 1.5`

mod scene;
mod sweep;

use clap::Parser;
use glam::{DVec3, IVec3};
use sightline_config::{CliArgs, Config, default_config_dir};
use sightline_trace::{TracingEngine, floor_vec};
use sightline_voxel::CHUNK_SIZE;
use tracing::{error, info, warn};

use crate::scene::Scene;
use crate::sweep::{SweepStats, sweep};

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    sightline_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        error!("{e}");
        std::process::exit(1);
    }

    let origin = DVec3::from_array(config.probe.origin);
    let shifted = origin + DVec3::new(f64::from(CHUNK_SIZE), 0.0, 0.0);
    let scene = build_scene(&config, origin, shifted);
    info!(
        seed = config.probe.seed,
        scattered = scene.scattered_count(),
        ground_top = scene.ground_top(),
        "generated scene"
    );
    if scene.is_solid(floor_vec(origin)) && !config.trace.ignore_start_if_opaque {
        warn!("viewer starts inside geometry; every target will be hidden");
    }

    let mut engine = match TracingEngine::new(config.trace.cache_radius, scene) {
        Ok(engine) => engine,
        Err(e) => {
            error!("failed to create tracing engine: {e}");
            std::process::exit(1);
        }
    };

    engine.relocate(origin);
    for pass in 1..=config.probe.passes {
        let stats = sweep(&mut engine, config.probe.reach, &config.trace);
        report(&format!("pass {pass}"), &stats);
    }

    // Every cached entry is relative to the old origin.
    engine.relocate(shifted);
    let stats = sweep(&mut engine, config.probe.reach, &config.trace);
    report("shifted one chunk", &stats);
}

/// Generates a scene covering the swept cubes around both viewer positions.
fn build_scene(config: &Config, origin: DVec3, shifted: DVec3) -> Scene {
    let reach = IVec3::splat(config.probe.reach);
    let a = floor_vec(origin);
    let b = floor_vec(shifted);
    Scene::generate(
        config.probe.seed,
        config.probe.density,
        a,
        a.min(b) - reach,
        a.max(b) + reach,
    )
}

fn report(label: &str, stats: &SweepStats) {
    info!(
        targets = stats.targets,
        visible = stats.visible,
        hidden = stats.hidden(),
        lookups = stats.lookups,
        cached_results = stats.cached_results,
        dirty_chunks = stats.dirty_chunks,
        elapsed_ms = stats.elapsed.as_secs_f64() * 1000.0,
        "{label}"
    );
}
