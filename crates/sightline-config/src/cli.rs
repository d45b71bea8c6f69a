//! Command-line argument parsing for the sightline probe.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Sightline probe command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "sightline-probe", about = "Voxel line-of-sight probe")]
pub struct CliArgs {
    /// Opacity cache radius in chunks.
    #[arg(long)]
    pub cache_radius: Option<u32>,

    /// Obstruction length tolerated before a target counts as hidden.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Ignore the opaque run the viewer starts in.
    #[arg(long)]
    pub ignore_start: bool,

    /// Half-extent of the swept target cube, in voxels.
    #[arg(long)]
    pub reach: Option<i32>,

    /// Fraction of opaque voxels in the generated scene.
    #[arg(long)]
    pub density: Option<f64>,

    /// Scene generator seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(radius) = args.cache_radius {
            self.trace.cache_radius = radius;
        }
        if let Some(threshold) = args.threshold {
            self.trace.threshold = threshold;
        }
        if args.ignore_start {
            self.trace.ignore_start_if_opaque = true;
        }
        if let Some(reach) = args.reach {
            self.probe.reach = reach;
        }
        if let Some(density) = args.density {
            self.probe.density = density;
        }
        if let Some(seed) = args.seed {
            self.probe.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
