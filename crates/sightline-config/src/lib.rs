//! Configuration for the sightline probe and tracing engine.
//!
//! Settings persist to disk as RON, can be overridden from the command line
//! via clap, and are validated before the engine is built.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, ProbeConfig, TraceConfig, default_config_dir};
pub use error::ConfigError;
