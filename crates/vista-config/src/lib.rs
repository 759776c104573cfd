//! Configuration system for the terrain demo.
//!
//! Every generation parameter (noise, heightmap grid, biome table, mesh
//! settings) lives here and persists to disk as RON. Supports CLI overrides
//! via clap and change detection on reload.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, Config, DebugConfig, OutputConfig, TerrainConfig};
pub use error::ConfigError;
