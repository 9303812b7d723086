//! Layered configuration for the CLI: built-in defaults, an optional TOML file,
//! `-S key=value` overrides and finally explicit command-line flags.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::{build_generate_job, build_grid_config, build_voxelize_job};
