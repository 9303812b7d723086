//! # Engine Module
//!
//! Turns molecular complexes into voxel tensors.
//!
//! - **Configuration** ([`config`]) - Grid parameters, view selection and compute settings
//! - **Voxel Grid** ([`voxel_grid`]) - The facade combining lattice, views and occupancy kernel
//! - **Dataset** ([`dataset`]) - Labeled collections of complexes voxelized on demand or in batch
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-level error type

pub mod config;
pub mod dataset;
pub mod error;
pub mod progress;
pub mod voxel_grid;
