//! # Core Module
//!
//! Fundamental building blocks for turning atomic structures into occupancy grids.
//!
//! - **Sample Lattice** ([`grid`]) - Regular 3D grid of points centered at the origin
//! - **Molecular Representation** ([`models`]) - Parsed structures, complexes and element radii
//! - **Channel Definitions** ([`views`]) - Pluggable atom-to-channel membership rules
//! - **Occupancy Kernel** ([`occupancy`]) - Continuous van der Waals occupancy computation
//! - **File I/O** ([`io`]) - Structure readers and tensor export
//! - **Augmentation** ([`transforms`]) - Rigid random rotations of coordinates
//! - **Geometry Helpers** ([`utils`]) - Binding pocket selection and related utilities

pub mod grid;
pub mod io;
pub mod models;
pub mod occupancy;
pub mod transforms;
pub mod utils;
pub mod views;
