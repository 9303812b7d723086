//! # LigVox Core Library
//!
//! Converts protein-ligand complexes into fixed-size, multi-channel 3D occupancy grids
//! suitable as input tensors for machine-learning models.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularComplex`), the sample
//!   lattice (`Grid3D`), channel definitions (`View`), the van der Waals occupancy kernel,
//!   structure I/O and geometric transforms.
//!
//! - **[`engine`]: The Logic Core.** The `VoxelGrid` facade that ties a lattice and a list
//!   of views together, its configuration and error types, and `VoxelDataset` for
//!   voxelizing many complexes.
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as "voxelize this
//!   protein and ligand file pair" or "generate a voxel dataset for a directory".

pub mod core;
pub mod engine;
pub mod workflows;
