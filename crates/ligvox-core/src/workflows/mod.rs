//! End-to-end pipelines built on the engine: voxelizing a single complex from files and
//! generating a voxel dataset from a directory of structures.

pub mod generate;
pub mod voxelize;
