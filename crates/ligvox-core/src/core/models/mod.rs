//! # Core Models Module
//!
//! Data structures describing the atoms that get voxelized.
//!
//! - [`complex`] - Parsed structure files (`MolecularData`) and protein-ligand complexes
//!   (`MolecularComplex`) with their fixed protein-first atom ordering
//! - [`element`] - Van der Waals radius lookup by element symbol

pub mod complex;
pub mod element;
