use nalgebra::{Matrix3xX, Vector3};
use ndarray::{Array2, ArrayView2, s};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const DEFAULT_CHUNK_SIZE: usize = 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Occupancy function '{0}' is not implemented. Supported: vdw")]
pub struct UnsupportedModelError(pub String);

/// Occupancy functions that map atom-to-point distances onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OccupancyModel {
    /// `1 - exp(-(r / d)^12)`, with `r` the atom's van der Waals radius.
    #[default]
    Vdw,
}

impl FromStr for OccupancyModel {
    type Err = UnsupportedModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vdw" => Ok(OccupancyModel::Vdw),
            other => Err(UnsupportedModelError(other.to_string())),
        }
    }
}

impl fmt::Display for OccupancyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccupancyModel::Vdw => f.write_str("vdw"),
        }
    }
}

/// Where the occupancy kernel runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Single-threaded, chunk by chunk.
    Serial,
    /// Chunks of grid points are distributed over the rayon thread pool. Falls back to
    /// serial execution when the crate is built without the `parallel` feature.
    Parallel,
}

/// Execution settings for the occupancy kernel.
///
/// Values are always computed in `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComputeConfig {
    pub backend: Backend,
    /// Number of grid points whose atom occupancies are materialized at once.
    pub chunk_size: usize,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            backend: if cfg!(feature = "parallel") {
                Backend::Parallel
            } else {
                Backend::Serial
            },
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ComputeConfig {
    pub fn serial() -> Self {
        Self {
            backend: Backend::Serial,
            ..Self::default()
        }
    }
}

/// Continuous van der Waals occupancy of a point at distance `dist` from an atom of
/// radius `radius`.
///
/// A point that coincides with the atom center (`dist == 0`) has occupancy exactly 1.
/// In `f32` the value also rounds to exactly 1 for any `dist` below about `0.8 * radius`,
/// so every atom is surrounded by a small saturated core rather than a single peak.
#[inline]
pub fn vdw_occupancy(radius: f32, dist: f32) -> f32 {
    if dist <= 0.0 {
        return 1.0;
    }
    let ratio = radius / dist;
    -(-ratio.powi(12)).exp_m1()
}

/// Computes the `(channels, points)` van der Waals occupancy matrix.
///
/// Grid `points` are defined around the origin and are translated by `center` before
/// distances are measured. For each channel the value at a point is the maximum
/// occupancy over the atoms whose `mask` entry is true; channels without atoms stay 0.
///
/// Occupancies for a chunk of points are computed once against every atom and reused by
/// all channel reductions.
///
/// `coords`, `radii` and the columns of `mask` must describe the same atoms.
pub fn compute_vdw_occupancy(
    points: &Matrix3xX<f32>,
    coords: &Matrix3xX<f32>,
    radii: &[f32],
    mask: ArrayView2<bool>,
    center: &Vector3<f32>,
    config: &ComputeConfig,
) -> Array2<f32> {
    debug_assert_eq!(coords.ncols(), radii.len());
    debug_assert_eq!(coords.ncols(), mask.ncols());

    let n_points = points.ncols();
    let n_channels = mask.nrows();
    let mut out = Array2::<f32>::zeros((n_channels, n_points));

    let members: Vec<Vec<usize>> = mask
        .outer_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter_map(|(atom, &member)| member.then_some(atom))
                .collect()
        })
        .collect();
    if n_points == 0 || members.iter().all(Vec::is_empty) {
        return out;
    }

    let chunk_size = config.chunk_size.max(1);
    let starts: Vec<usize> = (0..n_points).step_by(chunk_size).collect();

    let reduce_chunk = |start: usize| -> (usize, Array2<f32>) {
        let len = chunk_size.min(n_points - start);
        let occs = occupancy_block(points, start, len, coords, radii, center);

        let mut block = Array2::<f32>::zeros((n_channels, len));
        for (channel, atoms) in members.iter().enumerate() {
            if atoms.is_empty() {
                continue;
            }
            for (p, occ_row) in occs.outer_iter().enumerate() {
                block[[channel, p]] = atoms.iter().map(|&a| occ_row[a]).fold(0.0, f32::max);
            }
        }
        (start, block)
    };

    #[cfg(feature = "parallel")]
    let blocks: Vec<(usize, Array2<f32>)> = match config.backend {
        Backend::Parallel => starts.par_iter().map(|&start| reduce_chunk(start)).collect(),
        Backend::Serial => starts.iter().map(|&start| reduce_chunk(start)).collect(),
    };

    #[cfg(not(feature = "parallel"))]
    let blocks: Vec<(usize, Array2<f32>)> =
        starts.iter().map(|&start| reduce_chunk(start)).collect();

    for (start, block) in blocks {
        out.slice_mut(s![.., start..start + block.ncols()])
            .assign(&block);
    }
    out
}

/// Occupancy of every atom at points `start..start + len`, shape `(len, n_atoms)`.
fn occupancy_block(
    points: &Matrix3xX<f32>,
    start: usize,
    len: usize,
    coords: &Matrix3xX<f32>,
    radii: &[f32],
    center: &Vector3<f32>,
) -> Array2<f32> {
    Array2::from_shape_fn((len, coords.ncols()), |(p, atom)| {
        let col = start + p;
        let dx = coords[(0, atom)] - (points[(0, col)] + center.x);
        let dy = coords[(1, atom)] - (points[(1, col)] + center.y);
        let dz = coords[(2, atom)] - (points[(2, col)] + center.z);
        let dist = (dx * dx + dy * dy + dz * dz).sqrt();
        vdw_occupancy(radii[atom], dist)
    })
}
