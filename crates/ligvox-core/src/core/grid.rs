use nalgebra::Matrix3xX;
use thiserror::Error;

// Relative slack for `box / voxel` ratios that land a hair below an integer (e.g. 2.4 / 0.1).
const AXIS_COUNT_TOLERANCE: f64 = 1e-5;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("Invalid grid parameter '{name}': {value} (must be positive and finite)")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("Box dimension {value} along axis {axis} is smaller than one voxel of size {voxel_size}")]
    EmptyAxis {
        axis: usize,
        value: f32,
        voxel_size: f32,
    },
}

/// A regular 3D lattice of sample points centered at the origin.
///
/// Each axis holds `floor(box_dim / voxel_size)` coordinates starting at `-box_dim / 2`
/// and spaced exactly `voxel_size` apart. The flattened point set enumerates the
/// Cartesian product of the axes in row-major order: x varies slowest, z fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid3D {
    voxel_size: f32,
    box_dims: [f32; 3],
    axes: [Vec<f32>; 3],
    points: Matrix3xX<f32>,
}

impl Grid3D {
    /// Builds the lattice for a box of `box_dims` sampled every `voxel_size`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidParameter`] if `voxel_size` or any box dimension is not
    /// strictly positive and finite, and [`GridError::EmptyAxis`] if the box is smaller than
    /// a single voxel along some axis.
    pub fn new(voxel_size: f32, box_dims: [f32; 3]) -> Result<Self, GridError> {
        if !(voxel_size.is_finite() && voxel_size > 0.0) {
            return Err(GridError::InvalidParameter {
                name: "voxel_size",
                value: voxel_size,
            });
        }
        for &dim in &box_dims {
            if !(dim.is_finite() && dim > 0.0) {
                return Err(GridError::InvalidParameter {
                    name: "box_dims",
                    value: dim,
                });
            }
        }

        let axes = [
            build_axis(0, box_dims[0], voxel_size)?,
            build_axis(1, box_dims[1], voxel_size)?,
            build_axis(2, box_dims[2], voxel_size)?,
        ];
        let points = build_points(&axes);

        Ok(Self {
            voxel_size,
            box_dims,
            axes,
            points,
        })
    }

    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    pub fn box_dims(&self) -> [f32; 3] {
        self.box_dims
    }

    /// The x, y and z coordinate axes.
    pub fn axes(&self) -> &[Vec<f32>; 3] {
        &self.axes
    }

    /// Number of samples along each axis.
    pub fn axes_dims(&self) -> (usize, usize, usize) {
        (self.axes[0].len(), self.axes[1].len(), self.axes[2].len())
    }

    /// Grid point coordinates, one column per point.
    pub fn points(&self) -> &Matrix3xX<f32> {
        &self.points
    }

    pub fn num_points(&self) -> usize {
        self.points.ncols()
    }
}

fn build_axis(axis: usize, box_dim: f32, voxel_size: f32) -> Result<Vec<f32>, GridError> {
    let ratio = f64::from(box_dim) / f64::from(voxel_size);
    let nearest = ratio.round();
    let count = if (ratio - nearest).abs() <= AXIS_COUNT_TOLERANCE * nearest.max(1.0) {
        nearest as usize
    } else {
        ratio.floor() as usize
    };
    if count == 0 {
        return Err(GridError::EmptyAxis {
            axis,
            value: box_dim,
            voxel_size,
        });
    }
    let half = box_dim / 2.0;
    Ok((0..count).map(|i| i as f32 * voxel_size - half).collect())
}

fn build_points(axes: &[Vec<f32>; 3]) -> Matrix3xX<f32> {
    let [x, y, z] = axes;
    let (ny, nz) = (y.len(), z.len());
    let total = x.len() * ny * nz;

    Matrix3xX::from_fn(total, |row, col| match row {
        0 => x[col / (ny * nz)],
        1 => y[(col / nz) % ny],
        _ => z[col % nz],
    })
}
