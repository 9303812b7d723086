use super::config::{ComputeConfig, VoxelGridConfig};
use super::error::VoxelError;
use crate::core::grid::Grid3D;
use crate::core::models::complex::MolecularComplex;
use crate::core::occupancy::{OccupancyModel, compute_vdw_occupancy};
use crate::core::views::{View, ViewComposer};
use ndarray::{Array2, Array4, ArrayView2};
use tracing::{debug, instrument};

/// Voxelizes protein-ligand complexes into `(channels, x, y, z)` occupancy tensors.
///
/// A voxel grid owns the sample lattice, the ordered view list and the occupancy model.
/// It holds no per-structure state, so one instance can be shared across threads and
/// every call is a pure function of the complex passed in.
#[derive(Debug)]
pub struct VoxelGrid {
    composer: ViewComposer,
    grid: Grid3D,
    occupancy: OccupancyModel,
    compute: ComputeConfig,
}

impl VoxelGrid {
    /// Builds a voxel grid from views, lattice parameters and an occupancy model name.
    ///
    /// # Errors
    ///
    /// Returns [`VoxelError::InvalidParameter`] for a degenerate lattice and
    /// [`VoxelError::UnsupportedOccupancyModel`] for any model other than `"vdw"`.
    pub fn new(
        views: Vec<Box<dyn View>>,
        voxel_size: f32,
        box_dims: [f32; 3],
        occupancy: &str,
    ) -> Result<Self, VoxelError> {
        let occupancy: OccupancyModel = occupancy.parse()?;
        Self::assemble(views, voxel_size, box_dims, occupancy, ComputeConfig::default())
    }

    pub fn from_config(config: &VoxelGridConfig) -> Result<Self, VoxelError> {
        let views = config.views.iter().map(|kind| kind.build()).collect();
        Self::assemble(
            views,
            config.voxel_size,
            config.box_dims,
            config.occupancy,
            config.compute,
        )
    }

    fn assemble(
        views: Vec<Box<dyn View>>,
        voxel_size: f32,
        box_dims: [f32; 3],
        occupancy: OccupancyModel,
        compute: ComputeConfig,
    ) -> Result<Self, VoxelError> {
        let grid = Grid3D::new(voxel_size, box_dims)?;
        let composer = ViewComposer::new(views);
        debug!(
            channels = composer.num_channels(),
            points = grid.num_points(),
            voxel_size,
            "Voxel grid ready."
        );
        Ok(Self {
            composer,
            grid,
            occupancy,
            compute,
        })
    }

    /// Replaces the compute settings, e.g. to force serial execution.
    pub fn with_compute(mut self, compute: ComputeConfig) -> Self {
        self.compute = compute;
        self
    }

    pub fn compute(&self) -> &ComputeConfig {
        &self.compute
    }

    pub fn occupancy(&self) -> OccupancyModel {
        self.occupancy
    }

    pub fn grid(&self) -> &Grid3D {
        &self.grid
    }

    pub fn num_channels(&self) -> usize {
        self.composer.num_channels()
    }

    pub fn channel_names(&self) -> Vec<String> {
        self.composer.channel_names()
    }

    pub fn view_names(&self) -> Vec<&'static str> {
        self.composer.views().iter().map(|v| v.name()).collect()
    }

    /// Output tensor shape `(channels, dim_x, dim_y, dim_z)`.
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        let (dx, dy, dz) = self.grid.axes_dims();
        (self.num_channels(), dx, dy, dz)
    }

    /// The `(channels, n_atoms)` membership mask the views derive for `complex`.
    pub fn channel_mask(&self, complex: &MolecularComplex) -> Result<Array2<bool>, VoxelError> {
        Ok(self.composer.build_mask(complex)?)
    }

    pub fn voxelize(&self, complex: &MolecularComplex) -> Result<Array4<f32>, VoxelError> {
        let mut out = Array4::zeros(self.shape());
        self.voxelize_into(complex, &mut out, None)?;
        Ok(out)
    }

    /// Voxelizes with a caller-supplied `(channels, n_atoms)` mask instead of the views.
    pub fn voxelize_with_mask(
        &self,
        complex: &MolecularComplex,
        mask: ArrayView2<bool>,
    ) -> Result<Array4<f32>, VoxelError> {
        let mut out = Array4::zeros(self.shape());
        self.voxelize_into(complex, &mut out, Some(mask))?;
        Ok(out)
    }

    /// Writes the voxel tensor of `complex` into `out`.
    ///
    /// Shapes are validated before anything is written. On success every element of `out`
    /// is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`VoxelError::ShapeMismatch`] if `out` does not have [`Self::shape`] or if
    /// `mask` is not `(channels, n_atoms)`.
    #[instrument(skip_all, name = "voxelize", fields(atoms = complex.n_atoms()))]
    pub fn voxelize_into(
        &self,
        complex: &MolecularComplex,
        out: &mut Array4<f32>,
        mask: Option<ArrayView2<bool>>,
    ) -> Result<(), VoxelError> {
        let shape = self.shape();
        if out.dim() != shape {
            return Err(VoxelError::ShapeMismatch {
                what: "output tensor",
                expected: vec![shape.0, shape.1, shape.2, shape.3],
                found: out.shape().to_vec(),
            });
        }

        let expected_mask = (self.num_channels(), complex.n_atoms());
        let derived;
        let mask = match mask {
            Some(mask) => {
                if mask.dim() != expected_mask {
                    return Err(VoxelError::ShapeMismatch {
                        what: "channel mask",
                        expected: vec![expected_mask.0, expected_mask.1],
                        found: mask.shape().to_vec(),
                    });
                }
                mask.reborrow()
            }
            None => {
                derived = self.composer.build_mask(complex)?;
                derived.view()
            }
        };

        let values = match self.occupancy {
            OccupancyModel::Vdw => compute_vdw_occupancy(
                self.grid.points(),
                complex.coords(),
                complex.vdw_radii(),
                mask,
                complex.ligand_center(),
                &self.compute,
            ),
        };

        let values = values
            .into_shape_with_order(shape)
            .map_err(|e| VoxelError::Internal(format!("occupancy matrix reshape failed: {e}")))?;
        out.assign(&values);
        Ok(())
    }
}
