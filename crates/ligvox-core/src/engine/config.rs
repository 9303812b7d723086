use crate::core::occupancy::OccupancyModel;
use crate::core::views::ViewKind;
use thiserror::Error;

pub use crate::core::occupancy::{Backend, ComputeConfig};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Everything needed to build a [`VoxelGrid`](super::voxel_grid::VoxelGrid).
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGridConfig {
    /// Views in channel order.
    pub views: Vec<ViewKind>,
    /// Edge length of one voxel, in Angstroms.
    pub voxel_size: f32,
    /// Box extents along x, y and z, in Angstroms.
    pub box_dims: [f32; 3],
    pub occupancy: OccupancyModel,
    pub compute: ComputeConfig,
}

#[derive(Default)]
pub struct VoxelGridConfigBuilder {
    views: Option<Vec<ViewKind>>,
    voxel_size: Option<f32>,
    box_dims: Option<[f32; 3]>,
    occupancy: Option<OccupancyModel>,
    compute: Option<ComputeConfig>,
}

impl VoxelGridConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(mut self, views: Vec<ViewKind>) -> Self {
        self.views = Some(views);
        self
    }
    pub fn voxel_size(mut self, size: f32) -> Self {
        self.voxel_size = Some(size);
        self
    }
    pub fn box_dims(mut self, dims: [f32; 3]) -> Self {
        self.box_dims = Some(dims);
        self
    }
    pub fn occupancy(mut self, model: OccupancyModel) -> Self {
        self.occupancy = Some(model);
        self
    }
    pub fn compute(mut self, compute: ComputeConfig) -> Self {
        self.compute = Some(compute);
        self
    }

    /// Occupancy defaults to [`OccupancyModel::Vdw`] and compute settings to
    /// [`ComputeConfig::default`]; everything else is required.
    pub fn build(self) -> Result<VoxelGridConfig, ConfigError> {
        let compute = self.compute.unwrap_or_default();
        if compute.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "chunk_size",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(VoxelGridConfig {
            views: self.views.ok_or(ConfigError::MissingParameter("views"))?,
            voxel_size: self
                .voxel_size
                .ok_or(ConfigError::MissingParameter("voxel_size"))?,
            box_dims: self
                .box_dims
                .ok_or(ConfigError::MissingParameter("box_dims"))?,
            occupancy: self.occupancy.unwrap_or_default(),
            compute,
        })
    }
}
