use super::config::ConfigError;
use crate::core::grid::GridError;
use crate::core::io::StructureError;
use crate::core::io::npy::ExportError;
use crate::core::models::complex::ComplexError;
use crate::core::occupancy::UnsupportedModelError;
use crate::core::views::ViewError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoxelError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Shape mismatch for {what}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error(transparent)]
    UnsupportedOccupancyModel(#[from] UnsupportedModelError),

    #[error("Structure input failed: {source}")]
    Structure {
        #[from]
        source: StructureError,
    },

    #[error("Invalid complex: {source}")]
    Complex {
        #[from]
        source: ComplexError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Export failed: {source}")]
    Export {
        #[from]
        source: ExportError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl From<GridError> for VoxelError {
    fn from(err: GridError) -> Self {
        VoxelError::InvalidParameter(err.to_string())
    }
}

impl From<ViewError> for VoxelError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::ShapeMismatch {
                expected_rows,
                expected_cols,
                found_rows,
                found_cols,
                ..
            } => VoxelError::ShapeMismatch {
                what: "view mask",
                expected: vec![expected_rows, expected_cols],
                found: vec![found_rows, found_cols],
            },
            other @ ViewError::UnknownView(_) => VoxelError::InvalidParameter(other.to_string()),
        }
    }
}
