use ligvox::engine::error::VoxelError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Voxelization, structure reading or tensor export failed inside the library.
    #[error(transparent)]
    Core(#[from] VoxelError),

    /// The merged grid settings (defaults, config file, `-S`, flags) are not usable.
    #[error("Invalid voxel grid configuration: {0}")]
    Config(String),

    #[error("Could not read grid config file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid grid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
