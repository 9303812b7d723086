use ligvox::engine::config::VoxelGridConfig;
use ligvox::workflows::generate::GenerateConfig;
use std::path::PathBuf;

/// Fully resolved inputs of the `voxelize` subcommand.
#[derive(Debug, Clone)]
pub struct VoxelizeJob {
    pub protein_path: PathBuf,
    pub ligand_path: PathBuf,
    pub output_path: PathBuf,
    pub pocket_cutoff: Option<f32>,
    pub include_cofactors: bool,
    pub grid: VoxelGridConfig,
}

/// Fully resolved inputs of the `generate` subcommand.
#[derive(Debug, Clone)]
pub struct GenerateJob {
    pub workflow: GenerateConfig,
    pub grid: VoxelGridConfig,
}
