use crate::cli::VoxelizeArgs;
use crate::config::build_voxelize_job;
use crate::error::Result;
use ligvox::core::io::npy::write_npy;
use ligvox::engine::error::VoxelError;
use ligvox::engine::voxel_grid::VoxelGrid;
use ligvox::workflows;
use tracing::info;

pub fn run(args: VoxelizeArgs) -> Result<()> {
    let job = build_voxelize_job(&args)?;
    let grid = VoxelGrid::from_config(&job.grid)?;

    info!(
        protein = %job.protein_path.display(),
        ligand = %job.ligand_path.display(),
        "Voxelizing complex."
    );
    let voxels = workflows::voxelize::run(
        &job.protein_path,
        &job.ligand_path,
        &grid,
        job.pocket_cutoff,
        job.include_cofactors,
    )?;

    info!("Writing tensor to {:?}", &job.output_path);
    write_npy(&job.output_path, &voxels).map_err(VoxelError::from)?;

    let (c, x, y, z) = voxels.dim();
    println!(
        "✓ Wrote {}x{}x{}x{} tensor to: {}",
        c,
        x,
        y,
        z,
        job.output_path.display()
    );
    Ok(())
}
