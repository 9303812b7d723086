use crate::cli::GenerateArgs;
use crate::config::build_generate_job;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use ligvox::engine::progress::ProgressReporter;
use ligvox::engine::voxel_grid::VoxelGrid;
use ligvox::workflows;
use tracing::{info, warn};

pub fn run(args: GenerateArgs) -> Result<()> {
    let job = build_generate_job(&args)?;
    let grid = VoxelGrid::from_config(&job.grid)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Generating voxel dataset from {} ({} channels)...",
        job.workflow.data_dir.display(),
        grid.num_channels()
    );
    info!("Invoking the dataset generation workflow...");
    let summary = workflows::generate::run(&job.workflow, &grid, &reporter)?;

    println!("✓ Wrote {} tensor(s).", summary.written.len());
    for sidecar in &summary.sidecars {
        println!("  Metadata written to: {}", sidecar.display());
    }

    if !summary.failed.is_empty() {
        warn!("{} complex(es) could not be voxelized.", summary.failed.len());
        println!("Warning: {} complex(es) were skipped:", summary.failed.len());
        for (protein, reason) in &summary.failed {
            println!("  {}: {}", protein.display(), reason);
        }
    }
    Ok(())
}
