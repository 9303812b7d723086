use crate::cli::ChannelsArgs;
use crate::config::build_grid_config;
use crate::error::Result;
use ligvox::engine::voxel_grid::VoxelGrid;

pub fn run(args: ChannelsArgs) -> Result<()> {
    let config = build_grid_config(&args.grid)?;
    let grid = VoxelGrid::from_config(&config)?;

    let (c, x, y, z) = grid.shape();
    println!("Views:     {}", grid.view_names().join(", "));
    println!("Occupancy: {}", grid.occupancy());
    println!("Shape:     {} x {} x {} x {}", c, x, y, z);
    println!();
    for (idx, name) in grid.channel_names().iter().enumerate() {
        println!("{:>4}  {}", idx, name);
    }
    Ok(())
}
