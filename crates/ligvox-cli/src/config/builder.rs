use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{GenerateJob, VoxelizeJob};
use crate::cli::{GenerateArgs, GridArgs, VoxelizeArgs};
use crate::error::{CliError, Result};
use ligvox::core::occupancy::OccupancyModel;
use ligvox::core::views::ViewKind;
use ligvox::engine::config::{Backend, ComputeConfig, VoxelGridConfig, VoxelGridConfigBuilder};
use ligvox::workflows::generate::GenerateConfig;
use std::str::FromStr;

pub fn build_voxelize_job(args: &VoxelizeArgs) -> Result<VoxelizeJob> {
    Ok(VoxelizeJob {
        protein_path: args.protein.clone(),
        ligand_path: args.ligand.clone(),
        output_path: args.output.clone(),
        pocket_cutoff: args.pocket_cutoff,
        include_cofactors: !args.no_cofactors,
        grid: build_grid_config(&args.grid)?,
    })
}

pub fn build_generate_job(args: &GenerateArgs) -> Result<GenerateJob> {
    Ok(GenerateJob {
        workflow: GenerateConfig {
            data_dir: args.data_dir.clone(),
            protein_pattern: args.protein_pattern.clone(),
            ligand_pattern: args.ligand_pattern.clone(),
            output_dir: args.output_dir.clone(),
            include_cofactors: !args.no_cofactors,
            pocket_cutoff: args.pocket_cutoff,
        },
        grid: build_grid_config(&args.grid)?,
    })
}

/// Resolves grid settings with precedence: CLI flag, then `-S` override, then config
/// file, then built-in default.
pub fn build_grid_config(args: &GridArgs) -> Result<VoxelGridConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let grid_file = file_config.grid.take().unwrap_or_default();
    let compute_file = file_config.compute.take().unwrap_or_default();

    let voxel_size = args
        .voxel_size
        .or(grid_file.voxel_size)
        .unwrap_or(defaults.voxel_size);

    let box_dims = match &args.box_dims {
        Some(dims) => parse_box_dims(dims)?,
        None => grid_file.box_dims.unwrap_or(defaults.box_dims),
    };

    let view_names = args
        .views
        .clone()
        .or(grid_file.views)
        .unwrap_or(defaults.views);
    let views = view_names
        .iter()
        .map(|name| ViewKind::from_str(name).map_err(|e| CliError::Config(e.to_string())))
        .collect::<Result<Vec<_>>>()?;

    let occupancy_name = args
        .occupancy
        .clone()
        .or(grid_file.occupancy)
        .unwrap_or(defaults.occupancy);
    let occupancy = OccupancyModel::from_str(&occupancy_name)
        .map_err(|e| CliError::Config(e.to_string()))?;

    let parallel = !args.serial && compute_file.parallel.unwrap_or(defaults.parallel);
    let compute = ComputeConfig {
        backend: if parallel {
            Backend::Parallel
        } else {
            Backend::Serial
        },
        chunk_size: args
            .chunk_size
            .or(compute_file.chunk_size)
            .unwrap_or(defaults.chunk_size),
    };

    VoxelGridConfigBuilder::new()
        .views(views)
        .voxel_size(voxel_size)
        .box_dims(box_dims)
        .occupancy(occupancy)
        .compute(compute)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn parse_box_dims(values: &[f32]) -> Result<[f32; 3]> {
    <[f32; 3]>::try_from(values).map_err(|_| {
        CliError::Argument(format!(
            "box dimensions need exactly 3 values, got {}",
            values.len()
        ))
    })
}

fn parse_list<T: FromStr>(key: &str, value_str: &str) -> Result<Vec<T>> {
    value_str
        .split(',')
        .map(|item| {
            item.trim().parse().map_err(|_| {
                CliError::Config(format!("Invalid list item for {}: '{}'", key, item))
            })
        })
        .collect()
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "grid.voxel-size" => {
                config.grid.get_or_insert_with(Default::default).voxel_size =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                    })?);
            }
            "grid.box-dims" => {
                let dims: Vec<f32> = parse_list(key, value_str)?;
                config.grid.get_or_insert_with(Default::default).box_dims =
                    Some(parse_box_dims(&dims)?);
            }
            "grid.views" => {
                config.grid.get_or_insert_with(Default::default).views =
                    Some(parse_list(key, value_str)?);
            }
            "grid.occupancy" => {
                config.grid.get_or_insert_with(Default::default).occupancy =
                    Some(value_str.to_string());
            }
            "compute.parallel" => {
                config.compute.get_or_insert_with(Default::default).parallel =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid boolean value for {}: {}", key, value_str))
                    })?);
            }
            "compute.chunk-size" => {
                config.compute.get_or_insert_with(Default::default).chunk_size =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                    })?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
