use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan",
    version,
    about = "LigVox CLI - Voxelize protein-ligand complexes into multi-channel van der Waals occupancy grids.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Voxelize a single protein-ligand complex and write the tensor as a .npy file.
    Voxelize(VoxelizeArgs),
    /// Voxelize every complex found in a data directory.
    Generate(GenerateArgs),
    /// Print the channel names and output shape of a grid configuration.
    Channels(ChannelsArgs),
}

/// Grid options shared by every subcommand. Values given here override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct GridArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Edge length of one voxel in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub voxel_size: Option<f32>,

    /// Box dimensions in Angstroms.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    pub box_dims: Option<Vec<f32>>,

    /// Views to use, in channel order (e.g. volume basic).
    #[arg(long, num_args = 1.., value_name = "VIEW")]
    pub views: Option<Vec<String>>,

    /// Occupancy function.
    #[arg(long, value_name = "NAME")]
    pub occupancy: Option<String>,

    /// Run the occupancy kernel on a single thread.
    #[arg(long)]
    pub serial: bool,

    /// Number of grid points processed per work unit.
    #[arg(long, value_name = "INT")]
    pub chunk_size: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S grid.voxel-size=0.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `voxelize` subcommand.
#[derive(Args, Debug)]
pub struct VoxelizeArgs {
    /// Path to the protein structure file (.pdb).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub protein: PathBuf,

    /// Path to the ligand structure file (.pdb).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub ligand: PathBuf,

    /// Path for the output tensor (.npy).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Do not join structures from the `cofactors/` directory next to the protein.
    #[arg(long)]
    pub no_cofactors: bool,

    /// Keep only protein atoms within this distance (Angstroms) of the ligand centroid.
    #[arg(long, value_name = "FLOAT")]
    pub pocket_cutoff: Option<f32>,

    #[command(flatten)]
    pub grid: GridArgs,
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Root directory for data files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Glob pattern for protein files, relative to the data directory.
    #[arg(long, default_value = "**/*_protein.pdb", value_name = "GLOB")]
    pub protein_pattern: String,

    /// Glob pattern for ligand files, relative to the data directory.
    #[arg(long, default_value = "**/*_ligand.pdb", value_name = "GLOB")]
    pub ligand_pattern: String,

    /// Output directory. Defaults to a `voxels` directory beside each protein's folder.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Do not join structures from `cofactors/` directories to the proteins.
    #[arg(long)]
    pub no_cofactors: bool,

    /// Keep only protein atoms within this distance (Angstroms) of the ligand centroid.
    #[arg(long, value_name = "FLOAT")]
    pub pocket_cutoff: Option<f32>,

    #[command(flatten)]
    pub grid: GridArgs,
}

/// Arguments for the `channels` subcommand.
#[derive(Args, Debug)]
pub struct ChannelsArgs {
    #[command(flatten)]
    pub grid: GridArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn voxelize_parses_paths_and_grid_overrides() {
        let cli = Cli::parse_from([
            "ligvox", "-vv", "voxelize", "-p", "p.pdb", "-l", "l.pdb", "-o", "out.npy",
            "--box-dims", "16", "16", "20", "--views", "volume", "basic", "-S",
            "grid.voxel-size=0.5",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Voxelize(args) => {
                assert_eq!(args.protein, PathBuf::from("p.pdb"));
                assert_eq!(args.grid.box_dims, Some(vec![16.0, 16.0, 20.0]));
                assert_eq!(
                    args.grid.views,
                    Some(vec!["volume".to_string(), "basic".to_string()])
                );
                assert_eq!(args.grid.set_values, vec!["grid.voxel-size=0.5"]);
                assert!(!args.no_cofactors);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn generate_uses_default_patterns() {
        let cli = Cli::parse_from(["ligvox", "generate", "-d", "data"]);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.protein_pattern, "**/*_protein.pdb");
                assert_eq!(args.ligand_pattern, "**/*_ligand.pdb");
                assert!(!args.no_cofactors);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn voxelize_accepts_no_cofactors_flag() {
        let cli = Cli::parse_from([
            "ligvox", "voxelize", "-p", "p.pdb", "-l", "l.pdb", "-o", "out.npy", "--no-cofactors",
        ]);
        match cli.command {
            Commands::Voxelize(args) => assert!(args.no_cofactors),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn box_dims_requires_three_values() {
        assert!(Cli::try_parse_from(["ligvox", "channels", "--box-dims", "10", "10"]).is_err());
    }
}
