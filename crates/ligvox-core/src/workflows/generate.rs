use super::voxelize::{assemble_complex, load_protein};
use crate::core::io::npy::{ExportError, write_npy};
use crate::core::io::read_structure;
#[cfg(feature = "parallel")]
use crate::engine::config::Backend;
use crate::engine::error::VoxelError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::voxel_grid::VoxelGrid;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Name of the metadata file written next to the generated tensors.
pub const SIDECAR_FILE_NAME: &str = "voxel.toml";

const DEFAULT_OUTPUT_DIR_NAME: &str = "voxels";

/// Inputs of the dataset generation workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateConfig {
    /// Root directory the glob patterns are resolved against.
    pub data_dir: PathBuf,
    /// Glob pattern for protein files, e.g. `**/*_protein.pdb`.
    pub protein_pattern: String,
    /// Glob pattern for ligand files, e.g. `**/*_ligand.pdb`.
    pub ligand_pattern: String,
    /// Where tensors are written. Defaults to a `voxels` directory next to each
    /// protein's parent directory.
    pub output_dir: Option<PathBuf>,
    /// Join structures from a sibling `cofactors/` directory to each protein.
    pub include_cofactors: bool,
    pub pocket_cutoff: Option<f32>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            protein_pattern: "**/*_protein.pdb".to_string(),
            ligand_pattern: "**/*_ligand.pdb".to_string(),
            output_dir: None,
            include_cofactors: true,
            pocket_cutoff: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct GenerateSummary {
    /// Tensor files written, in complex order.
    pub written: Vec<PathBuf>,
    /// Protein files whose complex could not be voxelized, with the reason.
    pub failed: Vec<(PathBuf, String)>,
    /// Metadata files written.
    pub sidecars: Vec<PathBuf>,
}

/// Parameters recorded next to a generated dataset.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct Sidecar<'a> {
    data_dir: String,
    protein_pattern: &'a str,
    ligand_pattern: &'a str,
    include_cofactors: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pocket_cutoff: Option<f32>,
    voxel_size: f32,
    box_dims: [f32; 3],
    views: Vec<&'static str>,
    occupancy: String,
    shape: [usize; 4],
    channels: Vec<String>,
}

/// Finds protein and ligand files, pairs them in sorted order, voxelizes every pair and
/// writes one `.npy` tensor per complex plus a `voxel.toml` sidecar per output directory.
///
/// # Errors
///
/// Fails before any tensor is written if a pattern is invalid, if either pattern matches
/// nothing, or if the two patterns match different numbers of files. Failures of
/// individual complexes are collected in the summary instead.
#[instrument(skip_all, name = "generate_workflow")]
pub fn run(
    config: &GenerateConfig,
    grid: &VoxelGrid,
    reporter: &ProgressReporter,
) -> Result<GenerateSummary, VoxelError> {
    // === Phase 1: Discovery ===
    reporter.report(Progress::PhaseStart { name: "Discovery" });
    let proteins = find_files(&config.data_dir, &config.protein_pattern)?;
    let ligands = find_files(&config.data_dir, &config.ligand_pattern)?;

    if proteins.is_empty() || ligands.is_empty() {
        return Err(VoxelError::InvalidParameter(format!(
            "no files found with pattern '{}' or '{}' in {}",
            config.protein_pattern,
            config.ligand_pattern,
            config.data_dir.display()
        )));
    }
    if proteins.len() != ligands.len() {
        return Err(VoxelError::InvalidParameter(format!(
            "found {} protein files but {} ligand files; check the patterns",
            proteins.len(),
            ligands.len()
        )));
    }
    info!(complexes = proteins.len(), "Paired protein and ligand files.");
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Voxelization ===
    reporter.report(Progress::PhaseStart {
        name: "Voxelization",
    });
    reporter.report(Progress::TaskStart {
        total_steps: proteins.len() as u64,
    });

    let suffix = pattern_suffix(&config.protein_pattern);
    let process = |(protein, ligand): (&PathBuf, &PathBuf)| {
        let output_dir = output_dir_for(config, protein);
        let result = voxelize_pair(config, grid, protein, ligand, &output_dir, suffix);
        reporter.report(Progress::TaskIncrement);
        (protein.clone(), output_dir, result)
    };

    let pairs: Vec<(&PathBuf, &PathBuf)> = proteins.iter().zip(ligands.iter()).collect();

    #[cfg(feature = "parallel")]
    let outcomes: Vec<_> = match grid.compute().backend {
        Backend::Parallel => pairs.into_par_iter().map(process).collect(),
        Backend::Serial => pairs.into_iter().map(process).collect(),
    };

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<_> = pairs.into_iter().map(process).collect();

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Metadata ===
    reporter.report(Progress::PhaseStart { name: "Metadata" });
    let mut summary = GenerateSummary::default();
    let mut output_dirs = BTreeSet::new();
    for (protein, output_dir, result) in outcomes {
        match result {
            Ok(path) => {
                summary.written.push(path);
                output_dirs.insert(output_dir);
            }
            Err(e) => {
                warn!(protein = %protein.display(), error = %e, "Skipping complex.");
                summary.failed.push((protein, e.to_string()));
            }
        }
    }

    for dir in output_dirs {
        let path = dir.join(SIDECAR_FILE_NAME);
        write_sidecar(&path, config, grid)?;
        summary.sidecars.push(path);
    }
    if !summary.failed.is_empty() {
        reporter.report(Progress::Message(format!(
            "{} of {} complexes failed",
            summary.failed.len(),
            proteins.len()
        )));
    }
    reporter.report(Progress::PhaseFinish);

    info!(
        written = summary.written.len(),
        failed = summary.failed.len(),
        "Dataset generation complete."
    );
    Ok(summary)
}

fn find_files(data_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, VoxelError> {
    let full_pattern = data_dir.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let entries = glob::glob(&pattern_str).map_err(|e| {
        VoxelError::InvalidParameter(format!("invalid glob pattern '{pattern}': {e}"))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("Unreadable path while searching '{}': {}", pattern, e),
        }
    }
    files.sort();
    Ok(files)
}

/// The literal tail of a pattern after its last `*`, stripped from file names to form
/// the complex identifier.
fn pattern_suffix(pattern: &str) -> &str {
    pattern.rsplit('*').next().unwrap_or("")
}

fn complex_basename(protein: &Path, suffix: &str) -> String {
    let name = protein
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(suffix) {
        Some(stem) if !suffix.is_empty() && !stem.is_empty() => stem.to_string(),
        _ => protein
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(name),
    }
}

fn output_dir_for(config: &GenerateConfig, protein: &Path) -> PathBuf {
    match &config.output_dir {
        Some(dir) => dir.clone(),
        None => {
            let parent = protein.parent().unwrap_or_else(|| Path::new(""));
            parent
                .parent()
                .unwrap_or(parent)
                .join(DEFAULT_OUTPUT_DIR_NAME)
        }
    }
}

fn voxelize_pair(
    config: &GenerateConfig,
    grid: &VoxelGrid,
    protein_path: &Path,
    ligand_path: &Path,
    output_dir: &Path,
    suffix: &str,
) -> Result<PathBuf, VoxelError> {
    let protein = load_protein(protein_path, config.include_cofactors)?;
    let ligand = read_structure(ligand_path)?;
    let complex = assemble_complex(protein, ligand, config.pocket_cutoff)?;
    let voxels = grid.voxelize(&complex)?;

    fs::create_dir_all(output_dir).map_err(|e| VoxelError::Export { source: e.into() })?;
    let path = output_dir.join(format!("{}.npy", complex_basename(protein_path, suffix)));
    write_npy(&path, &voxels)?;
    Ok(path)
}

fn write_sidecar(path: &Path, config: &GenerateConfig, grid: &VoxelGrid) -> Result<(), VoxelError> {
    let (c, x, y, z) = grid.shape();
    let sidecar = Sidecar {
        data_dir: config.data_dir.display().to_string(),
        protein_pattern: &config.protein_pattern,
        ligand_pattern: &config.ligand_pattern,
        include_cofactors: config.include_cofactors,
        pocket_cutoff: config.pocket_cutoff,
        voxel_size: grid.grid().voxel_size(),
        box_dims: grid.grid().box_dims(),
        views: grid.view_names(),
        occupancy: grid.occupancy().to_string(),
        shape: [c, x, y, z],
        channels: grid.channel_names(),
    };

    let content = toml::to_string_pretty(&sidecar).map_err(ExportError::from)?;
    fs::write(path, content).map_err(|e| VoxelError::Export { source: e.into() })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::views::{BasicView, VolumeView};
    use ndarray::Array4;
    use ndarray_npy::read_npy;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tempfile::tempdir;

    const PROTEIN_PDB: &str = "\
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1       1.458   0.000   0.000  1.00  0.00           C
END
";
    const LIGAND_PDB: &str = "\
HETATM    1  C1  LIG B   1       3.000   0.500   0.000  1.00  0.00           C
END
";

    fn write_complex(root: &Path, id: &str) {
        let dir = root.join(id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{id}_protein.pdb")), PROTEIN_PDB).unwrap();
        fs::write(dir.join(format!("{id}_ligand.pdb")), LIGAND_PDB).unwrap();
    }

    fn grid() -> VoxelGrid {
        VoxelGrid::new(
            vec![Box::new(VolumeView), Box::new(BasicView)],
            2.0,
            [8.0; 3],
            "vdw",
        )
        .unwrap()
    }

    #[test]
    fn pattern_suffix_is_text_after_last_wildcard() {
        assert_eq!(pattern_suffix("**/*_protein.pdb"), "_protein.pdb");
        assert_eq!(pattern_suffix("protein.pdb"), "protein.pdb");
        assert_eq!(pattern_suffix("*"), "");
    }

    #[test]
    fn basename_strips_pattern_suffix_or_falls_back_to_stem() {
        assert_eq!(
            complex_basename(Path::new("a/1abc_protein.pdb"), "_protein.pdb"),
            "1abc"
        );
        assert_eq!(complex_basename(Path::new("a/receptor.pdb"), "_protein.pdb"), "receptor");
        assert_eq!(complex_basename(Path::new("a/1abc.pdb"), ""), "1abc");
    }

    #[test]
    fn default_output_dir_is_voxels_next_to_protein_parent() {
        let config = GenerateConfig::default();
        assert_eq!(
            output_dir_for(&config, Path::new("/data/1abc/1abc_protein.pdb")),
            PathBuf::from("/data/voxels")
        );
    }

    #[test]
    fn generates_one_tensor_per_complex_and_a_sidecar() {
        let data = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_complex(data.path(), "1abc");
        write_complex(data.path(), "2xyz");

        let config = GenerateConfig {
            data_dir: data.path().to_path_buf(),
            output_dir: Some(out.path().to_path_buf()),
            ..GenerateConfig::default()
        };
        let grid = grid();

        let increments = AtomicU64::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::TaskIncrement = event {
                increments.fetch_add(1, Ordering::Relaxed);
            }
        }));
        let summary = run(&config, &grid, &reporter).unwrap();
        drop(reporter);

        assert_eq!(increments.load(Ordering::Relaxed), 2);
        assert!(summary.failed.is_empty());
        assert_eq!(
            summary.written,
            vec![out.path().join("1abc.npy"), out.path().join("2xyz.npy")]
        );

        let voxels: Array4<f32> = read_npy(out.path().join("1abc.npy")).unwrap();
        assert_eq!(voxels.dim(), (21, 4, 4, 4));

        assert_eq!(summary.sidecars, vec![out.path().join(SIDECAR_FILE_NAME)]);
        let sidecar: toml::Value =
            toml::from_str(&fs::read_to_string(&summary.sidecars[0]).unwrap()).unwrap();
        assert_eq!(sidecar["voxel-size"].as_float(), Some(2.0));
        assert_eq!(sidecar["occupancy"].as_str(), Some("vdw"));
        assert_eq!(sidecar["channels"].as_array().map(|a| a.len()), Some(21));
    }

    #[test]
    fn unequal_file_counts_fail_before_writing() {
        let data = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_complex(data.path(), "1abc");
        fs::write(data.path().join("1abc").join("extra_protein.pdb"), PROTEIN_PDB).unwrap();

        let config = GenerateConfig {
            data_dir: data.path().to_path_buf(),
            output_dir: Some(out.path().to_path_buf()),
            ..GenerateConfig::default()
        };
        let err = run(&config, &grid(), &ProgressReporter::new()).unwrap_err();

        assert!(matches!(err, VoxelError::InvalidParameter(_)));
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn no_matching_files_is_an_error() {
        let data = tempdir().unwrap();
        let config = GenerateConfig {
            data_dir: data.path().to_path_buf(),
            ..GenerateConfig::default()
        };
        let err = run(&config, &grid(), &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, VoxelError::InvalidParameter(_)));
    }

    #[test]
    fn broken_complex_is_recorded_without_stopping_the_rest() {
        let data = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_complex(data.path(), "1abc");
        write_complex(data.path(), "2bad");
        fs::write(data.path().join("2bad").join("2bad_ligand.pdb"), "END\n").unwrap();

        let config = GenerateConfig {
            data_dir: data.path().to_path_buf(),
            output_dir: Some(out.path().to_path_buf()),
            ..GenerateConfig::default()
        };
        let summary = run(&config, &grid(), &ProgressReporter::new()).unwrap();

        assert_eq!(summary.written, vec![out.path().join("1abc.npy")]);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].0.ends_with("2bad_protein.pdb"));
    }
}
