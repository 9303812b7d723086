use crate::core::io::read_structure;
use crate::core::models::complex::{ComplexError, MolecularComplex, MolecularData};
use crate::core::utils::geometry::binding_pocket;
use crate::engine::error::VoxelError;
use crate::engine::voxel_grid::VoxelGrid;
use ndarray::Array4;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Name of the directory, next to a protein file, holding cofactor structures that belong
/// to the receptor.
pub const COFACTOR_DIR_NAME: &str = "cofactors";

/// Reads a protein file and, when `with_cofactors` is set, appends every `.pdb` file found
/// in a sibling `cofactors/` directory (in file-name order).
pub fn load_protein(path: &Path, with_cofactors: bool) -> Result<MolecularData, VoxelError> {
    let protein = read_structure(path)?;
    if !with_cofactors {
        return Ok(protein);
    }

    let cofactor_dir = path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(COFACTOR_DIR_NAME);
    if !cofactor_dir.is_dir() {
        return Ok(protein);
    }

    let mut cofactor_paths: Vec<_> = fs::read_dir(&cofactor_dir)
        .map_err(|e| VoxelError::Structure { source: e.into() })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdb"))
        })
        .collect();
    cofactor_paths.sort();

    let mut parts = vec![protein];
    for cofactor in &cofactor_paths {
        parts.push(read_structure(cofactor)?);
    }
    debug!(
        cofactors = cofactor_paths.len(),
        protein = %path.display(),
        "Joined cofactors to protein."
    );
    Ok(MolecularData::concat(&parts))
}

/// Builds a complex, optionally cropping the protein to atoms within `pocket_cutoff`
/// Angstroms of the ligand centroid.
pub fn assemble_complex(
    protein: MolecularData,
    ligand: MolecularData,
    pocket_cutoff: Option<f32>,
) -> Result<MolecularComplex, VoxelError> {
    let protein = match pocket_cutoff {
        Some(cutoff) => {
            if !(cutoff.is_finite() && cutoff > 0.0) {
                return Err(VoxelError::InvalidParameter(format!(
                    "pocket cutoff must be positive and finite, got {cutoff}"
                )));
            }
            let center = ligand.centroid().ok_or(ComplexError::EmptyLigand)?;
            let pocket = binding_pocket(&protein.coords, &center, cutoff);
            if pocket.is_empty() {
                warn!(cutoff, "No protein atoms within the pocket cutoff.");
            }
            protein.select(&pocket)
        }
        None => protein,
    };
    Ok(MolecularComplex::new(protein, ligand)?)
}

/// Voxelizes the complex formed by one protein file and one ligand file.
///
/// Protein loading follows [`load_protein`], so the tensor matches the one the dataset
/// generator writes for the same files and settings.
#[instrument(skip_all, name = "voxelize_workflow")]
pub fn run(
    protein_path: &Path,
    ligand_path: &Path,
    grid: &VoxelGrid,
    pocket_cutoff: Option<f32>,
    include_cofactors: bool,
) -> Result<Array4<f32>, VoxelError> {
    let protein = load_protein(protein_path, include_cofactors)?;
    let ligand = read_structure(ligand_path)?;
    let complex = assemble_complex(protein, ligand, pocket_cutoff)?;

    info!(
        protein_atoms = complex.n_atoms_protein(),
        ligand_atoms = complex.n_atoms_ligand(),
        "Voxelizing complex."
    );
    grid.voxelize(&complex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::views::VolumeView;
    use tempfile::tempdir;

    const PROTEIN_PDB: &str = "\
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1       1.458   0.000   0.000  1.00  0.00           C
ATOM      3  CB  ALA A   1      30.000  30.000  30.000  1.00  0.00           C
END
";
    const LIGAND_PDB: &str = "\
HETATM    1  C1  LIG B   1       3.000   0.500   0.000  1.00  0.00           C
HETATM    2  O1  LIG B   1       4.200   0.500   0.000  1.00  0.00           O
END
";
    const COFACTOR_PDB: &str = "\
HETATM    1 ZN   ZN  C   1       2.000   2.000   2.000  1.00  0.00          ZN
END
";

    fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let protein = dir.join("1abc_protein.pdb");
        let ligand = dir.join("1abc_ligand.pdb");
        fs::write(&protein, PROTEIN_PDB).unwrap();
        fs::write(&ligand, LIGAND_PDB).unwrap();
        (protein, ligand)
    }

    #[test]
    fn run_produces_tensor_of_grid_shape() {
        let dir = tempdir().unwrap();
        let (protein, ligand) = write_inputs(dir.path());
        let grid = VoxelGrid::new(vec![Box::new(VolumeView)], 1.0, [8.0; 3], "vdw").unwrap();

        let voxels = run(&protein, &ligand, &grid, None, true).unwrap();
        assert_eq!(voxels.dim(), (3, 8, 8, 8));
        assert!(voxels.iter().any(|&v| v > 0.5));
    }

    #[test]
    fn pocket_cutoff_drops_distant_protein_atoms() {
        let dir = tempdir().unwrap();
        let (protein, ligand) = write_inputs(dir.path());

        let complex = assemble_complex(
            read_structure(&protein).unwrap(),
            read_structure(&ligand).unwrap(),
            Some(10.0),
        )
        .unwrap();
        assert_eq!(complex.n_atoms_protein(), 2);
        assert_eq!(complex.n_atoms_ligand(), 2);
    }

    #[test]
    fn non_positive_pocket_cutoff_is_rejected() {
        let err = assemble_complex(
            MolecularData::from_atoms([([0.0, 0.0, 0.0], "C")]),
            MolecularData::from_atoms([([1.0, 0.0, 0.0], "C")]),
            Some(0.0),
        )
        .unwrap_err();
        assert!(matches!(err, VoxelError::InvalidParameter(_)));
    }

    #[test]
    fn unsupported_input_format_surfaces_as_structure_error() {
        let dir = tempdir().unwrap();
        let (protein, _) = write_inputs(dir.path());
        let ligand = dir.path().join("ligand.sdf");
        fs::write(&ligand, "").unwrap();
        let grid = VoxelGrid::new(vec![Box::new(VolumeView)], 1.0, [8.0; 3], "vdw").unwrap();

        let err = run(&protein, &ligand, &grid, None, true).unwrap_err();
        assert!(matches!(err, VoxelError::Structure { .. }));
    }

    #[test]
    fn run_joins_cofactors_like_dataset_generation() {
        let dir = tempdir().unwrap();
        let (protein, ligand) = write_inputs(dir.path());
        let cofactors = dir.path().join(COFACTOR_DIR_NAME);
        fs::create_dir(&cofactors).unwrap();
        fs::write(cofactors.join("zn.pdb"), COFACTOR_PDB).unwrap();
        let grid = VoxelGrid::new(vec![Box::new(VolumeView)], 1.0, [8.0; 3], "vdw").unwrap();

        let joined = run(&protein, &ligand, &grid, None, true).unwrap();
        let plain = run(&protein, &ligand, &grid, None, false).unwrap();
        assert_ne!(joined, plain);

        let complex = assemble_complex(
            load_protein(&protein, true).unwrap(),
            read_structure(&ligand).unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(joined, grid.voxelize(&complex).unwrap());
    }

    #[test]
    fn load_protein_appends_cofactors_when_requested() {
        let dir = tempdir().unwrap();
        let (protein, _) = write_inputs(dir.path());
        let cofactors = dir.path().join(COFACTOR_DIR_NAME);
        fs::create_dir(&cofactors).unwrap();
        fs::write(cofactors.join("zn.pdb"), COFACTOR_PDB).unwrap();
        fs::write(cofactors.join("notes.txt"), "not a structure").unwrap();

        let plain = load_protein(&protein, false).unwrap();
        let joined = load_protein(&protein, true).unwrap();

        assert_eq!(plain.num_atoms(), 3);
        assert_eq!(joined.num_atoms(), 4);
        assert_eq!(joined.element_symbols[3], "ZN");
    }
}
