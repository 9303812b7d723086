//! Reading structure files and exporting voxel tensors.
//!
//! Structure formats implement [`traits::StructureFile`]; [`read_structure`] picks the
//! reader from the file extension. Voxel tensors are exported as NumPy `.npy` arrays.

pub mod npy;
pub mod pdb;
pub mod traits;

use crate::core::models::complex::MolecularData;
use pdb::{PdbFile, PdbParseErrorKind};
use std::io;
use std::path::Path;
use thiserror::Error;
use traits::StructureFile;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Unsupported structure format '{0}'. Supported: pdb")]
    UnsupportedFormat(String),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

/// Reads a structure file, choosing the parser from its extension.
///
/// # Errors
///
/// Returns [`StructureError::UnsupportedFormat`] for anything other than `.pdb`, or the
/// parser's error if the file cannot be read.
pub fn read_structure<P: AsRef<Path>>(path: P) -> Result<MolecularData, StructureError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdb" => PdbFile::read_from_path(path),
        _ => Err(StructureError::UnsupportedFormat(ext)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const ONE_ATOM: &str =
        "ATOM      1  N   ALA A   1      11.104   6.134  -6.504  1.00  0.00           N\nEND\n";

    #[test]
    fn read_structure_dispatches_on_pdb_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("protein.PDB");
        fs::write(&path, ONE_ATOM).unwrap();

        let mol = read_structure(&path).unwrap();
        assert_eq!(mol.num_atoms(), 1);
        assert_eq!(mol.element_symbols, vec!["N"]);
    }

    #[test]
    fn read_structure_rejects_unknown_extensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ligand.mol2");
        fs::write(&path, ONE_ATOM).unwrap();

        let err = read_structure(&path).unwrap_err();
        assert!(matches!(err, StructureError::UnsupportedFormat(ext) if ext == "mol2"));
    }

    #[test]
    fn read_structure_reports_missing_files_as_io_errors() {
        let dir = tempdir().unwrap();
        let err = read_structure(dir.path().join("absent.pdb")).unwrap_err();
        assert!(matches!(err, StructureError::Io(_)));
    }
}
