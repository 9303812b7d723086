use crate::core::models::complex::MolecularData;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading molecular structure file formats.
///
/// Implementors only need to parse a buffered reader; opening files is provided.
pub trait StructureFile {
    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error>;

    /// Reads atom coordinates and element symbols from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader encounters an I/O issue.
    fn read_from(reader: &mut impl BufRead) -> Result<MolecularData, Self::Error>;

    /// Reads a structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<MolecularData, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
