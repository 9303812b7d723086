use super::StructureError;
use super::traits::StructureFile;
use crate::core::models::complex::MolecularData;
use std::io::BufRead;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Cannot determine element from columns 77-78 or atom name '{name}'")]
    MissingElement { name: String },
    #[error("Line is too short for ATOM/HETATM record (must reach column 54)")]
    LineTooShort,
}

const MIN_ATOM_LINE_LEN: usize = 54;

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coord(line: &str, start: usize, end: usize, line_num: usize) -> Result<f32, StructureError> {
    let raw = slice_and_trim(line, start, end);
    raw.parse::<f32>().map_err(|_| StructureError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: raw.to_string(),
        },
    })
}

/// Element symbol from columns 77-78, or from the element-justified part of the atom
/// name (columns 13-14) when that column is blank.
fn parse_element(line: &str, line_num: usize) -> Result<String, StructureError> {
    let element = slice_and_trim(line, 76, 78);
    if !element.is_empty() {
        return Ok(element.to_string());
    }

    let from_name: String = line
        .get(12..14)
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    if from_name.is_empty() {
        return Err(StructureError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingElement {
                name: slice_and_trim(line, 12, 16).to_string(),
            },
        });
    }
    Ok(from_name)
}

/// Reader for the fixed-column Protein Data Bank format.
///
/// Only coordinates and element symbols are extracted. `ATOM` records come first, followed
/// by `HETATM` records, each in file order. Reading stops at the first `END` or `ENDMDL`,
/// so only the first model of a multi-model file is used.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = StructureError;

    fn read_from(reader: &mut impl BufRead) -> Result<MolecularData, Self::Error> {
        let mut atoms: Vec<([f32; 3], String)> = Vec::new();
        let mut hetatms: Vec<([f32; 3], String)> = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            let target = match record_type {
                "ATOM" => &mut atoms,
                "HETATM" => &mut hetatms,
                "END" | "ENDMDL" => break,
                _ => continue,
            };

            if line.len() < MIN_ATOM_LINE_LEN {
                return Err(StructureError::Parse {
                    line: line_num,
                    kind: PdbParseErrorKind::LineTooShort,
                });
            }

            let position = [
                parse_coord(&line, 30, 38, line_num)?,
                parse_coord(&line, 38, 46, line_num)?,
                parse_coord(&line, 46, 54, line_num)?,
            ];
            target.push((position, parse_element(&line, line_num)?));
        }

        if atoms.is_empty() && hetatms.is_empty() {
            return Err(StructureError::MissingRecord("ATOM/HETATM".to_string()));
        }

        Ok(MolecularData::from_atoms(atoms.into_iter().chain(hetatms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TOLERANCE: f32 = 1e-4;

    fn read(content: &str) -> Result<MolecularData, StructureError> {
        PdbFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn hetatm_records_follow_atom_records() {
        let content = "\
HEADER    TEST
HETATM    1  O   HOH A 101       1.000   2.000   3.000  1.00  0.00           O
ATOM      2  N   ALA A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      3  CA  ALA A   1      11.639   6.071  -5.147  1.00  0.00           C
TER
HETATM    4 FE   HEM A 200      -1.500   0.250  10.000  1.00  0.00          FE
END
";
        let mol = read(content).unwrap();

        assert_eq!(mol.element_symbols, vec!["N", "C", "O", "FE"]);
        assert!((mol.coords[(0, 0)] - 11.104).abs() < TOLERANCE);
        assert!((mol.coords[(2, 1)] + 5.147).abs() < TOLERANCE);
        assert!((mol.coords[(1, 2)] - 2.0).abs() < TOLERANCE);
        assert!((mol.coords[(0, 3)] + 1.5).abs() < TOLERANCE);
    }

    #[test]
    fn blank_element_column_falls_back_to_atom_name() {
        let content = "\
ATOM      1  CA  ALA A   1      11.639   6.071  -5.147  1.00  0.00
ATOM      2 1HB  ALA A   1      12.000   6.000  -5.000
ATOM      3 CL1  LIG B   1       0.000   0.000   0.000  1.00  0.00
";
        let mol = read(content).unwrap();
        assert_eq!(mol.element_symbols, vec!["C", "H", "CL"]);
    }

    #[test]
    fn reading_stops_at_first_model_end() {
        let content = "\
MODEL        1
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ENDMDL
MODEL        2
ATOM      1  N   ALA A   1       5.000   5.000   5.000  1.00  0.00           N
ENDMDL
";
        let mol = read(content).unwrap();
        assert_eq!(mol.num_atoms(), 1);
        assert_eq!(mol.coords[(0, 0)], 0.0);
    }

    #[test]
    fn file_without_atoms_is_missing_record() {
        let err = read("HEADER    EMPTY\nEND\n").unwrap_err();
        assert!(matches!(err, StructureError::MissingRecord(_)));
    }

    #[test]
    fn malformed_coordinate_reports_line_and_columns() {
        let content = "\
REMARK   1
ATOM      1  N   ALA A   1      11.104   abcde  -6.504  1.00  0.00           N
";
        let err = read(content).unwrap_err();
        match err {
            StructureError::Parse { line, kind } => {
                assert_eq!(line, 2);
                assert_eq!(
                    kind,
                    PdbParseErrorKind::InvalidFloat {
                        columns: "39-46".to_string(),
                        value: "abcde".to_string(),
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn truncated_atom_line_is_rejected() {
        let err = read("ATOM      1  N   ALA A   1      11.104\n").unwrap_err();
        assert!(matches!(
            err,
            StructureError::Parse {
                line: 1,
                kind: PdbParseErrorKind::LineTooShort
            }
        ));
    }
}
