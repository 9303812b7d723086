//! # Channel Views
//!
//! A view is a reusable rule set that turns atom chemistry and provenance into boolean
//! atom-to-channel membership masks. Each view defines up to three groups of channels:
//!
//! - **complex** channels consider every atom of the protein-ligand complex
//! - **protein** channels are false for every ligand atom
//! - **ligand** channels are false for every protein atom
//!
//! Masks have one row per channel and one column per atom, in the complex's fixed atom
//! order (protein atoms first, then ligand atoms). Views know nothing about geometry, so
//! new chemical channel sets can be added without touching the occupancy kernel.

pub mod basic;
pub mod composer;
pub mod volume;

pub use basic::BasicView;
pub use composer::ViewComposer;
pub use volume::VolumeView;

use crate::core::models::complex::MolecularComplex;
use ndarray::{Array2, s};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error(
        "View '{view}' produced a {found_rows}x{found_cols} mask, expected {expected_rows}x{expected_cols}"
    )]
    ShapeMismatch {
        view: &'static str,
        expected_rows: usize,
        expected_cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    #[error("Unknown view '{0}'. Expected one of: volume, basic")]
    UnknownView(String),
}

/// Defines a set of voxel channels in terms of atom membership.
pub trait View: Send + Sync {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Total number of channels across the complex, protein and ligand groups.
    fn num_channels(&self) -> usize;

    /// Channel names in the order `apply` emits rows: complex, then protein, then ligand.
    fn channel_names(&self) -> Vec<String>;

    /// Channels over all atoms of the complex, or `None` if the view defines none.
    fn complex_channels(&self, complex: &MolecularComplex) -> Option<Array2<bool>>;

    /// Channels restricted to protein atoms, or `None` if the view defines none.
    fn protein_channels(&self, complex: &MolecularComplex) -> Option<Array2<bool>>;

    /// Channels restricted to ligand atoms, or `None` if the view defines none.
    fn ligand_channels(&self, complex: &MolecularComplex) -> Option<Array2<bool>>;

    /// Stacks the complex, protein and ligand channels into one
    /// `(num_channels, n_atoms)` mask.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::ShapeMismatch`] if a group has the wrong number of columns or
    /// the stacked rows disagree with [`View::num_channels`].
    fn apply(&self, complex: &MolecularComplex) -> Result<Array2<bool>, ViewError> {
        let n_atoms = complex.n_atoms();
        let groups: Vec<Array2<bool>> = [
            self.complex_channels(complex),
            self.protein_channels(complex),
            self.ligand_channels(complex),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut found_rows = 0;
        for group in &groups {
            if group.ncols() != n_atoms {
                return Err(ViewError::ShapeMismatch {
                    view: self.name(),
                    expected_rows: self.num_channels(),
                    expected_cols: n_atoms,
                    found_rows: group.nrows(),
                    found_cols: group.ncols(),
                });
            }
            found_rows += group.nrows();
        }
        if found_rows != self.num_channels() {
            return Err(ViewError::ShapeMismatch {
                view: self.name(),
                expected_rows: self.num_channels(),
                expected_cols: n_atoms,
                found_rows,
                found_cols: n_atoms,
            });
        }

        Ok(stack_rows(&groups, n_atoms))
    }
}

/// Built-in views that can be referenced by name from configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Volume,
    Basic,
}

impl ViewKind {
    pub fn build(self) -> Box<dyn View> {
        match self {
            ViewKind::Volume => Box::new(VolumeView),
            ViewKind::Basic => Box::new(BasicView),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Volume => "volume",
            ViewKind::Basic => "basic",
        }
    }
}

impl FromStr for ViewKind {
    type Err = ViewError;

    /// Accepts the short names (`volume`, `basic`) and the class-style names
    /// (`VolumeView`, `BasicView`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "volume" | "volumeview" => Ok(ViewKind::Volume),
            "basic" | "basicview" => Ok(ViewKind::Basic),
            _ => Err(ViewError::UnknownView(s.to_string())),
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concatenates boolean blocks along the channel axis. Every block must have `n_atoms`
/// columns.
pub(crate) fn stack_rows(blocks: &[Array2<bool>], n_atoms: usize) -> Array2<bool> {
    let total_rows = blocks.iter().map(Array2::nrows).sum();
    let mut stacked = Array2::from_elem((total_rows, n_atoms), false);

    let mut row = 0;
    for block in blocks {
        let rows = block.nrows();
        stacked.slice_mut(s![row..row + rows, ..]).assign(block);
        row += rows;
    }
    stacked
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::models::complex::{MolecularComplex, MolecularData};

    /// Four protein atoms (N, C, O, S) followed by three ligand atoms (C, H, Cl).
    pub fn small_complex() -> MolecularComplex {
        let protein = MolecularData::from_atoms([
            ([0.0, 0.0, 0.0], "N"),
            ([1.4, 0.0, 0.0], "C"),
            ([2.0, 1.1, 0.0], "o"),
            ([3.0, -1.0, 0.5], "S"),
        ]);
        let ligand = MolecularData::from_atoms([
            ([5.0, 0.0, 0.0], "C"),
            ([5.5, 0.9, 0.0], "H"),
            ([6.5, -0.5, 0.2], "Cl"),
        ]);
        MolecularComplex::new(protein, ligand).expect("valid test complex")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::small_complex;
    use super::*;

    struct BrokenView;

    impl View for BrokenView {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn num_channels(&self) -> usize {
            2
        }
        fn channel_names(&self) -> Vec<String> {
            vec!["a".into(), "b".into()]
        }
        fn complex_channels(&self, complex: &MolecularComplex) -> Option<Array2<bool>> {
            Some(Array2::from_elem((1, complex.n_atoms()), true))
        }
        fn protein_channels(&self, _complex: &MolecularComplex) -> Option<Array2<bool>> {
            None
        }
        fn ligand_channels(&self, _complex: &MolecularComplex) -> Option<Array2<bool>> {
            None
        }
    }

    struct LigandOnlyView;

    impl View for LigandOnlyView {
        fn name(&self) -> &'static str {
            "ligand_only"
        }
        fn num_channels(&self) -> usize {
            1
        }
        fn channel_names(&self) -> Vec<String> {
            vec!["ligand_any".into()]
        }
        fn complex_channels(&self, _complex: &MolecularComplex) -> Option<Array2<bool>> {
            None
        }
        fn protein_channels(&self, _complex: &MolecularComplex) -> Option<Array2<bool>> {
            None
        }
        fn ligand_channels(&self, complex: &MolecularComplex) -> Option<Array2<bool>> {
            let mut mask = Array2::from_elem((1, complex.n_atoms()), false);
            mask.slice_mut(s![.., complex.ligand_range()]).fill(true);
            Some(mask)
        }
    }

    #[test]
    fn apply_substitutes_empty_blocks_for_undefined_groups() {
        let complex = small_complex();
        let mask = LigandOnlyView.apply(&complex).unwrap();
        assert_eq!(mask.dim(), (1, 7));
        assert!(!mask[[0, 3]]);
        assert!(mask[[0, 4]]);
    }

    #[test]
    fn apply_rejects_row_count_disagreeing_with_num_channels() {
        let complex = small_complex();
        let err = BrokenView.apply(&complex).unwrap_err();
        assert_eq!(
            err,
            ViewError::ShapeMismatch {
                view: "broken",
                expected_rows: 2,
                expected_cols: 7,
                found_rows: 1,
                found_cols: 7,
            }
        );
    }

    #[test]
    fn view_kind_parses_short_and_class_style_names() {
        assert_eq!("volume".parse::<ViewKind>(), Ok(ViewKind::Volume));
        assert_eq!("VolumeView".parse::<ViewKind>(), Ok(ViewKind::Volume));
        assert_eq!(" Basic ".parse::<ViewKind>(), Ok(ViewKind::Basic));
        assert_eq!("BasicView".parse::<ViewKind>(), Ok(ViewKind::Basic));
        assert!(matches!(
            "hydrophobic".parse::<ViewKind>(),
            Err(ViewError::UnknownView(_))
        ));
    }

    #[test]
    fn view_kind_builds_matching_view() {
        assert_eq!(ViewKind::Volume.build().num_channels(), 3);
        assert_eq!(ViewKind::Basic.build().num_channels(), 18);
    }

    #[test]
    fn stack_rows_with_no_blocks_yields_zero_rows() {
        let stacked = stack_rows(&[], 5);
        assert_eq!(stacked.dim(), (0, 5));
    }
}
