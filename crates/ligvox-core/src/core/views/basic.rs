use super::View;
use crate::core::models::complex::MolecularComplex;
use ndarray::{Array2, s};

const ELEMENT_CLASSES: [&str; 6] = ["carbon", "hydrogen", "oxygen", "nitrogen", "sulfur", "other"];
const CLASSIFIED_SYMBOLS: [&str; 5] = ["C", "H", "O", "N", "S"];
const OTHER_CLASS: usize = 5;
const GROUPS: [&str; 3] = ["complex", "protein", "ligand"];

/// Element-class channels: carbon, hydrogen, oxygen, nitrogen, sulfur and "other" for
/// each of the complex, protein and ligand groups (18 channels in total).
///
/// Every atom belongs to exactly one class within a group. The protein and ligand groups
/// reuse the complex-wide classification and clear the columns of the other group.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicView;

impl BasicView {
    fn classify(symbol: &str) -> usize {
        let symbol = symbol.trim();
        CLASSIFIED_SYMBOLS
            .iter()
            .position(|canonical| symbol.eq_ignore_ascii_case(canonical))
            .unwrap_or(OTHER_CLASS)
    }
}

impl View for BasicView {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn num_channels(&self) -> usize {
        ELEMENT_CLASSES.len() * GROUPS.len()
    }

    fn channel_names(&self) -> Vec<String> {
        GROUPS
            .iter()
            .flat_map(|group| {
                ELEMENT_CLASSES
                    .iter()
                    .map(move |class| format!("{}_{}", class, group))
            })
            .collect()
    }

    fn complex_channels(&self, complex: &MolecularComplex) -> Option<Array2<bool>> {
        let mut chs = Array2::from_elem((ELEMENT_CLASSES.len(), complex.n_atoms()), false);
        for (atom, symbol) in complex.element_symbols().iter().enumerate() {
            chs[[Self::classify(symbol), atom]] = true;
        }
        Some(chs)
    }

    fn protein_channels(&self, complex: &MolecularComplex) -> Option<Array2<bool>> {
        let mut chs = self.complex_channels(complex)?;
        chs.slice_mut(s![.., complex.ligand_range()]).fill(false);
        Some(chs)
    }

    fn ligand_channels(&self, complex: &MolecularComplex) -> Option<Array2<bool>> {
        let mut chs = self.complex_channels(complex)?;
        chs.slice_mut(s![.., complex.protein_range()]).fill(false);
        Some(chs)
    }
}
