use super::View;
use crate::core::models::complex::MolecularComplex;
use ndarray::{Array2, s};

/// One channel per group holding every atom in scope: the whole complex, the protein
/// only, and the ligand only.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeView;

impl View for VolumeView {
    fn name(&self) -> &'static str {
        "volume"
    }

    fn num_channels(&self) -> usize {
        3
    }

    fn channel_names(&self) -> Vec<String> {
        vec![
            "complex_volume".to_string(),
            "protein_volume".to_string(),
            "ligand_volume".to_string(),
        ]
    }

    fn complex_channels(&self, complex: &MolecularComplex) -> Option<Array2<bool>> {
        Some(Array2::from_elem((1, complex.n_atoms()), true))
    }

    fn protein_channels(&self, complex: &MolecularComplex) -> Option<Array2<bool>> {
        let mut vol = Array2::from_elem((1, complex.n_atoms()), false);
        vol.slice_mut(s![.., complex.protein_range()]).fill(true);
        Some(vol)
    }

    fn ligand_channels(&self, complex: &MolecularComplex) -> Option<Array2<bool>> {
        let mut vol = Array2::from_elem((1, complex.n_atoms()), false);
        vol.slice_mut(s![.., complex.ligand_range()]).fill(true);
        Some(vol)
    }
}
