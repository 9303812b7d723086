use nalgebra::{Matrix3xX, Vector3};

/// Indices of the atoms lying strictly within `cutoff` Angstroms of `center`, in
/// ascending order.
///
/// Used to crop a protein down to the residues surrounding a ligand before voxelization.
pub fn binding_pocket(coords: &Matrix3xX<f32>, center: &Vector3<f32>, cutoff: f32) -> Vec<usize> {
    coords
        .column_iter()
        .enumerate()
        .filter(|(_, pos)| (pos - center).norm() < cutoff)
        .map(|(i, _)| i)
        .collect()
}
