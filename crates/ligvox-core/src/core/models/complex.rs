use super::element::vdw_radius;
use nalgebra::{Matrix3xX, Vector3};
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComplexError {
    #[error("Unknown element symbol '{symbol}' for atom {index}")]
    UnknownElement { index: usize, symbol: String },

    #[error("Ligand contains no atoms; its center is undefined")]
    EmptyLigand,

    #[error("Coordinate count ({coords}) does not match element symbol count ({symbols})")]
    LengthMismatch { coords: usize, symbols: usize },
}

/// Atom coordinates and element symbols parsed from a single structure file.
#[derive(Debug, Clone, PartialEq)]
pub struct MolecularData {
    /// Atom positions in Angstroms, one column per atom.
    pub coords: Matrix3xX<f32>,
    /// Element symbols aligned with the columns of `coords`.
    pub element_symbols: Vec<String>,
}

impl Default for MolecularData {
    fn default() -> Self {
        Self {
            coords: Matrix3xX::zeros(0),
            element_symbols: Vec::new(),
        }
    }
}

impl MolecularData {
    pub fn new(coords: Matrix3xX<f32>, element_symbols: Vec<String>) -> Result<Self, ComplexError> {
        if coords.ncols() != element_symbols.len() {
            return Err(ComplexError::LengthMismatch {
                coords: coords.ncols(),
                symbols: element_symbols.len(),
            });
        }
        Ok(Self {
            coords,
            element_symbols,
        })
    }

    /// Builds molecular data from `(position, element)` pairs in order.
    pub fn from_atoms<I, S>(atoms: I) -> Self
    where
        I: IntoIterator<Item = ([f32; 3], S)>,
        S: Into<String>,
    {
        let (positions, element_symbols): (Vec<[f32; 3]>, Vec<String>) = atoms
            .into_iter()
            .map(|(pos, symbol)| (pos, symbol.into()))
            .unzip();
        let coords = Matrix3xX::from_fn(positions.len(), |row, col| positions[col][row]);
        Self {
            coords,
            element_symbols,
        }
    }

    pub fn num_atoms(&self) -> usize {
        self.element_symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.element_symbols.is_empty()
    }

    /// Mean atom position, or `None` if there are no atoms.
    pub fn centroid(&self) -> Option<Vector3<f32>> {
        if self.is_empty() {
            None
        } else {
            Some(self.coords.column_mean())
        }
    }

    /// Appends the atoms of each part in order, e.g. a protein followed by its cofactors.
    pub fn concat(parts: &[MolecularData]) -> Self {
        let total: usize = parts.iter().map(MolecularData::num_atoms).sum();
        let mut coords = Matrix3xX::zeros(total);
        let mut element_symbols = Vec::with_capacity(total);

        let mut offset = 0;
        for part in parts {
            let n = part.num_atoms();
            coords.columns_mut(offset, n).copy_from(&part.coords);
            element_symbols.extend(part.element_symbols.iter().cloned());
            offset += n;
        }

        Self {
            coords,
            element_symbols,
        }
    }

    /// Keeps only the atoms at `indices`, in the order given.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            coords: self.coords.select_columns(indices),
            element_symbols: indices
                .iter()
                .map(|&i| self.element_symbols[i].clone())
                .collect(),
        }
    }
}

/// A protein-ligand complex ready for voxelization.
///
/// Protein atoms occupy the first `n_atoms_protein` columns and ligand atoms the last
/// `n_atoms_ligand` columns. This ordering is fixed for the lifetime of the complex and
/// every channel mask indexes atoms by it.
#[derive(Debug, Clone, PartialEq)]
pub struct MolecularComplex {
    coords: Matrix3xX<f32>,
    element_symbols: Vec<String>,
    vdw_radii: Vec<f32>,
    ligand_center: Vector3<f32>,
    n_atoms_protein: usize,
    n_atoms_ligand: usize,
}

impl MolecularComplex {
    /// Combines protein and ligand data and resolves every atom's van der Waals radius.
    ///
    /// # Errors
    ///
    /// Returns [`ComplexError::EmptyLigand`] if the ligand has no atoms and
    /// [`ComplexError::UnknownElement`] if any element symbol has no known radius.
    pub fn new(protein: MolecularData, ligand: MolecularData) -> Result<Self, ComplexError> {
        let ligand_center = ligand.centroid().ok_or(ComplexError::EmptyLigand)?;
        let n_atoms_protein = protein.num_atoms();
        let n_atoms_ligand = ligand.num_atoms();

        let MolecularData {
            coords,
            element_symbols,
        } = MolecularData::concat(&[protein, ligand]);

        let vdw_radii = element_symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| {
                vdw_radius(symbol).map_err(|_| ComplexError::UnknownElement {
                    index,
                    symbol: symbol.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            coords,
            element_symbols,
            vdw_radii,
            ligand_center,
            n_atoms_protein,
            n_atoms_ligand,
        })
    }

    pub fn coords(&self) -> &Matrix3xX<f32> {
        &self.coords
    }

    pub fn element_symbols(&self) -> &[String] {
        &self.element_symbols
    }

    pub fn vdw_radii(&self) -> &[f32] {
        &self.vdw_radii
    }

    pub fn ligand_center(&self) -> &Vector3<f32> {
        &self.ligand_center
    }

    /// Mutable access to the coordinates and ligand center together, so that rigid
    /// transforms can keep both consistent.
    pub fn coords_and_center_mut(&mut self) -> (&mut Matrix3xX<f32>, &mut Vector3<f32>) {
        (&mut self.coords, &mut self.ligand_center)
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms_protein + self.n_atoms_ligand
    }

    pub fn n_atoms_protein(&self) -> usize {
        self.n_atoms_protein
    }

    pub fn n_atoms_ligand(&self) -> usize {
        self.n_atoms_ligand
    }

    /// Column range holding the protein atoms.
    pub fn protein_range(&self) -> Range<usize> {
        0..self.n_atoms_protein
    }

    /// Column range holding the ligand atoms.
    pub fn ligand_range(&self) -> Range<usize> {
        self.n_atoms_protein..self.n_atoms()
    }
}
