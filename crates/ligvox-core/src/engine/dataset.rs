#[cfg(feature = "parallel")]
use super::config::Backend;
use super::error::VoxelError;
use super::progress::{Progress, ProgressReporter};
use super::voxel_grid::VoxelGrid;
use crate::core::io::read_structure;
use crate::core::models::complex::{MolecularComplex, MolecularData};
use crate::core::transforms::RandomRotation;
use ndarray::Array4;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Where the protein and ligand of one complex come from.
#[derive(Debug, Clone)]
pub enum ComplexSource {
    /// Structure files parsed on every access, resolved against the dataset root.
    Files { protein: PathBuf, ligand: PathBuf },
    /// Structures parsed ahead of time.
    Parsed {
        protein: MolecularData,
        ligand: MolecularData,
    },
}

impl ComplexSource {
    pub fn files(protein: impl Into<PathBuf>, ligand: impl Into<PathBuf>) -> Self {
        ComplexSource::Files {
            protein: protein.into(),
            ligand: ligand.into(),
        }
    }

    pub fn parsed(protein: MolecularData, ligand: MolecularData) -> Self {
        ComplexSource::Parsed { protein, ligand }
    }

    fn load(&self, root: &Path) -> Result<MolecularComplex, VoxelError> {
        match self {
            ComplexSource::Files { protein, ligand } => {
                let protein = read_structure(root.join(protein))?;
                let ligand = read_structure(root.join(ligand))?;
                Ok(MolecularComplex::new(protein, ligand)?)
            }
            ComplexSource::Parsed { protein, ligand } => {
                Ok(MolecularComplex::new(protein.clone(), ligand.clone())?)
            }
        }
    }
}

/// A labeled collection of complexes voxelized on demand.
///
/// Each access builds a fresh complex from its source, optionally applies a random
/// rotation, and voxelizes it with the shared grid. Sources are never mutated, so
/// repeated accesses with rotation enabled see independent orientations.
#[derive(Debug)]
pub struct VoxelDataset<'g> {
    sources: Vec<ComplexSource>,
    labels: Vec<f32>,
    grid: &'g VoxelGrid,
    rotation: Option<RandomRotation>,
    root_dir: PathBuf,
}

impl<'g> VoxelDataset<'g> {
    /// # Errors
    ///
    /// Returns [`VoxelError::InvalidParameter`] if `sources` and `labels` differ in length.
    pub fn new(
        sources: Vec<ComplexSource>,
        labels: Vec<f32>,
        grid: &'g VoxelGrid,
    ) -> Result<Self, VoxelError> {
        if sources.len() != labels.len() {
            return Err(VoxelError::InvalidParameter(format!(
                "{} complexes but {} labels",
                sources.len(),
                labels.len()
            )));
        }
        Ok(Self {
            sources,
            labels,
            grid,
            rotation: None,
            root_dir: PathBuf::new(),
        })
    }

    /// Rotates every complex by a fresh random rotation before voxelization.
    pub fn with_rotation(mut self, rotation: RandomRotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Directory that relative file sources are resolved against.
    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[f32] {
        &self.labels
    }

    pub fn grid(&self) -> &VoxelGrid {
        self.grid
    }

    /// Loads the complex at `idx` and applies the random rotation, if any.
    pub fn complex(&self, idx: usize) -> Result<MolecularComplex, VoxelError> {
        let source = self.sources.get(idx).ok_or_else(|| {
            VoxelError::InvalidParameter(format!(
                "index {} out of range for dataset of {} complexes",
                idx,
                self.len()
            ))
        })?;
        let mut complex = source.load(&self.root_dir)?;
        if let Some(rotation) = &self.rotation {
            rotation.apply_to(&mut complex);
        }
        Ok(complex)
    }

    /// The voxel tensor and label of the complex at `idx`.
    pub fn get(&self, idx: usize) -> Result<(Array4<f32>, f32), VoxelError> {
        let complex = self.complex(idx)?;
        let voxels = self.grid.voxelize(&complex)?;
        Ok((voxels, self.labels[idx]))
    }

    /// Voxelizes every complex, returning results in dataset order.
    ///
    /// A failure for one complex does not stop the others.
    #[instrument(skip_all, name = "dataset_voxelize_all", fields(complexes = self.len()))]
    pub fn voxelize_all(
        &self,
        reporter: &ProgressReporter,
    ) -> Vec<Result<(Array4<f32>, f32), VoxelError>> {
        info!("Voxelizing {} complexes.", self.len());
        reporter.report(Progress::TaskStart {
            total_steps: self.len() as u64,
        });

        let run = |idx: usize| {
            let result = self.get(idx);
            reporter.report(Progress::TaskIncrement);
            result
        };

        #[cfg(feature = "parallel")]
        let results: Vec<_> = match self.grid.compute().backend {
            Backend::Parallel => (0..self.len()).into_par_iter().map(run).collect(),
            Backend::Serial => (0..self.len()).map(run).collect(),
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = (0..self.len()).map(run).collect();

        reporter.report(Progress::TaskFinish);
        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(failed, "Dataset voxelization complete.");
        results
    }
}
