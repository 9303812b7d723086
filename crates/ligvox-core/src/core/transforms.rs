use crate::core::models::complex::MolecularComplex;
use nalgebra::{Matrix3, Matrix3xX, Quaternion, UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use std::sync::Mutex;

/// Rigid rotation of a structure about the origin by a matrix drawn uniformly from SO(3).
///
/// Coordinates and the ligand center are rotated together, so the ligand stays at the
/// center of the voxel box while the box orientation relative to the complex changes.
/// The generator sits behind a mutex so one instance can be shared by parallel workers.
#[derive(Debug)]
pub struct RandomRotation {
    rng: Mutex<StdRng>,
}

impl RandomRotation {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible rotations: the same seed yields the same sequence of matrices.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draws a uniformly distributed rotation matrix (Shoemake's subgroup algorithm).
    pub fn sample_matrix(&self) -> Matrix3<f32> {
        let (u1, u2, u3): (f64, f64, f64) = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            (rng.r#gen(), rng.r#gen(), rng.r#gen())
        };

        let a = (1.0 - u1).sqrt();
        let b = u1.sqrt();
        let q = Quaternion::new(
            b * (TAU * u3).cos(),
            a * (TAU * u2).sin(),
            a * (TAU * u2).cos(),
            b * (TAU * u3).sin(),
        );
        UnitQuaternion::from_quaternion(q)
            .to_rotation_matrix()
            .into_inner()
            .cast::<f32>()
    }

    /// Returns rotated copies of `coords` and `center`; the inputs are left untouched.
    pub fn rotate(
        &self,
        coords: &Matrix3xX<f32>,
        center: &Vector3<f32>,
    ) -> (Matrix3xX<f32>, Vector3<f32>) {
        let matrix = self.sample_matrix();
        (matrix * coords, matrix * center)
    }

    /// Rotates `coords` and `center` in place with a single freshly drawn matrix.
    pub fn rotate_in_place(&self, coords: &mut Matrix3xX<f32>, center: &mut Vector3<f32>) {
        let matrix = self.sample_matrix();
        *coords = matrix * &*coords;
        *center = matrix * *center;
    }

    /// Rotates the coordinates and ligand center of `complex` in place.
    pub fn apply_to(&self, complex: &mut MolecularComplex) {
        let (coords, center) = complex.coords_and_center_mut();
        self.rotate_in_place(coords, center);
    }
}

impl Default for RandomRotation {
    fn default() -> Self {
        Self::new()
    }
}
