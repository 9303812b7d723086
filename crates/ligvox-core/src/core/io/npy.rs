use ndarray::Array4;
use ndarray_npy::{WriteNpyError, WriteNpyExt};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode .npy array: {0}")]
    Npy(#[from] WriteNpyError),
    #[error("Failed to serialize metadata: {0}")]
    Metadata(#[from] toml::ser::Error),
}

/// Writes a `(channels, x, y, z)` voxel tensor as a little-endian `float32` `.npy` file.
pub fn write_npy<P: AsRef<Path>>(path: P, voxels: &Array4<f32>) -> Result<(), ExportError> {
    let writer = BufWriter::new(File::create(path)?);
    voxels.write_npy(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_npy::read_npy;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn written_file_has_npy_magic_and_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("voxels.npy");
        let voxels = Array4::from_shape_fn((2, 3, 4, 5), |(c, x, y, z)| {
            (c * 60 + x * 20 + y * 5 + z) as f32 / 120.0
        });

        write_npy(&path, &voxels).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..6], b"\x93NUMPY");
        let header = String::from_utf8_lossy(&bytes[..128]);
        assert!(header.contains("<f4"));

        let loaded: Array4<f32> = read_npy(&path).unwrap();
        assert_eq!(loaded, voxels);
    }

    #[test]
    fn missing_parent_directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("voxels.npy");
        let err = write_npy(&path, &Array4::zeros((1, 1, 1, 1))).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
