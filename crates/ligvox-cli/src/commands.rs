pub mod channels;
pub mod generate;
pub mod voxelize;
