//! Block storage and terrain generation for the Cubeland voxel sandbox.

pub mod generation;
pub mod store;

pub use generation::{
    TerrainConfig, TerrainGenerator, TerrainStats, MAX_COLUMN_DEPTH, MAX_HALF_EXTENT,
};
pub use store::{BlockStore, VersionWatcher};
