//! Test harness for the Cubeland voxel sandbox.
//!
//! Provides [`Scenario`], a session driven frame by frame that checks the
//! player never ends a frame inside a block.

pub mod scenario;

pub use scenario::{flat_floor, Scenario};

use glam::Vec3;
use thiserror::Error;

/// Test error type
#[derive(Error, Debug)]
pub enum TestError {
    /// The session itself failed.
    #[error("Engine error: {0}")]
    Engine(#[from] cubeland_core::Error),
    /// A frame ended with the player inside a block.
    #[error("Player overlaps a block after frame {frame} at {position:?}")]
    Overlap { frame: u64, position: Vec3 },
}

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, TestError>;
