//! Error types for the sandbox.

use thiserror::Error;

/// Engine-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid data error, e.g. a corrupted spatial key
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Out of bounds access
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The player body could not be pushed clear of solid geometry.
    #[error("Player embedded in geometry at y={y} after {steps} upward steps")]
    Embedded {
        /// Feet elevation when resolution gave up.
        y: f32,
        /// Number of one-block displacements attempted.
        steps: u32,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
