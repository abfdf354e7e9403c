//! Core types, math, and traits for the Cubeland voxel sandbox.
//!
//! This crate provides the foundational types used throughout the sandbox:
//! - Block kinds and their collision/render attributes
//! - Grid coordinates and the packed spatial key codec
//! - Axis-aligned boxes and rays
//! - Gameplay events and the engine-wide error type

pub mod coords;
pub mod error;
pub mod events;
pub mod math;
pub mod types;

pub use coords::{BlockKey, BlockPos};
pub use error::{Error, Result};
pub use events::{EventQueue, GameEvent};
pub use math::{Aabb, Ray};
pub use types::BlockKind;

/// Engine-wide constants
pub mod constants {
    /// Bits used per axis in a packed [`BlockKey`](crate::BlockKey).
    pub const KEY_AXIS_BITS: u32 = 21;
    /// Smallest coordinate representable on any axis.
    pub const MIN_COORD: i32 = -(1 << (KEY_AXIS_BITS - 1));
    /// Largest coordinate representable on any axis.
    pub const MAX_COORD: i32 = (1 << (KEY_AXIS_BITS - 1)) - 1;
    /// Half the edge length of a block. Blocks are centered on integer coordinates.
    pub const BLOCK_HALF_EXTENT: f32 = 0.5;
    /// Tolerance under which two touching faces are not considered overlapping.
    pub const COLLISION_EPSILON: f32 = 1e-4;
}
