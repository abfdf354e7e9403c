//! Voxel collision and player physics for the Cubeland voxel sandbox.
//!
//! - [`collision`]: AABB-vs-grid overlap queries bounded by the query volume
//! - [`player`]: the player body, its grounded/airborne state and sub-stepped movement
//! - [`raycast`]: picking the block under the crosshair

pub mod collision;
pub mod config;
pub mod player;
pub mod raycast;

pub use collision::{cell_range, highest_overlap, overlaps};
pub use config::PhysicsConfig;
pub use player::{Locomotion, MotionState, PlayerBody};
pub use raycast::{raycast, RaycastHit};
