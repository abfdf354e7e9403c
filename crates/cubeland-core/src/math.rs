//! Math utilities and helpers.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::BLOCK_HALF_EXTENT;
use crate::coords::BlockPos;

/// Ray for raycasting operations.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. Returns `None` for a zero-length direction.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Get a point along the ray at distance t
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-Aligned Bounding Box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box standing on `feet`: `half_width` either side on X and Z, `height` upward.
    #[inline]
    pub fn from_feet(feet: Vec3, half_width: f32, height: f32) -> Self {
        Self {
            min: Vec3::new(feet.x - half_width, feet.y, feet.z - half_width),
            max: Vec3::new(feet.x + half_width, feet.y + height, feet.z + half_width),
        }
    }

    /// The volume filled by the block at `pos`.
    #[inline]
    pub fn block(pos: BlockPos) -> Self {
        let center = pos.center();
        Self {
            min: center - Vec3::splat(BLOCK_HALF_EXTENT),
            max: center + Vec3::splat(BLOCK_HALF_EXTENT),
        }
    }

    /// Get the center of the AABB
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the AABB
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// The same box moved by `offset`.
    #[inline]
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// The same box grown by `margin` on the Y axis in both directions.
    #[inline]
    #[must_use]
    pub fn expanded_y(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec3::Y * margin,
            max: self.max + Vec3::Y * margin,
        }
    }

    /// Check if the interiors of two boxes overlap by more than `epsilon` on every axis.
    ///
    /// Boxes whose faces are within `epsilon` of each other are touching, not overlapping.
    #[inline]
    pub fn overlaps(&self, other: &Aabb, epsilon: f32) -> bool {
        self.min.x < other.max.x - epsilon
            && self.max.x > other.min.x + epsilon
            && self.min.y < other.max.y - epsilon
            && self.max.y > other.min.y + epsilon
            && self.min.z < other.max.z - epsilon
            && self.max.z > other.min.z + epsilon
    }
}
