//! Grid coordinates and the packed spatial key codec.

use crate::constants::{KEY_AXIS_BITS, MAX_COORD, MIN_COORD};
use crate::error::{Error, Result};
use bytemuck::{Pod, Zeroable};
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

const AXIS_MASK: u64 = (1 << KEY_AXIS_BITS) - 1;
const AXIS_OFFSET: i64 = 1 << (KEY_AXIS_BITS - 1);
const USED_BITS: u32 = KEY_AXIS_BITS * 3;

/// Integer grid coordinate of a block.
///
/// The block at `(x, y, z)` fills `[x-0.5, x+0.5] × [y-0.5, y+0.5] × [z-0.5, z+0.5]`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    /// The origin cell.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Create a new block position
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell whose volume contains a continuous world point.
    #[inline]
    pub fn containing(point: Vec3) -> Self {
        Self::new(
            (point.x + 0.5).floor() as i32,
            (point.y + 0.5).floor() as i32,
            (point.z + 0.5).floor() as i32,
        )
    }

    /// Center of the block in world space.
    #[inline]
    pub fn center(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// Y coordinate of the block's top face.
    #[inline]
    pub fn top(self) -> f32 {
        self.y as f32 + 0.5
    }

    /// Position shifted by the given offset.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Returns `true` if every axis fits in a packed key.
    #[inline]
    pub const fn in_key_range(self) -> bool {
        self.x >= MIN_COORD
            && self.x <= MAX_COORD
            && self.y >= MIN_COORD
            && self.y <= MAX_COORD
            && self.z >= MIN_COORD
            && self.z <= MAX_COORD
    }
}

impl From<IVec3> for BlockPos {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Packed store key for a [`BlockPos`].
///
/// Each axis is biased into an unsigned 21-bit field: x in bits 0..21, y in
/// 21..42, z in 42..63. Bit 63 is always clear in a valid key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockKey(u64);

impl BlockKey {
    /// Pack a position. Fails if any axis is outside `MIN_COORD..=MAX_COORD`.
    #[inline]
    pub fn encode(pos: BlockPos) -> Result<Self> {
        if !pos.in_key_range() {
            return Err(Error::OutOfBounds(format!(
                "block position ({}, {}, {}) exceeds key range {MIN_COORD}..={MAX_COORD}",
                pos.x, pos.y, pos.z
            )));
        }
        let pack = |v: i32| (i64::from(v) + AXIS_OFFSET) as u64 & AXIS_MASK;
        Ok(Self(
            pack(pos.x) | (pack(pos.y) << KEY_AXIS_BITS) | (pack(pos.z) << (2 * KEY_AXIS_BITS)),
        ))
    }

    /// Unpack into a position.
    #[inline]
    pub fn decode(self) -> Result<BlockPos> {
        if self.0 >> USED_BITS != 0 {
            return Err(Error::InvalidData(format!(
                "block key {:#018x} has bits set above bit {}",
                self.0,
                USED_BITS - 1
            )));
        }
        let unpack = |shift: u32| (((self.0 >> shift) & AXIS_MASK) as i64 - AXIS_OFFSET) as i32;
        Ok(BlockPos::new(
            unpack(0),
            unpack(KEY_AXIS_BITS),
            unpack(2 * KEY_AXIS_BITS),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_roundtrip_near_origin() {
        for z in -8..8 {
            for y in -8..8 {
                for x in -8..8 {
                    let pos = BlockPos::new(x, y, z);
                    let key = BlockKey::encode(pos).unwrap();
                    assert_eq!(key.decode().unwrap(), pos);
                }
            }
        }
    }

    #[test]
    fn key_roundtrip_extremes() {
        let corners = [
            BlockPos::new(MIN_COORD, MIN_COORD, MIN_COORD),
            BlockPos::new(MAX_COORD, MAX_COORD, MAX_COORD),
            BlockPos::new(MIN_COORD, MAX_COORD, 0),
            BlockPos::new(-1, MAX_COORD, MIN_COORD),
        ];
        for pos in corners {
            assert_eq!(BlockKey::encode(pos).unwrap().decode().unwrap(), pos);
        }
    }

    #[test]
    fn distinct_positions_get_distinct_keys() {
        let a = BlockKey::encode(BlockPos::new(1, 0, 0)).unwrap();
        let b = BlockKey::encode(BlockPos::new(0, 1, 0)).unwrap();
        let c = BlockKey::encode(BlockPos::new(0, 0, 1)).unwrap();
        let d = BlockKey::encode(BlockPos::new(-1, 0, 0)).unwrap();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn out_of_range_position_rejected() {
        let err = BlockKey::encode(BlockPos::new(MAX_COORD + 1, 0, 0));
        assert!(matches!(err, Err(Error::OutOfBounds(_))));
        let err = BlockKey::encode(BlockPos::new(0, MIN_COORD - 1, 0));
        assert!(matches!(err, Err(Error::OutOfBounds(_))));
    }

    #[test]
    fn malformed_key_fails_decode() {
        let key = BlockKey(1 << 63);
        assert!(matches!(key.decode(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn containing_uses_centered_cells() {
        assert_eq!(BlockPos::containing(Vec3::ZERO), BlockPos::ZERO);
        assert_eq!(BlockPos::containing(Vec3::splat(0.49)), BlockPos::ZERO);
        assert_eq!(BlockPos::containing(Vec3::splat(0.5)), BlockPos::new(1, 1, 1));
        assert_eq!(
            BlockPos::containing(Vec3::new(-0.51, 2.2, -3.0)),
            BlockPos::new(-1, 2, -3)
        );
    }

    #[test]
    fn top_face() {
        assert!((BlockPos::new(0, 3, 0).top() - 3.5).abs() < f32::EPSILON);
        assert!((BlockPos::new(0, -2, 0).top() + 1.5).abs() < f32::EPSILON);
    }
}
