//! Overlap queries between a continuous box and the block grid.
//!
//! A query only visits the cells its box can touch, so its cost depends on
//! the box volume and never on how many blocks the store holds.

use std::ops::RangeInclusive;

use cubeland_core::constants::COLLISION_EPSILON;
use cubeland_core::{Aabb, BlockPos};
use cubeland_world::BlockStore;

/// Integer cells whose `[c - 0.5, c + 0.5]` span overlaps `[min, max]` by more than the epsilon.
///
/// The same epsilon shrinks both ends, so a face lying exactly on a cell
/// boundary excludes that cell from either direction.
#[inline]
pub fn cell_range(min: f32, max: f32) -> RangeInclusive<i32> {
    let lo = (min + 0.5 + COLLISION_EPSILON).floor() as i32;
    let hi = (max - 0.5 - COLLISION_EPSILON).ceil() as i32;
    lo..=hi
}

/// Returns `true` if `aabb` overlaps any solid block.
pub fn overlaps(aabb: &Aabb, store: &BlockStore) -> bool {
    let ys = cell_range(aabb.min.y, aabb.max.y);
    let xs = cell_range(aabb.min.x, aabb.max.x);
    let zs = cell_range(aabb.min.z, aabb.max.z);

    for y in ys {
        for x in xs.clone() {
            for z in zs.clone() {
                if hits(aabb, store, BlockPos::new(x, y, z)) {
                    return true;
                }
            }
        }
    }
    false
}

/// The overlapping solid block with the greatest Y, if any.
pub fn highest_overlap(aabb: &Aabb, store: &BlockStore) -> Option<BlockPos> {
    let xs = cell_range(aabb.min.x, aabb.max.x);
    let zs = cell_range(aabb.min.z, aabb.max.z);

    for y in cell_range(aabb.min.y, aabb.max.y).rev() {
        for x in xs.clone() {
            for z in zs.clone() {
                let pos = BlockPos::new(x, y, z);
                if hits(aabb, store, pos) {
                    return Some(pos);
                }
            }
        }
    }
    None
}

#[inline]
fn hits(aabb: &Aabb, store: &BlockStore, pos: BlockPos) -> bool {
    store.is_solid(pos) && aabb.overlaps(&Aabb::block(pos), COLLISION_EPSILON)
}
