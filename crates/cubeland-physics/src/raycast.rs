//! Block picking by grid traversal.

use cubeland_core::{BlockPos, Ray};
use cubeland_world::BlockStore;
use glam::{IVec3, Vec3};

/// Result of a raycast against blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Point where the ray enters the block.
    pub position: Vec3,
    /// Outward normal of the face that was entered. Zero if the ray starts inside the block.
    pub normal: IVec3,
    /// Distance along the ray.
    pub distance: f32,
    /// The block that was hit.
    pub block_position: BlockPos,
}

impl RaycastHit {
    /// The empty cell in front of the hit face, where a new block would go.
    pub fn adjacent(&self) -> BlockPos {
        self.block_position.offset(self.normal.x, self.normal.y, self.normal.z)
    }
}

/// First solid block along `ray` within `reach`.
///
/// Visits every cell the ray passes through in order, so thin diagonal
/// gaps between blocks are never skipped.
pub fn raycast(store: &BlockStore, ray: &Ray, reach: f32) -> Option<RaycastHit> {
    let dir = ray.direction;
    if !(reach.is_finite() && reach >= 0.0) || !dir.is_finite() || dir == Vec3::ZERO {
        return None;
    }

    // Shift by half a block so cell boundaries land on integers.
    let origin = ray.origin + Vec3::splat(0.5);
    let start = BlockPos::containing(ray.origin);
    let mut cell = IVec3::new(start.x, start.y, start.z);

    let mut step = IVec3::ZERO;
    let mut t_delta = Vec3::splat(f32::INFINITY);
    let mut t_max = Vec3::splat(f32::INFINITY);
    for axis in 0..3 {
        let d = dir[axis];
        if d > 0.0 {
            step[axis] = 1;
            t_delta[axis] = 1.0 / d;
            t_max[axis] = (cell[axis] as f32 + 1.0 - origin[axis]) / d;
        } else if d < 0.0 {
            step[axis] = -1;
            t_delta[axis] = -1.0 / d;
            t_max[axis] = (cell[axis] as f32 - origin[axis]) / d;
        }
    }

    let mut normal = IVec3::ZERO;
    let mut t = 0.0;
    loop {
        let pos = BlockPos::from(cell);
        if store.is_solid(pos) {
            return Some(RaycastHit {
                position: ray.at(t),
                normal,
                distance: t,
                block_position: pos,
            });
        }

        let axis = if t_max.x < t_max.y {
            if t_max.x < t_max.z {
                0
            } else {
                2
            }
        } else if t_max.y < t_max.z {
            1
        } else {
            2
        };

        t = t_max[axis];
        if t > reach {
            return None;
        }
        cell[axis] += step[axis];
        t_max[axis] += t_delta[axis];
        normal = IVec3::ZERO;
        normal[axis] = -step[axis];
    }
}
