//! Procedural terrain generation.

use std::time::{Duration, Instant};

use cubeland_core::constants::{MAX_COORD, MIN_COORD};
use cubeland_core::{BlockKind, BlockPos, Error, Result};
use glam::IVec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::store::BlockStore;

/// Largest accepted footprint half-extent.
pub const MAX_HALF_EXTENT: i32 = 4096;

/// Largest accepted column depth, from `floor_y` to the highest surface.
pub const MAX_COLUMN_DEPTH: i64 = 1024;

/// Upper bound on the block capacity reserved up front by [`TerrainGenerator::generate`].
const MAX_PREALLOCATED_BLOCKS: usize = 1 << 22;

/// Terrain generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Footprint covers `-half_extent..=half_extent` on X and Z.
    pub half_extent: i32,
    /// Lowest filled Y coordinate.
    pub floor_y: i32,
    /// Surface height where all hill terms are zero.
    pub base_height: i32,
    /// Peak amplitude of the two primary hill waves.
    pub hill_amplitude: f64,
    /// Multiplier on every hill wave frequency. Larger values give tighter hills.
    pub hill_frequency: f64,
    /// Number of dirt blocks between the grass and the stone.
    pub dirt_depth: u32,
    /// Columns that get a tree trunk.
    pub tree_anchors: Vec<IVec2>,
    /// Wood blocks stacked per trunk.
    pub trunk_height: u32,
    /// Y coordinate where the ground scan for a trunk starts.
    pub tree_scan_top: i32,
    /// Ground height used when a trunk column has no blocks.
    pub fallback_ground_y: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            half_extent: 20,
            floor_y: -6,
            base_height: 2,
            hill_amplitude: 3.0,
            hill_frequency: 1.0,
            dirt_depth: 2,
            tree_anchors: vec![
                IVec2::new(8, 8),
                IVec2::new(-10, 5),
                IVec2::new(5, -12),
                IVec2::new(-7, -9),
                IVec2::new(14, -3),
            ],
            trunk_height: 4,
            tree_scan_top: 30,
            fallback_ground_y: 0,
        }
    }
}

impl TerrainConfig {
    /// Set the footprint half-extent.
    #[must_use]
    pub const fn with_half_extent(mut self, half_extent: i32) -> Self {
        self.half_extent = half_extent;
        self
    }

    /// Replace the tree anchor columns.
    #[must_use]
    pub fn with_tree_anchors(mut self, anchors: impl IntoIterator<Item = IVec2>) -> Self {
        self.tree_anchors = anchors.into_iter().collect();
        self
    }

    /// Set the hill amplitude. Zero produces flat ground at `base_height`.
    #[must_use]
    pub const fn with_hill_amplitude(mut self, amplitude: f64) -> Self {
        self.hill_amplitude = amplitude;
        self
    }

    /// Check that the parameters describe a world that can be generated.
    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_HALF_EXTENT).contains(&self.half_extent) {
            return Err(Error::Config(format!(
                "terrain half_extent must be within 0..={MAX_HALF_EXTENT}, got {}",
                self.half_extent
            )));
        }
        if !self.hill_amplitude.is_finite() || !self.hill_frequency.is_finite() {
            return Err(Error::Config("hill parameters must be finite".to_string()));
        }
        if self.tree_scan_top < self.floor_y {
            return Err(Error::Config(format!(
                "tree_scan_top {} is below floor_y {}",
                self.tree_scan_top, self.floor_y
            )));
        }

        let top = self.surface_ceiling();
        let depth = top.saturating_sub(i64::from(self.floor_y)).saturating_add(1);
        if depth > MAX_COLUMN_DEPTH {
            return Err(Error::Config(format!(
                "columns from floor_y {} up to y={top} exceed {MAX_COLUMN_DEPTH} blocks",
                self.floor_y
            )));
        }
        if i64::from(self.dirt_depth) > MAX_COLUMN_DEPTH
            || i64::from(self.trunk_height) > MAX_COLUMN_DEPTH
        {
            return Err(Error::Config(format!(
                "dirt_depth {} and trunk_height {} must not exceed {MAX_COLUMN_DEPTH}",
                self.dirt_depth, self.trunk_height
            )));
        }

        // Every generated block must have a key.
        let trunk = i64::from(self.trunk_height);
        let lowest = i64::from(self.floor_y);
        let highest = top
            .max(i64::from(self.tree_scan_top) + trunk)
            .max(i64::from(self.fallback_ground_y) + trunk);
        if lowest < i64::from(MIN_COORD) || highest > i64::from(MAX_COORD) {
            return Err(Error::Config(format!(
                "terrain spans y={lowest}..={highest}, outside {MIN_COORD}..={MAX_COORD}"
            )));
        }
        Ok(())
    }

    /// Highest surface the hill waves can reach.
    pub fn max_height(&self) -> i32 {
        self.base_height.saturating_add((2.5 * self.hill_amplitude.abs()).ceil() as i32)
    }

    fn surface_ceiling(&self) -> i64 {
        i64::from(self.base_height).saturating_add((2.5 * self.hill_amplitude.abs()).ceil() as i64)
    }
}

/// Summary of a generation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerrainStats {
    /// Columns in the footprint.
    pub columns: usize,
    /// Blocks written, trunks included.
    pub blocks: usize,
    /// Trunks planted.
    pub trees: usize,
    /// Trunks that found no ground and used the fallback height.
    pub fallback_trees: usize,
    /// Wall-clock generation time.
    pub elapsed: Duration,
}

/// Deterministic heightmap terrain built from a sum of sinusoids.
pub struct TerrainGenerator {
    config: TerrainConfig,
}

impl TerrainGenerator {
    /// Create a new terrain generator with the given configuration.
    pub const fn new(config: TerrainConfig) -> Self {
        Self { config }
    }

    /// Get the terrain configuration.
    pub const fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Surface Y coordinate of the column at `(x, z)`.
    ///
    /// Two primary waves along X and Z plus a half-amplitude diagonal wave, so
    /// the result stays within `base_height ± 2.5 * hill_amplitude`.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let f = self.config.hill_frequency;
        let a = self.config.hill_amplitude;
        let (x, z) = (f64::from(x), f64::from(z));

        let hills = a * (x * 0.21 * f).sin()
            + a * (z * 0.17 * f).cos()
            + 0.5 * a * ((x + z) * 0.11 * f).sin();
        self.config.base_height + hills.round() as i32
    }

    /// Block kind at `y` in a column whose surface is `surface`, or `None` above it.
    fn block_at_depth(&self, y: i32, surface: i32) -> Option<BlockKind> {
        if y > surface {
            None
        } else if y == surface {
            Some(BlockKind::Grass)
        } else if y >= surface - self.config.dirt_depth as i32 {
            Some(BlockKind::Dirt)
        } else {
            Some(BlockKind::Stone)
        }
    }

    /// All blocks of one column, bottom to top.
    pub fn column(&self, x: i32, z: i32) -> Vec<(BlockPos, BlockKind)> {
        let surface = self.height_at(x, z);
        (self.config.floor_y..=surface)
            .filter_map(|y| {
                self.block_at_depth(y, surface)
                    .map(|kind| (BlockPos::new(x, y, z), kind))
            })
            .collect()
    }

    /// Generate a fresh store holding the whole terrain.
    ///
    /// The configuration should have passed [`TerrainConfig::validate`].
    pub fn generate(&self) -> (BlockStore, TerrainStats) {
        let mut store = BlockStore::with_capacity(self.capacity_hint());
        let stats = self.populate(&mut store);
        (store, stats)
    }

    /// Expected block count, capped so a large world does not reserve memory up front.
    fn capacity_hint(&self) -> usize {
        let side = 2 * i64::from(self.config.half_extent.max(0)) + 1;
        let ceiling = self.config.surface_ceiling();
        let depth = ceiling.saturating_sub(i64::from(self.config.floor_y) - 1).max(0);
        side.checked_mul(side)
            .and_then(|columns| columns.checked_mul(depth))
            .and_then(|blocks| usize::try_from(blocks).ok())
            .map_or(MAX_PREALLOCATED_BLOCKS, |blocks| blocks.min(MAX_PREALLOCATED_BLOCKS))
    }

    /// Write the terrain into `store`. Existing blocks are left untouched.
    pub fn populate(&self, store: &mut BlockStore) -> TerrainStats {
        let start = Instant::now();
        let extent = self.config.half_extent;

        // Rows are computed in parallel but written in row order.
        let rows: Vec<Vec<(BlockPos, BlockKind)>> = (-extent..=extent)
            .into_par_iter()
            .map(|x| {
                (-extent..=extent)
                    .flat_map(|z| self.column(x, z))
                    .collect()
            })
            .collect();

        let side = 2 * i64::from(extent.max(0)) + 1;
        let mut stats = TerrainStats {
            columns: usize::try_from(side.saturating_mul(side)).unwrap_or(usize::MAX),
            ..TerrainStats::default()
        };
        for (pos, kind) in rows.into_iter().flatten() {
            if store.insert_generated(pos, kind) {
                stats.blocks += 1;
            }
        }

        for anchor in &self.config.tree_anchors {
            let (written, used_fallback) = self.plant_tree(store, *anchor);
            stats.blocks += written;
            stats.trees += 1;
            if used_fallback {
                stats.fallback_trees += 1;
            }
        }

        stats.elapsed = start.elapsed();
        info!(
            "Terrain generated: {} blocks over {} columns, {} trees in {:.2?}",
            stats.blocks, stats.columns, stats.trees, stats.elapsed
        );
        stats
    }

    /// First occupied Y scanning down from `tree_scan_top` to `floor_y`.
    pub fn find_ground(&self, store: &BlockStore, x: i32, z: i32) -> Option<i32> {
        (self.config.floor_y..=self.config.tree_scan_top)
            .rev()
            .find(|&y| store.contains(BlockPos::new(x, y, z)))
    }

    /// Stack a trunk on the ground of an anchor column.
    ///
    /// Returns the number of wood blocks written and whether the fallback ground height was used.
    fn plant_tree(&self, store: &mut BlockStore, anchor: IVec2) -> (usize, bool) {
        let (ground, used_fallback) = match self.find_ground(store, anchor.x, anchor.y) {
            Some(y) => (y, false),
            None => {
                debug!(
                    "No ground under tree anchor ({}, {}), using y={}",
                    anchor.x, anchor.y, self.config.fallback_ground_y
                );
                (self.config.fallback_ground_y, true)
            }
        };

        let written = (1..=self.config.trunk_height as i32)
            .filter(|dy| {
                store.insert_generated(
                    BlockPos::new(anchor.x, ground + dy, anchor.y),
                    BlockKind::Wood,
                )
            })
            .count();
        (written, used_fallback)
    }
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new(TerrainConfig::default())
    }
}
