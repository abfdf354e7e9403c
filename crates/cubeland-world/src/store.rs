//! Sparse block store with a change-version counter.

use cubeland_core::constants::COLLISION_EPSILON;
use cubeland_core::{Aabb, BlockKey, BlockKind, BlockPos};
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use tracing::{trace, warn};

/// Sparse mapping from grid cell to block kind.
///
/// A cell is occupied iff it has an entry; absence is air. Every successful
/// [`add`](Self::add) or [`remove`](Self::remove) bumps [`version`](Self::version)
/// by exactly one, so observers can detect change by comparing a single integer.
#[derive(Debug, Default, Clone)]
pub struct BlockStore {
    /// Occupied cells indexed by packed key.
    blocks: HashMap<BlockKey, BlockKind>,
    /// Mutation counter.
    version: u64,
    /// Volume no block may be placed into (the player's body).
    reserved: Option<Aabb>,
}

impl BlockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store sized for `capacity` blocks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            blocks: HashMap::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Get the block at `pos`, or `None` for air.
    #[inline]
    pub fn get(&self, pos: BlockPos) -> Option<BlockKind> {
        let key = BlockKey::encode(pos).ok()?;
        self.blocks.get(&key).copied()
    }

    /// Returns `true` if a block occupies `pos`.
    #[inline]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.get(pos).is_some()
    }

    /// Returns `true` if a block the player collides with occupies `pos`.
    #[inline]
    pub fn is_solid(&self, pos: BlockPos) -> bool {
        self.get(pos).is_some_and(BlockKind::is_solid)
    }

    /// Place a block.
    ///
    /// Returns `false` without touching the store or its version if the cell is
    /// occupied, outside the key range, or overlaps the reserved volume.
    pub fn add(&mut self, pos: BlockPos, kind: BlockKind) -> bool {
        let key = match BlockKey::encode(pos) {
            Ok(key) => key,
            Err(e) => {
                warn!("Rejected block placement: {e}");
                return false;
            }
        };
        if self.blocks.contains_key(&key) {
            return false;
        }
        if self
            .reserved
            .is_some_and(|reserved| reserved.overlaps(&Aabb::block(pos), COLLISION_EPSILON))
        {
            trace!(?pos, "Placement overlaps reserved volume");
            return false;
        }
        self.blocks.insert(key, kind);
        self.version += 1;
        true
    }

    /// Remove a block. Returns `false` if the cell was already empty.
    pub fn remove(&mut self, pos: BlockPos) -> bool {
        let Ok(key) = BlockKey::encode(pos) else {
            return false;
        };
        if self.blocks.remove(&key).is_none() {
            return false;
        }
        self.version += 1;
        true
    }

    /// Write a block during world generation.
    ///
    /// Skips the reservation check and does not bump the version: generated
    /// terrain is the state observers first see at version 0.
    pub fn insert_generated(&mut self, pos: BlockPos, kind: BlockKind) -> bool {
        match BlockKey::encode(pos) {
            Ok(key) => match self.blocks.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(kind);
                    true
                }
                Entry::Occupied(_) => false,
            },
            Err(e) => {
                warn!("Skipped generated block: {e}");
                false
            }
        }
    }

    /// Current change counter.
    #[inline]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Forbid placements overlapping `volume` until the next reservation.
    pub fn reserve(&mut self, volume: Aabb) {
        self.reserved = Some(volume);
    }

    /// Allow placements anywhere again.
    pub fn clear_reservation(&mut self) {
        self.reserved = None;
    }

    /// Iterate over all occupied cells in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, BlockKind)> + '_ {
        self.blocks
            .iter()
            .map(|(key, kind)| (decode_stored(*key), *kind))
    }

    /// All occupied positions.
    pub fn positions(&self) -> Vec<BlockPos> {
        self.blocks.keys().map(|key| decode_stored(*key)).collect()
    }

    /// Occupied positions grouped by kind, for one instanced draw per kind.
    pub fn blocks_by_kind(&self) -> HashMap<BlockKind, Vec<BlockPos>> {
        let mut groups: HashMap<BlockKind, Vec<BlockPos>> = HashMap::new();
        for (pos, kind) in self.iter() {
            groups.entry(kind).or_default().push(pos);
        }
        groups
    }
}

/// Keys in the map were all produced by `BlockKey::encode`; one that fails to
/// decode means the store is corrupted.
fn decode_stored(key: BlockKey) -> BlockPos {
    match key.decode() {
        Ok(pos) => pos,
        Err(e) => panic!("corrupted block store: {e}"),
    }
}

/// Tracks the last store version an observer acted on.
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionWatcher {
    seen: Option<u64>,
}

impl VersionWatcher {
    /// Create a watcher that reports the first poll as a change.
    pub const fn new() -> Self {
        Self { seen: None }
    }

    /// Returns `true` if the store changed since the previous call.
    pub fn poll(&mut self, store: &BlockStore) -> bool {
        let current = store.version();
        if self.seen == Some(current) {
            return false;
        }
        self.seen = Some(current);
        true
    }
}
