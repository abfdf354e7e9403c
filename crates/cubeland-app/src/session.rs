//! The game session: world, player and camera advanced one frame at a time.

use std::f32::consts::TAU;
use std::sync::Arc;

use cubeland_core::{BlockKind, BlockPos, EventQueue, GameEvent, Ray, Result};
use cubeland_input::{BlockAction, LookDelta, MoveIntent};
use cubeland_physics::{raycast, Locomotion, PlayerBody, RaycastHit};
use cubeland_world::{BlockStore, TerrainGenerator};
use glam::{IVec3, Vec3};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::config::SessionConfig;

/// Running totals over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionStats {
    /// Frames ticked.
    pub frames: u64,
    /// Simulated seconds, after per-frame clamping.
    pub simulated: f32,
    /// Successful placements.
    pub blocks_placed: u64,
    /// Successful removals.
    pub blocks_removed: u64,
    /// Jumps started from the ground.
    pub jumps: u64,
    /// Footstep events.
    pub footsteps: u64,
    /// Falls below the void threshold.
    pub respawns: u64,
}

impl SessionStats {
    fn record(&mut self, event: GameEvent) {
        match event {
            GameEvent::BlockPlaced => self.blocks_placed += 1,
            GameEvent::BlockRemoved => self.blocks_removed += 1,
            GameEvent::JumpStarted => self.jumps += 1,
            GameEvent::Footstep => self.footsteps += 1,
            GameEvent::Respawned => self.respawns += 1,
        }
    }
}

/// Owns the block store, the player body and the camera.
///
/// Each [`tick`](Self::tick) applies one frame of intent in a fixed order:
/// camera look, block action, player kinematics, and finally the player's
/// volume is reserved in the store so the next placement cannot bury them.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    store: BlockStore,
    player: PlayerBody,
    /// Radians; zero faces +Z.
    yaw: f32,
    /// Radians; positive looks up.
    pitch: f32,
    events: EventQueue,
    stats: SessionStats,
}

impl Session {
    /// Generate the terrain and place the player at the spawn point.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let (store, _) = TerrainGenerator::new(config.terrain.clone()).generate();
        Self::with_store(config, store)
    }

    /// Start a session in an existing world.
    pub fn with_store(config: SessionConfig, store: BlockStore) -> Result<Self> {
        config.validate()?;
        let player = PlayerBody::at_spawn(&config.physics);
        info!(
            "Session started: {} blocks, player at {:?}",
            store.len(),
            player.position()
        );

        let mut session = Self {
            config,
            store,
            player,
            yaw: 0.0,
            pitch: 0.0,
            events: EventQueue::new(),
            stats: SessionStats::default(),
        };
        session.publish_reservation();
        Ok(session)
    }

    /// Advance one frame. Returns the events it produced, in order.
    pub fn tick(&mut self, dt: f32, intent: &MoveIntent) -> Result<&[GameEvent]> {
        self.events.clear();

        self.look(intent.look);
        if let Some(action) = intent.action {
            self.perform(action);
        }

        let locomotion = Locomotion {
            wish: intent.movement.wish(),
            yaw: self.yaw,
            jump: intent.movement.jump(),
            sneak: intent.movement.sneak(),
        };
        self.player.step(
            dt,
            &locomotion,
            &self.store,
            &self.config.physics,
            &mut self.events,
        )?;
        self.publish_reservation();

        self.stats.frames += 1;
        self.stats.simulated += dt.clamp(0.0, self.config.physics.max_frame_dt);
        for &event in self.events.as_slice() {
            self.stats.record(event);
        }
        Ok(self.events.as_slice())
    }

    /// Rotate the camera. Positive yaw turns right, positive pitch looks up.
    pub fn look(&mut self, delta: LookDelta) {
        if delta.is_zero() {
            return;
        }
        let max_pitch = self.config.max_pitch_degrees.to_radians();
        self.yaw = (self.yaw - delta.yaw_degrees.to_radians()).rem_euclid(TAU);
        self.pitch = (self.pitch + delta.pitch_degrees.to_radians()).clamp(-max_pitch, max_pitch);
    }

    /// Set the camera orientation directly, in radians.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        let max_pitch = self.config.max_pitch_degrees.to_radians();
        self.yaw = yaw.rem_euclid(TAU);
        self.pitch = pitch.clamp(-max_pitch, max_pitch);
    }

    /// Place or break at the crosshair. Returns `true` if the world changed.
    pub fn perform(&mut self, action: BlockAction) -> bool {
        let Some(hit) = self.target() else {
            debug!(?action, "Nothing targeted");
            return false;
        };
        match action {
            BlockAction::Break => self.break_block(hit.block_position),
            // Placing from inside a block has no face to build against.
            BlockAction::Place(_) if hit.normal == IVec3::ZERO => false,
            BlockAction::Place(kind) => self.place(hit.adjacent(), kind),
        }
    }

    /// Add a block, emitting [`GameEvent::BlockPlaced`] on success.
    ///
    /// Fails if the cell is occupied, out of range, or overlaps the player.
    pub fn place(&mut self, pos: BlockPos, kind: BlockKind) -> bool {
        let placed = self.store.add(pos, kind);
        if placed {
            self.events.push(GameEvent::BlockPlaced);
        }
        placed
    }

    /// Remove a block, emitting [`GameEvent::BlockRemoved`] on success.
    pub fn break_block(&mut self, pos: BlockPos) -> bool {
        let removed = self.store.remove(pos);
        if removed {
            self.events.push(GameEvent::BlockRemoved);
        }
        removed
    }

    /// The block under the crosshair, within reach.
    pub fn target(&self) -> Option<RaycastHit> {
        let ray = Ray::new(self.eye_position(), self.look_direction())?;
        raycast(&self.store, &ray, self.config.reach)
    }

    /// Unit vector the camera faces.
    pub fn look_direction(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(
            cos_pitch * self.yaw.sin(),
            sin_pitch,
            cos_pitch * self.yaw.cos(),
        )
    }

    /// Camera position.
    pub fn eye_position(&self) -> Vec3 {
        self.player.eye_position(&self.config.physics)
    }

    /// Camera yaw in radians, within `0..TAU`.
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Camera pitch in radians.
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// The world.
    pub const fn store(&self) -> &BlockStore {
        &self.store
    }

    /// The player body.
    pub const fn player(&self) -> &PlayerBody {
        &self.player
    }

    /// The validated configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Totals since the session started.
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Move the player, e.g. for a scripted start.
    pub fn teleport(&mut self, feet: Vec3) {
        self.player.teleport(feet);
        self.publish_reservation();
    }

    fn publish_reservation(&mut self) {
        self.store
            .reserve(self.player.placement_bounds(&self.config.physics));
    }
}

/// A [`Session`] behind one lock, for hosts that gather input on another thread.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    /// Wrap a session for sharing.
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Advance one frame, returning an owned copy of its events.
    pub fn tick(&self, dt: f32, intent: &MoveIntent) -> Result<Vec<GameEvent>> {
        let mut session = self.inner.lock();
        session.tick(dt, intent).map(<[GameEvent]>::to_vec)
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Lock the session.
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cubeland_input::MoveFlags;
    use cubeland_physics::PhysicsConfig;
    use cubeland_world::TerrainConfig;

    const FRAME: f32 = 1.0 / 60.0;

    fn settle(session: &mut Session, seconds: f32) {
        let frames = (seconds / FRAME).round() as usize;
        for _ in 0..frames {
            session.tick(FRAME, &MoveIntent::default()).unwrap();
        }
    }

    fn flat_session() -> Session {
        let mut store = BlockStore::new();
        for x in -8..=8 {
            for z in -8..=8 {
                store.add(BlockPos::new(x, 0, z), BlockKind::Stone);
            }
        }
        let config = SessionConfig::default()
            .with_physics(PhysicsConfig::default().with_spawn(Vec3::new(0.0, 0.5, 0.0)));
        Session::with_store(config, store).unwrap()
    }

    #[test]
    fn spawn_settles_on_generated_terrain() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        assert_eq!(session.player().position(), Vec3::new(0.0, 15.0, 0.0));

        settle(&mut session, 2.0);

        let ground = TerrainGenerator::new(TerrainConfig::default()).height_at(0, 0);
        assert!(session.player().is_grounded());
        assert_relative_eq!(session.player().position().y, ground as f32 + 0.5);
        assert_eq!(session.player().vertical_velocity(), 0.0);
    }

    #[test]
    fn cannot_place_inside_player() {
        let mut session = flat_session();
        settle(&mut session, 0.1);
        let version = session.store().version();

        // Feet cell and head cell.
        assert!(!session.place(BlockPos::new(0, 1, 0), BlockKind::Dirt));
        assert!(!session.place(BlockPos::new(0, 2, 0), BlockKind::Dirt));
        // Just above the head is outside the body plus margin.
        assert!(session.place(BlockPos::new(0, 3, 0), BlockKind::Dirt));
        assert!(session.place(BlockPos::new(2, 1, 0), BlockKind::Dirt));
        assert_eq!(session.store().version(), version + 2);
    }

    #[test]
    fn break_and_place_at_crosshair() {
        let mut session = flat_session();
        settle(&mut session, 0.1);
        // Look straight down at the floor under the feet.
        session.set_orientation(0.0, -89f32.to_radians());

        let hit = session.target().unwrap();
        assert_eq!(hit.block_position, BlockPos::new(0, 0, 0));

        let break_it = MoveIntent {
            action: Some(BlockAction::Break),
            ..MoveIntent::default()
        };
        let events = session.tick(FRAME, &break_it).unwrap().to_vec();
        assert_eq!(events.first(), Some(&GameEvent::BlockRemoved));
        assert!(!session.store().contains(BlockPos::new(0, 0, 0)));

        // Face the wall of floor blocks ahead and place against the next one.
        let mut session = flat_session();
        settle(&mut session, 0.1);
        session.set_orientation(0.0, -45f32.to_radians());
        let hit = session.target().unwrap();
        let place = MoveIntent {
            action: Some(BlockAction::Place(BlockKind::Glass)),
            ..MoveIntent::default()
        };
        session.tick(FRAME, &place).unwrap();
        assert_eq!(session.store().get(hit.adjacent()), Some(BlockKind::Glass));
        assert_eq!(session.stats().blocks_placed, 1);
    }

    #[test]
    fn look_clamps_pitch_and_wraps_yaw() {
        let mut session = flat_session();
        session.look(LookDelta::new(0.0, 500.0));
        assert_relative_eq!(session.pitch(), 89f32.to_radians());
        session.look(LookDelta::new(0.0, -1000.0));
        assert_relative_eq!(session.pitch(), -(89f32.to_radians()));

        session.look(LookDelta::new(-90.0, 0.0));
        assert_relative_eq!(session.yaw(), std::f32::consts::FRAC_PI_2, epsilon = 1e-5);
        session.look(LookDelta::new(360.0, 0.0));
        assert!(session.yaw() >= 0.0 && session.yaw() < TAU);
        assert_relative_eq!(session.yaw(), std::f32::consts::FRAC_PI_2, epsilon = 1e-4);
    }

    #[test]
    fn looking_turns_walking_direction() {
        let mut session = flat_session();
        settle(&mut session, 0.1);
        // Turning left by 90 degrees faces +X.
        session.look(LookDelta::new(-90.0, 0.0));
        let forward = MoveIntent::moving(MoveFlags::FORWARD);
        for _ in 0..30 {
            session.tick(FRAME, &forward).unwrap();
        }
        let pos = session.player().position();
        assert!(pos.x > 2.0, "{pos:?}");
        assert!(pos.z.abs() < 1e-3, "{pos:?}");
    }

    #[test]
    fn jump_and_footstep_events_reach_caller() {
        let mut session = flat_session();
        settle(&mut session, 0.1);

        let jump = MoveIntent::moving(MoveFlags::JUMP);
        let events = session.tick(FRAME, &jump).unwrap();
        assert_eq!(events, &[GameEvent::JumpStarted]);

        settle(&mut session, 1.0);
        let walk = MoveIntent::moving(MoveFlags::FORWARD);
        let mut footsteps = 0;
        for _ in 0..60 {
            footsteps += session
                .tick(FRAME, &walk)
                .unwrap()
                .iter()
                .filter(|e| **e == GameEvent::Footstep)
                .count();
        }
        assert!(footsteps >= 2);
        assert_eq!(session.stats().footsteps, footsteps as u64);
        assert_eq!(session.stats().jumps, 1);
    }

    #[test]
    fn shared_session_serializes_access() {
        let shared = SharedSession::new(flat_session());
        let handle = shared.clone();

        let worker = std::thread::spawn(move || {
            handle.with(|session| session.place(BlockPos::new(4, 1, 4), BlockKind::Wood))
        });
        assert!(worker.join().unwrap());

        shared.tick(FRAME, &MoveIntent::default()).unwrap();
        assert_eq!(shared.lock().store().get(BlockPos::new(4, 1, 4)), Some(BlockKind::Wood));
        assert_eq!(shared.lock().stats().frames, 1);
    }

    #[test]
    fn invalid_configs_never_start() {
        let nan_walk = PhysicsConfig {
            walk_speed: f32::NAN,
            ..PhysicsConfig::default()
        };
        let config = SessionConfig::default().with_physics(nan_walk);
        assert!(Session::with_store(config, BlockStore::new()).is_err());

        let huge = TerrainConfig::default().with_half_extent(i32::MAX / 2 + 1);
        let config = SessionConfig::default().with_terrain(huge);
        assert!(matches!(Session::new(config), Err(cubeland_core::Error::Config(_))));
    }
}
