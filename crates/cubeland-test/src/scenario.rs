//! Scripted sessions with per-frame invariant checks.

use cubeland_app::{Session, SessionConfig};
use cubeland_core::{BlockKind, BlockPos, GameEvent};
use cubeland_input::MoveIntent;
use cubeland_physics::{overlaps, PhysicsConfig};
use cubeland_world::BlockStore;
use glam::Vec3;
use tracing::trace;

use crate::{Result, TestError};

/// A stone floor with its top face at `y = 0.5`, covering `-half_extent..=half_extent`.
pub fn flat_floor(half_extent: i32) -> BlockStore {
    let mut store = BlockStore::new();
    for x in -half_extent..=half_extent {
        for z in -half_extent..=half_extent {
            store.insert_generated(BlockPos::new(x, 0, z), BlockKind::Stone);
        }
    }
    store
}

/// A session advanced at a fixed frame rate.
pub struct Scenario {
    session: Session,
    dt: f32,
    frame: u64,
}

impl Scenario {
    /// Default frame time.
    pub const DEFAULT_DT: f32 = 1.0 / 60.0;

    /// Wrap an existing session.
    pub const fn new(session: Session) -> Self {
        Self {
            session,
            dt: Self::DEFAULT_DT,
            frame: 0,
        }
    }

    /// A session on generated terrain.
    pub fn generated(config: SessionConfig) -> Result<Self> {
        Ok(Self::new(Session::new(config)?))
    }

    /// A session on [`flat_floor`] with the player's feet at `spawn`.
    pub fn flat(half_extent: i32, spawn: Vec3) -> Result<Self> {
        Self::with_store(flat_floor(half_extent), spawn)
    }

    /// A session in `store` with the player's feet at `spawn`.
    pub fn with_store(store: BlockStore, spawn: Vec3) -> Result<Self> {
        let physics = PhysicsConfig::default();
        let void_y = physics.void_y.min(spawn.y - 30.0);
        let config = SessionConfig::default()
            .with_physics(physics.with_spawn(spawn).with_void_y(void_y));
        Ok(Self::new(Session::with_store(config, store)?))
    }

    /// Set the frame time.
    #[must_use]
    pub const fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    /// Run `frames` frames holding `intent`, returning every event in order.
    ///
    /// A block action in `intent` is only applied on the first frame.
    pub fn run_frames(&mut self, frames: u64, intent: MoveIntent) -> Result<Vec<GameEvent>> {
        let mut events = Vec::new();
        let mut intent = intent;
        for _ in 0..frames {
            events.extend_from_slice(self.session.tick(self.dt, &intent)?);
            intent.action = None;
            self.frame += 1;
            self.check_clear()?;
        }
        trace!(frames, events = events.len(), "Scenario advanced");
        Ok(events)
    }

    /// Run for `seconds` holding `intent`.
    pub fn run(&mut self, seconds: f32, intent: MoveIntent) -> Result<Vec<GameEvent>> {
        let frames = (seconds / self.dt).round() as u64;
        self.run_frames(frames, intent)
    }

    /// Run with no input.
    pub fn idle(&mut self, seconds: f32) -> Result<Vec<GameEvent>> {
        self.run(seconds, MoveIntent::default())
    }

    fn check_clear(&self) -> Result<()> {
        let player = self.session.player();
        let body = player.aabb(&self.session.config().physics);
        if overlaps(&body, self.session.store()) {
            return Err(TestError::Overlap {
                frame: self.frame,
                position: player.position(),
            });
        }
        Ok(())
    }

    /// Feet position.
    pub fn position(&self) -> Vec3 {
        self.session.player().position()
    }

    /// Frames run so far.
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// The session under test.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access, e.g. to edit the world between frames.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}
