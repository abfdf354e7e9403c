//! Player body kinematics.
//!
//! Each frame the body's time step is clamped and split into fixed sub-steps.
//! Every sub-step resolves the Y axis first, then X, then Z, each against the
//! position produced by the axes before it. Resolving axes separately lets
//! the body slide along a wall on one axis while blocked on the other, and
//! the short sub-steps keep every tentative move well under one block so a
//! fast fall cannot skip over a floor.

use cubeland_core::{Aabb, Error, EventQueue, GameEvent, Result};
use cubeland_world::BlockStore;
use glam::{Vec2, Vec3};
use tracing::{debug, info};

use crate::collision::{highest_overlap, overlaps};
use crate::config::PhysicsConfig;

/// Movement requested for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Locomotion {
    /// Strafe on `x` (positive is right) and walk on `y` (positive is forward), each in `-1..=1`.
    pub wish: Vec2,
    /// Camera yaw in radians. Zero faces +Z.
    pub yaw: f32,
    /// Jump if standing on the ground.
    pub jump: bool,
    /// Walk at reduced speed.
    pub sneak: bool,
}

impl Locomotion {
    /// Horizontal velocity in world space.
    pub fn horizontal_velocity(&self, config: &PhysicsConfig) -> Vec3 {
        let forward = Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos());
        let right = forward.cross(Vec3::Y);
        let direction = (right * self.wish.x + forward * self.wish.y).normalize_or_zero();

        let speed = if self.sneak {
            config.walk_speed * config.sneak_multiplier
        } else {
            config.walk_speed
        };
        direction * speed
    }
}

/// Whether the body is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// Standing on a block; may jump.
    Grounded,
    /// Falling or rising.
    Airborne,
}

/// The player's physical state.
#[derive(Debug, Clone)]
pub struct PlayerBody {
    /// Feet position: center of the body's bottom face.
    position: Vec3,
    vertical_velocity: f32,
    grounded: bool,
    /// Simulated seconds since creation.
    clock: f32,
    last_footstep: Option<f32>,
}

impl PlayerBody {
    /// Create an airborne body at rest with its feet at `position`.
    pub const fn new(position: Vec3) -> Self {
        Self {
            position,
            vertical_velocity: 0.0,
            grounded: false,
            clock: 0.0,
            last_footstep: None,
        }
    }

    /// Create a body at the configured spawn point.
    pub const fn at_spawn(config: &PhysicsConfig) -> Self {
        Self::new(config.spawn)
    }

    /// Feet position.
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Vertical speed in blocks/s (positive is up).
    pub const fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Override the vertical speed.
    pub fn set_vertical_velocity(&mut self, velocity: f32) {
        self.vertical_velocity = velocity;
    }

    /// Returns `true` if standing on a block.
    pub const fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Grounded or airborne.
    pub const fn state(&self) -> MotionState {
        if self.grounded {
            MotionState::Grounded
        } else {
            MotionState::Airborne
        }
    }

    /// Move the feet to `position` with no velocity, airborne.
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.vertical_velocity = 0.0;
        self.grounded = false;
    }

    /// The collision box.
    pub fn aabb(&self, config: &PhysicsConfig) -> Aabb {
        Aabb::from_feet(self.position, config.half_width, config.height)
    }

    /// The collision box grown vertically by the placement margin.
    pub fn placement_bounds(&self, config: &PhysicsConfig) -> Aabb {
        self.aabb(config).expanded_y(config.placement_margin)
    }

    /// Camera position.
    pub fn eye_position(&self, config: &PhysicsConfig) -> Vec3 {
        self.position + Vec3::Y * config.eye_height
    }

    /// Advance the body by one frame of `dt` seconds.
    ///
    /// Emits [`GameEvent::JumpStarted`], [`GameEvent::Footstep`] and
    /// [`GameEvent::Respawned`] into `events`. Fails only if the body is buried
    /// deeper than `max_unembed_steps` blocks.
    pub fn step(
        &mut self,
        dt: f32,
        locomotion: &Locomotion,
        store: &BlockStore,
        config: &PhysicsConfig,
        events: &mut EventQueue,
    ) -> Result<()> {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, config.max_frame_dt)
        } else {
            0.0
        };
        let horizontal = locomotion.horizontal_velocity(config);

        if locomotion.jump && self.grounded {
            self.vertical_velocity = config.jump_impulse;
            self.grounded = false;
            events.push(GameEvent::JumpStarted);
        }

        let start = self.position;
        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(config.substep);
            remaining -= h;
            self.integrate(h, horizontal, store, config)?;
        }
        self.clock += dt;

        if self.position.y < config.void_y {
            info!(
                "Player fell below y={} at {:?}, respawning",
                config.void_y, self.position
            );
            self.teleport(config.spawn);
            events.push(GameEvent::Respawned);
            return Ok(());
        }

        self.emit_footstep(start, dt, config, events);
        Ok(())
    }

    /// One sub-step: gravity, then Y, X, Z in that order.
    fn integrate(
        &mut self,
        h: f32,
        horizontal: Vec3,
        store: &BlockStore,
        config: &PhysicsConfig,
    ) -> Result<()> {
        self.vertical_velocity =
            (self.vertical_velocity + config.gravity * h).max(-config.max_fall_speed);

        self.resolve_vertical(h, store, config)?;
        self.resolve_horizontal(Vec3::X * horizontal.x * h, store, config);
        self.resolve_horizontal(Vec3::Z * horizontal.z * h, store, config);
        Ok(())
    }

    fn resolve_vertical(
        &mut self,
        h: f32,
        store: &BlockStore,
        config: &PhysicsConfig,
    ) -> Result<()> {
        let candidate = self.position + Vec3::Y * (self.vertical_velocity * h);
        let body = Aabb::from_feet(candidate, config.half_width, config.height);

        if !overlaps(&body, store) {
            self.position = candidate;
            self.grounded = self.vertical_velocity <= 0.0 && self.ground_below(store, config);
            return Ok(());
        }

        if self.vertical_velocity > 0.0 {
            // Head bump: stay put and start falling.
            self.vertical_velocity = 0.0;
            return Ok(());
        }

        self.position = candidate;
        self.settle(store, config)?;
        self.vertical_velocity = 0.0;
        self.grounded = true;
        Ok(())
    }

    /// Lift the feet onto the top face of the highest block the body overlaps,
    /// repeating until the body is clear.
    fn settle(&mut self, store: &BlockStore, config: &PhysicsConfig) -> Result<()> {
        let mut steps = 0;
        while let Some(cell) = highest_overlap(&self.aabb(config), store) {
            if steps == config.max_unembed_steps {
                return Err(Error::Embedded {
                    y: self.position.y,
                    steps,
                });
            }
            self.position.y = cell.top();
            steps += 1;
        }
        if steps > 1 {
            debug!("Pushed player out of geometry in {steps} steps");
        }
        Ok(())
    }

    /// Move along one horizontal axis unless that would overlap a block.
    fn resolve_horizontal(&mut self, delta: Vec3, store: &BlockStore, config: &PhysicsConfig) {
        if delta == Vec3::ZERO {
            return;
        }
        let candidate = self.position + delta;
        let body = Aabb::from_feet(candidate, config.half_width, config.height);
        if !overlaps(&body, store) {
            self.position = candidate;
        }
    }

    fn ground_below(&self, store: &BlockStore, config: &PhysicsConfig) -> bool {
        let feet = self.position;
        let slab = Aabb::new(
            Vec3::new(
                feet.x - config.half_width,
                feet.y - config.ground_probe,
                feet.z - config.half_width,
            ),
            Vec3::new(feet.x + config.half_width, feet.y, feet.z + config.half_width),
        );
        overlaps(&slab, store)
    }

    fn emit_footstep(
        &mut self,
        start: Vec3,
        dt: f32,
        config: &PhysicsConfig,
        events: &mut EventQueue,
    ) {
        if !self.grounded || dt <= 0.0 {
            return;
        }
        let moved = (self.position - start) * Vec3::new(1.0, 0.0, 1.0);
        if moved.length() / dt < config.footstep_min_speed {
            return;
        }
        if self
            .last_footstep
            .is_some_and(|last| self.clock - last < config.footstep_interval)
        {
            return;
        }
        self.last_footstep = Some(self.clock);
        events.push(GameEvent::Footstep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cubeland_core::{BlockKind, BlockPos};
    use std::f32::consts::FRAC_PI_2;

    const FRAME: f32 = 1.0 / 60.0;

    fn flat_floor(extent: i32) -> BlockStore {
        let mut store = BlockStore::new();
        for x in -extent..=extent {
            for z in -extent..=extent {
                store.add(BlockPos::new(x, 0, z), BlockKind::Stone);
            }
        }
        store
    }

    fn run(
        body: &mut PlayerBody,
        frames: usize,
        locomotion: &Locomotion,
        store: &BlockStore,
        config: &PhysicsConfig,
        events: &mut EventQueue,
    ) {
        for _ in 0..frames {
            body.step(FRAME, locomotion, store, config, events).unwrap();
            assert!(
                !overlaps(&body.aabb(config), store),
                "body inside geometry at {:?}",
                body.position()
            );
        }
    }

    #[test]
    fn settles_on_flat_floor() {
        let store = flat_floor(5);
        let config = PhysicsConfig::default();
        let mut body = PlayerBody::new(Vec3::new(0.0, 3.0, 0.0));
        let mut events = EventQueue::new();

        run(&mut body, 90, &Locomotion::default(), &store, &config, &mut events);

        assert!(body.is_grounded());
        assert_eq!(body.state(), MotionState::Grounded);
        assert_relative_eq!(body.position().y, 0.5);
        assert_relative_eq!(body.vertical_velocity(), 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn resting_body_stays_put() {
        let store = flat_floor(5);
        let config = PhysicsConfig::default();
        let mut body = PlayerBody::new(Vec3::new(0.0, 0.5, 0.0));
        let mut events = EventQueue::new();
        run(&mut body, 10, &Locomotion::default(), &store, &config, &mut events);
        assert_eq!(body.position(), Vec3::new(0.0, 0.5, 0.0));
        assert!(body.is_grounded());
    }

    #[test]
    fn falling_below_void_respawns_exactly() {
        let store = BlockStore::new();
        let config = PhysicsConfig::default();
        let mut body = PlayerBody::new(Vec3::new(3.0, -100.0, 3.0));
        body.set_vertical_velocity(-20.0);
        let mut events = EventQueue::new();

        body.step(FRAME, &Locomotion::default(), &store, &config, &mut events)
            .unwrap();

        assert_eq!(body.position(), config.spawn);
        assert_eq!(body.vertical_velocity(), 0.0);
        assert!(!body.is_grounded());
        assert_eq!(events.as_slice(), &[GameEvent::Respawned]);
    }

    #[test]
    fn jump_only_from_ground() {
        let store = flat_floor(5);
        let config = PhysicsConfig::default();
        let mut body = PlayerBody::new(Vec3::new(0.0, 0.5, 0.0));
        let mut events = EventQueue::new();
        run(&mut body, 1, &Locomotion::default(), &store, &config, &mut events);
        assert!(body.is_grounded());

        let jump = Locomotion {
            jump: true,
            ..Locomotion::default()
        };
        run(&mut body, 1, &jump, &store, &config, &mut events);
        assert_eq!(events.count(GameEvent::JumpStarted), 1);
        assert!(!body.is_grounded());
        assert!(body.position().y > 0.5);
        assert!(body.vertical_velocity() > 0.0);

        // Holding jump mid-air does nothing.
        run(&mut body, 5, &jump, &store, &config, &mut events);
        assert_eq!(events.count(GameEvent::JumpStarted), 1);
    }

    #[test]
    fn jump_reaches_expected_apex() {
        let store = flat_floor(5);
        let config = PhysicsConfig::default();
        let mut body = PlayerBody::new(Vec3::new(0.0, 0.5, 0.0));
        let mut events = EventQueue::new();
        run(&mut body, 1, &Locomotion::default(), &store, &config, &mut events);

        let jump = Locomotion {
            jump: true,
            ..Locomotion::default()
        };
        let mut apex = body.position().y;
        for _ in 0..120 {
            body.step(FRAME, &jump, &store, &config, &mut events).unwrap();
            apex = apex.max(body.position().y);
        }
        // v²/2g = 81/60 = 1.35 above the floor, less a little for discrete steps.
        assert!(apex > 1.7 && apex < 1.9, "apex {apex}");
    }

    #[test]
    fn head_bump_stops_rise() {
        let mut store = flat_floor(5);
        store.add(BlockPos::new(0, 3, 0), BlockKind::Stone);
        let config = PhysicsConfig::default();
        let mut body = PlayerBody::new(Vec3::new(0.0, 0.5, 0.0));
        let mut events = EventQueue::new();
        run(&mut body, 1, &Locomotion::default(), &store, &config, &mut events);

        let jump = Locomotion {
            jump: true,
            ..Locomotion::default()
        };
        let mut apex = body.position().y;
        for _ in 0..60 {
            body.step(FRAME, &jump, &store, &config, &mut events).unwrap();
            assert!(!overlaps(&body.aabb(&config), &store));
            apex = apex.max(body.position().y);
        }
        // Ceiling bottom at 2.5, body height 1.8.
        assert!(apex <= 0.7 + 1e-3, "apex {apex}");
    }

    #[test]
    fn slides_along_wall() {
        let mut store = flat_floor(10);
        for z in -10..=10 {
            store.add(BlockPos::new(2, 1, z), BlockKind::Wood);
            store.add(BlockPos::new(2, 2, z), BlockKind::Wood);
        }
        let config = PhysicsConfig::default();
        let mut body = PlayerBody::new(Vec3::new(0.0, 0.5, 0.0));
        let mut events = EventQueue::new();

        // Facing +X, walking forward and right (+Z).
        let walk = Locomotion {
            wish: Vec2::new(1.0, 1.0),
            yaw: FRAC_PI_2,
            ..Locomotion::default()
        };
        run(&mut body, 90, &walk, &store, &config, &mut events);

        let pos = body.position();
        assert!(pos.x <= 1.2 + 1e-3, "went through wall: {pos:?}");
        assert!(pos.x > 1.0, "did not reach wall: {pos:?}");
        assert!(pos.z > 4.0, "did not slide: {pos:?}");
    }

    #[test]
    fn sneaking_is_slower() {
        let store = flat_floor(10);
        let config = PhysicsConfig::default();
        let mut events = EventQueue::new();

        let walk = Locomotion {
            wish: Vec2::Y,
            ..Locomotion::default()
        };
        let sneak = Locomotion { sneak: true, ..walk };

        let mut walker = PlayerBody::new(Vec3::new(0.0, 0.5, 0.0));
        let mut sneaker = PlayerBody::new(Vec3::new(0.0, 0.5, 0.0));
        run(&mut walker, 60, &walk, &store, &config, &mut events);
        run(&mut sneaker, 60, &sneak, &store, &config, &mut events);

        assert_relative_eq!(walker.position().z, 5.0, epsilon = 1e-2);
        assert_relative_eq!(sneaker.position().z, 1.5, epsilon = 1e-2);
    }

    #[test]
    fn footsteps_are_throttled() {
        let store = flat_floor(10);
        let config = PhysicsConfig::default();
        let mut events = EventQueue::new();
        let mut body = PlayerBody::new(Vec3::new(0.0, 0.5, 0.0));

        run(&mut body, 60, &Locomotion::default(), &store, &config, &mut events);
        assert_eq!(events.count(GameEvent::Footstep), 0);

        let walk = Locomotion {
            wish: Vec2::Y,
            ..Locomotion::default()
        };
        run(&mut body, 60, &walk, &store, &config, &mut events);
        let steps = events.count(GameEvent::Footstep);
        assert!((2..=3).contains(&steps), "{steps} footsteps in one second");
    }

    #[test]
    fn walking_into_wall_is_silent() {
        let mut store = flat_floor(10);
        for z in -10..=10 {
            store.add(BlockPos::new(2, 1, z), BlockKind::Wood);
            store.add(BlockPos::new(2, 2, z), BlockKind::Wood);
        }
        let config = PhysicsConfig::default();
        let mut events = EventQueue::new();
        let mut body = PlayerBody::new(Vec3::new(0.0, 0.5, 0.0));

        // Facing +X, straight at the wall.
        let walk = Locomotion {
            wish: Vec2::Y,
            yaw: FRAC_PI_2,
            ..Locomotion::default()
        };
        run(&mut body, 30, &walk, &store, &config, &mut events);
        let pressed = body.position();
        assert!(pressed.x > 1.0, "did not reach wall: {pressed:?}");

        events.clear();
        run(&mut body, 60, &walk, &store, &config, &mut events);
        assert!(body.is_grounded());
        assert_relative_eq!(body.position().x, pressed.x);
        assert_eq!(events.count(GameEvent::Footstep), 0);
    }

    #[test]
    fn long_frame_is_clamped() {
        let store = BlockStore::new();
        let config = PhysicsConfig::default();
        let mut body = PlayerBody::new(Vec3::new(0.0, 10.0, 0.0));
        let mut events = EventQueue::new();

        body.step(5.0, &Locomotion::default(), &store, &config, &mut events)
            .unwrap();

        // 0.1 s of free fall from rest: 0.5 * 30 * 0.01 = 0.15.
        let fallen = 10.0 - body.position().y;
        assert!(fallen > 0.1 && fallen < 0.2, "fell {fallen}");
    }

    #[test]
    fn fast_fall_does_not_tunnel() {
        let store = flat_floor(2);
        let config = PhysicsConfig::default();
        let mut body = PlayerBody::new(Vec3::new(0.0, 40.0, 0.0));
        body.set_vertical_velocity(-config.max_fall_speed);
        let mut events = EventQueue::new();

        run(&mut body, 120, &Locomotion::default(), &store, &config, &mut events);
        assert_relative_eq!(body.position().y, 0.5);
        assert!(body.is_grounded());
    }

    #[test]
    fn embedded_body_is_pushed_up() {
        let mut store = BlockStore::new();
        for y in 0..=2 {
            store.add(BlockPos::new(0, y, 0), BlockKind::Stone);
        }
        let config = PhysicsConfig::default();
        let mut body = PlayerBody::new(Vec3::new(0.0, 0.6, 0.0));
        let mut events = EventQueue::new();

        body.step(FRAME, &Locomotion::default(), &store, &config, &mut events)
            .unwrap();
        assert_relative_eq!(body.position().y, 2.5);
        assert!(body.is_grounded());
    }

    #[test]
    fn deeply_buried_body_is_an_error() {
        let mut store = BlockStore::new();
        for y in 0..200 {
            store.add(BlockPos::new(0, y, 0), BlockKind::Stone);
        }
        let config = PhysicsConfig::default();
        let mut body = PlayerBody::new(Vec3::new(0.0, 1.0, 0.0));
        let mut events = EventQueue::new();

        let result = body.step(FRAME, &Locomotion::default(), &store, &config, &mut events);
        assert!(matches!(result, Err(Error::Embedded { steps: 64, .. })));
    }
}
