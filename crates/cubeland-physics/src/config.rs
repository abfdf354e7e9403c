//! Player physics tuning.

use cubeland_core::{Error, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Player body and movement parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Half the body width on X and Z.
    pub half_width: f32,
    /// Body height above the feet.
    pub height: f32,
    /// Camera height above the feet.
    pub eye_height: f32,
    /// Vertical acceleration in blocks/s² (negative is down).
    pub gravity: f32,
    /// Largest downward speed in blocks/s.
    pub max_fall_speed: f32,
    /// Upward speed set by a jump.
    pub jump_impulse: f32,
    /// Horizontal speed in blocks/s.
    pub walk_speed: f32,
    /// Speed factor while sneaking.
    pub sneak_multiplier: f32,
    /// Longest frame time simulated; longer frames are truncated.
    pub max_frame_dt: f32,
    /// Longest integration sub-step.
    pub substep: f32,
    /// Feet elevation below which the player respawns.
    pub void_y: f32,
    /// Respawn and initial feet position.
    pub spawn: Vec3,
    /// Depth of the slab below the feet probed for ground.
    pub ground_probe: f32,
    /// Upward displacements tried before an embedded body is a fatal error.
    pub max_unembed_steps: u32,
    /// Vertical margin added to the body when rejecting block placements.
    pub placement_margin: f32,
    /// Minimum seconds between footsteps.
    pub footstep_interval: f32,
    /// Minimum horizontal speed that counts as walking.
    pub footstep_min_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            half_width: 0.3,
            height: 1.8,
            eye_height: 1.6,
            gravity: -30.0,
            max_fall_speed: 50.0,
            jump_impulse: 9.0,
            walk_speed: 5.0,
            sneak_multiplier: 0.3,
            max_frame_dt: 0.1,
            substep: 1.0 / 60.0,
            void_y: -30.0,
            spawn: Vec3::new(0.0, 15.0, 0.0),
            ground_probe: 0.05,
            max_unembed_steps: 64,
            placement_margin: 0.05,
            footstep_interval: 0.35,
            footstep_min_speed: 0.5,
        }
    }
}

impl PhysicsConfig {
    /// Set the spawn point.
    #[must_use]
    pub const fn with_spawn(mut self, spawn: Vec3) -> Self {
        self.spawn = spawn;
        self
    }

    /// Set the void threshold.
    #[must_use]
    pub const fn with_void_y(mut self, void_y: f32) -> Self {
        self.void_y = void_y;
        self
    }

    /// Check that the parameters keep integration stable.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("walk_speed", self.walk_speed),
            ("sneak_multiplier", self.sneak_multiplier),
            ("eye_height", self.eye_height),
            ("void_y", self.void_y),
            ("placement_margin", self.placement_margin),
            ("footstep_interval", self.footstep_interval),
            ("footstep_min_speed", self.footstep_min_speed),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::Config(format!("{name} must be finite, got {value}")));
            }
        }
        if !self.spawn.is_finite() {
            return Err(Error::Config(format!("spawn must be finite, got {}", self.spawn)));
        }

        let positive = [
            ("half_width", self.half_width),
            ("height", self.height),
            ("max_fall_speed", self.max_fall_speed),
            ("max_frame_dt", self.max_frame_dt),
            ("substep", self.substep),
            ("ground_probe", self.ground_probe),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("jump_impulse", self.jump_impulse),
            ("walk_speed", self.walk_speed),
            ("placement_margin", self.placement_margin),
            ("footstep_interval", self.footstep_interval),
            ("footstep_min_speed", self.footstep_min_speed),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(Error::Config(format!("{name} must not be negative, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.sneak_multiplier) {
            return Err(Error::Config(format!(
                "sneak_multiplier must be within 0..=1, got {}",
                self.sneak_multiplier
            )));
        }
        if self.gravity > 0.0 {
            return Err(Error::Config(format!(
                "gravity must point down, got {}",
                self.gravity
            )));
        }
        // A sub-step must never move the body a full block, or it could pass through one.
        let fastest = self.max_fall_speed.max(self.jump_impulse).max(self.walk_speed);
        if fastest * self.substep >= 1.0 {
            return Err(Error::Config(format!(
                "speed {fastest} covers a whole block in one {}s sub-step",
                self.substep
            )));
        }
        if self.void_y >= self.spawn.y {
            return Err(Error::Config(format!(
                "void_y {} must be below the spawn height {}",
                self.void_y, self.spawn.y
            )));
        }
        Ok(())
    }
}
