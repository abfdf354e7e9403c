//! Session configuration.

use cubeland_core::{Error, Result};
use cubeland_physics::PhysicsConfig;
use cubeland_world::TerrainConfig;
use serde::{Deserialize, Serialize};

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// World generation.
    pub terrain: TerrainConfig,
    /// Player body and movement.
    pub physics: PhysicsConfig,
    /// Farthest block the crosshair can target.
    pub reach: f32,
    /// Largest pitch magnitude in degrees.
    pub max_pitch_degrees: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            physics: PhysicsConfig::default(),
            reach: 5.0,
            max_pitch_degrees: 89.0,
        }
    }
}

impl SessionConfig {
    /// Set the terrain configuration.
    #[must_use]
    pub fn with_terrain(mut self, terrain: TerrainConfig) -> Self {
        self.terrain = terrain;
        self
    }

    /// Set the physics configuration.
    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    /// Set the block targeting reach.
    #[must_use]
    pub const fn with_reach(mut self, reach: f32) -> Self {
        self.reach = reach;
        self
    }

    /// Check every nested configuration.
    pub fn validate(&self) -> Result<()> {
        self.terrain.validate()?;
        self.physics.validate()?;
        if !(self.reach.is_finite() && self.reach > 0.0) {
            return Err(Error::Config(format!(
                "reach must be positive, got {}",
                self.reach
            )));
        }
        if !(self.max_pitch_degrees > 0.0 && self.max_pitch_degrees < 90.0) {
            return Err(Error::Config(format!(
                "max_pitch_degrees must be in (0, 90), got {}",
                self.max_pitch_degrees
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn nested_errors_surface() {
        let config = SessionConfig::default()
            .with_terrain(TerrainConfig::default().with_half_extent(-1));
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = SessionConfig::default().with_reach(0.0);
        assert!(config.validate().is_err());

        let config = SessionConfig {
            max_pitch_degrees: 90.0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
