//! The per-frame movement intent and how partial intents merge.

use bitflags::bitflags;
use cubeland_core::BlockKind;
use glam::Vec2;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Held movement controls.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MoveFlags: u8 {
        /// Walk toward the camera's facing.
        const FORWARD  = 0b0000_0001;
        /// Walk away from the camera's facing.
        const BACKWARD = 0b0000_0010;
        /// Strafe left.
        const LEFT     = 0b0000_0100;
        /// Strafe right.
        const RIGHT    = 0b0000_1000;
        /// Jump when grounded.
        const JUMP     = 0b0001_0000;
        /// Walk slowly.
        const SNEAK    = 0b0010_0000;
    }
}

impl MoveFlags {
    /// Strafe on `x` (right positive) and walk on `y` (forward positive).
    ///
    /// Opposite directions held together cancel.
    #[must_use]
    pub fn wish(self) -> Vec2 {
        let held = |flag: Self| f32::from(u8::from(self.contains(flag)));
        let axis = |positive: Self, negative: Self| held(positive) - held(negative);
        Vec2::new(axis(Self::RIGHT, Self::LEFT), axis(Self::FORWARD, Self::BACKWARD))
    }

    /// Returns `true` if jump is held.
    #[inline]
    #[must_use]
    pub const fn jump(self) -> bool {
        self.contains(Self::JUMP)
    }

    /// Returns `true` if sneak is held.
    #[inline]
    #[must_use]
    pub const fn sneak(self) -> bool {
        self.contains(Self::SNEAK)
    }
}

/// A one-shot block interaction aimed at the crosshair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockAction {
    /// Put a block of this kind against the targeted face.
    Place(BlockKind),
    /// Remove the targeted block.
    Break,
}

/// Camera rotation requested this frame, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LookDelta {
    /// Positive turns right.
    pub yaw_degrees: f32,
    /// Positive looks up.
    pub pitch_degrees: f32,
}

impl LookDelta {
    /// Create a look delta.
    #[must_use]
    pub const fn new(yaw_degrees: f32, pitch_degrees: f32) -> Self {
        Self {
            yaw_degrees,
            pitch_degrees,
        }
    }

    /// Returns `true` if there is no rotation.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.yaw_degrees == 0.0 && self.pitch_degrees == 0.0
    }
}

impl std::ops::Add for LookDelta {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.yaw_degrees + rhs.yaw_degrees,
            self.pitch_degrees + rhs.pitch_degrees,
        )
    }
}

/// Everything the player asked for this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveIntent {
    /// Held movement controls.
    pub movement: MoveFlags,
    /// Block interaction, if one was triggered.
    pub action: Option<BlockAction>,
    /// Camera rotation.
    pub look: LookDelta,
}

impl MoveIntent {
    /// An intent with only movement flags.
    #[must_use]
    pub fn moving(movement: MoveFlags) -> Self {
        Self {
            movement,
            ..Self::default()
        }
    }

    /// Fold `other` into `self`: flags are OR-ed, look deltas add, and an
    /// action already present is kept.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            movement: self.movement | other.movement,
            action: self.action.or(other.action),
            look: self.look + other.look,
        }
    }

    /// Merge every intent in order, starting from an idle intent.
    pub fn combine(intents: impl IntoIterator<Item = Self>) -> Self {
        intents.into_iter().fold(Self::default(), Self::merge)
    }
}
