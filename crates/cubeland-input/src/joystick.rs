//! Analog stick intent source for touch screens and gamepads.

use glam::Vec2;

use crate::intent::{BlockAction, LookDelta, MoveFlags, MoveIntent};

/// Turns a movement stick, a look stick and buttons into a [`MoveIntent`].
///
/// Stick axes are in `-1..=1` with `y` pointing forward (movement) or up
/// (look). Deflection inside the dead zone reads as centered.
#[derive(Debug, Clone)]
pub struct JoystickSource {
    movement: Vec2,
    look: Vec2,
    buttons: MoveFlags,
    action: Option<BlockAction>,
    /// Deflection below which a stick reads as centered.
    pub dead_zone: f32,
    /// Camera rotation at full look deflection, in degrees per second.
    pub look_rate: f32,
}

impl Default for JoystickSource {
    fn default() -> Self {
        Self {
            movement: Vec2::ZERO,
            look: Vec2::ZERO,
            buttons: MoveFlags::empty(),
            action: None,
            dead_zone: 0.2,
            look_rate: 120.0,
        }
    }
}

impl JoystickSource {
    /// Create a centered source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the movement stick.
    pub fn set_movement(&mut self, stick: Vec2) {
        self.movement = stick.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Update the look stick.
    pub fn set_look(&mut self, stick: Vec2) {
        self.look = stick.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Set whether the jump button is held.
    pub fn set_jump(&mut self, held: bool) {
        self.buttons.set(MoveFlags::JUMP, held);
    }

    /// Set whether the sneak button is held.
    pub fn set_sneak(&mut self, held: bool) {
        self.buttons.set(MoveFlags::SNEAK, held);
    }

    /// Queue a one-shot block action for the next [`intent`](Self::intent).
    pub fn trigger(&mut self, action: BlockAction) {
        self.action.get_or_insert(action);
    }

    /// Return every stick to center and release all buttons.
    pub fn reset(&mut self) {
        self.movement = Vec2::ZERO;
        self.look = Vec2::ZERO;
        self.buttons = MoveFlags::empty();
        self.action = None;
    }

    /// The intent for a frame of `dt` seconds. Consumes any queued action.
    pub fn intent(&mut self, dt: f32) -> MoveIntent {
        let mut movement = self.buttons;
        let stick = self.movement;
        if stick.x > self.dead_zone {
            movement |= MoveFlags::RIGHT;
        } else if stick.x < -self.dead_zone {
            movement |= MoveFlags::LEFT;
        }
        if stick.y > self.dead_zone {
            movement |= MoveFlags::FORWARD;
        } else if stick.y < -self.dead_zone {
            movement |= MoveFlags::BACKWARD;
        }

        let look = if self.look.length() > self.dead_zone {
            let turn = self.look * self.look_rate * dt;
            LookDelta::new(turn.x, turn.y)
        } else {
            LookDelta::default()
        };

        MoveIntent {
            movement,
            action: self.action.take(),
            look,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeland_core::BlockKind;

    #[test]
    fn centered_stick_is_idle() {
        let mut stick = JoystickSource::new();
        stick.set_movement(Vec2::new(0.1, -0.15));
        stick.set_look(Vec2::new(0.05, 0.0));
        assert_eq!(stick.intent(0.1), MoveIntent::default());
    }

    #[test]
    fn deflection_maps_to_directions() {
        let mut stick = JoystickSource::new();
        stick.set_movement(Vec2::new(-0.8, 0.6));
        assert_eq!(
            stick.intent(0.1).movement,
            MoveFlags::LEFT | MoveFlags::FORWARD
        );

        stick.set_movement(Vec2::new(0.5, -1.0));
        assert_eq!(
            stick.intent(0.1).movement,
            MoveFlags::RIGHT | MoveFlags::BACKWARD
        );
    }

    #[test]
    fn buttons_and_actions() {
        let mut stick = JoystickSource::new();
        stick.set_jump(true);
        stick.trigger(BlockAction::Place(BlockKind::Stone));
        stick.trigger(BlockAction::Break);

        let first = stick.intent(0.1);
        assert!(first.movement.jump());
        assert_eq!(first.action, Some(BlockAction::Place(BlockKind::Stone)));

        let second = stick.intent(0.1);
        assert!(second.movement.jump());
        assert_eq!(second.action, None);

        stick.reset();
        assert_eq!(stick.intent(0.1), MoveIntent::default());
    }

    #[test]
    fn look_scales_with_time() {
        let mut stick = JoystickSource::new();
        stick.set_look(Vec2::new(1.0, -0.5));
        let look = stick.intent(0.5).look;
        assert!((look.yaw_degrees - 60.0).abs() < 1e-4);
        assert!((look.pitch_degrees + 30.0).abs() < 1e-4);
    }

    #[test]
    fn merges_with_other_sources() {
        let mut stick = JoystickSource::new();
        stick.set_movement(Vec2::Y);
        let keyboard = MoveIntent::moving(MoveFlags::SNEAK);
        let merged = MoveIntent::combine([keyboard, stick.intent(0.1)]);
        assert_eq!(merged.movement, MoveFlags::FORWARD | MoveFlags::SNEAK);
    }
}
