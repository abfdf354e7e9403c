//! Gameplay events for audio and other fire-and-forget listeners.

use serde::{Deserialize, Serialize};

/// A discrete notification. Carries no payload beyond its kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    /// A block was added to the world.
    BlockPlaced,
    /// A block was removed from the world.
    BlockRemoved,
    /// The player left the ground with a jump.
    JumpStarted,
    /// The player took a step while walking on the ground.
    Footstep,
    /// The player fell into the void and was returned to spawn.
    Respawned,
}

/// Events produced during a frame, in emission order.
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event.
    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn as_slice(&self) -> &[GameEvent] {
        &self.events
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Count pending events of one kind.
    #[must_use]
    pub fn count(&self, event: GameEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }

    /// Take all pending events, keeping the allocation for the next frame.
    pub fn drain(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Discard all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
