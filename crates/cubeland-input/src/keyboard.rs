//! Keyboard and mouse intent source.

use cubeland_core::BlockKind;
use hashbrown::{HashMap, HashSet};
use tracing::debug;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::intent::{BlockAction, LookDelta, MoveFlags, MoveIntent};

/// Key layout for movement and block selection.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    movement: HashMap<KeyCode, MoveFlags>,
    select: HashMap<KeyCode, BlockKind>,
    /// Degrees of camera rotation per pixel of mouse motion.
    pub mouse_sensitivity: f32,
}

impl Default for KeyBindings {
    /// WASD and arrows to walk, space to jump, shift to sneak, 1-5 to pick a block.
    fn default() -> Self {
        let movement = [
            (KeyCode::KeyW, MoveFlags::FORWARD),
            (KeyCode::ArrowUp, MoveFlags::FORWARD),
            (KeyCode::KeyS, MoveFlags::BACKWARD),
            (KeyCode::ArrowDown, MoveFlags::BACKWARD),
            (KeyCode::KeyA, MoveFlags::LEFT),
            (KeyCode::ArrowLeft, MoveFlags::LEFT),
            (KeyCode::KeyD, MoveFlags::RIGHT),
            (KeyCode::ArrowRight, MoveFlags::RIGHT),
            (KeyCode::Space, MoveFlags::JUMP),
            (KeyCode::ShiftLeft, MoveFlags::SNEAK),
            (KeyCode::ShiftRight, MoveFlags::SNEAK),
        ];
        let digits = [
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
        ];

        Self {
            movement: movement.into_iter().collect(),
            select: digits.into_iter().zip(BlockKind::ALL).collect(),
            mouse_sensitivity: 0.1,
        }
    }
}

impl KeyBindings {
    /// Bindings with nothing bound.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            movement: HashMap::new(),
            select: HashMap::new(),
            mouse_sensitivity: 0.1,
        }
    }

    /// Bind `key` to a movement flag. A key drives one flag; rebinding replaces it.
    #[must_use]
    pub fn bind(mut self, key: KeyCode, flag: MoveFlags) -> Self {
        self.movement.insert(key, flag);
        self
    }

    /// Bind `key` to select a block kind for placing.
    #[must_use]
    pub fn bind_select(mut self, key: KeyCode, kind: BlockKind) -> Self {
        self.select.insert(key, kind);
        self
    }

    /// Movement flag driven by `key`.
    #[must_use]
    pub fn movement(&self, key: KeyCode) -> Option<MoveFlags> {
        self.movement.get(&key).copied()
    }
}

/// Turns winit keyboard and mouse events into a [`MoveIntent`].
///
/// Movement keys are level-triggered: they count for every frame they are held.
/// Mouse clicks are edge-triggered: a click yields one action, cleared by
/// [`end_frame`](Self::end_frame).
#[derive(Debug)]
pub struct KeyboardSource {
    bindings: KeyBindings,
    held: HashSet<KeyCode>,
    selected: BlockKind,
    action: Option<BlockAction>,
    look: LookDelta,
}

impl Default for KeyboardSource {
    fn default() -> Self {
        Self::with_bindings(KeyBindings::default())
    }
}

impl KeyboardSource {
    /// Create a source with the default layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source with custom bindings.
    #[must_use]
    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            selected: BlockKind::Grass,
            action: None,
            look: LookDelta::default(),
        }
    }

    /// Process a window event. Returns `true` if the event was consumed.
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                self.process_key_event(event);
                true
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => self.click(*button),
            WindowEvent::Focused(false) => {
                self.clear();
                false
            }
            _ => false,
        }
    }

    /// Process a device event (raw mouse motion for look).
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.add_mouse_motion(delta.0 as f32, delta.1 as f32);
        }
    }

    /// Process a key event.
    pub fn process_key_event(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(key) = event.physical_key else {
            return;
        };
        match event.state {
            ElementState::Pressed if !event.repeat => self.press(key),
            ElementState::Pressed => {}
            ElementState::Released => self.release(key),
        }
    }

    /// Mark `key` as held.
    pub fn press(&mut self, key: KeyCode) {
        if let Some(&kind) = self.bindings.select.get(&key) {
            debug!("Selected {kind}");
            self.selected = kind;
        }
        self.held.insert(key);
    }

    /// Mark `key` as released.
    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Queue the action for a mouse click. Returns `true` if the button is bound.
    pub fn click(&mut self, button: MouseButton) -> bool {
        let action = match button {
            MouseButton::Left => BlockAction::Break,
            MouseButton::Right => BlockAction::Place(self.selected),
            _ => return false,
        };
        self.action.get_or_insert(action);
        true
    }

    /// Accumulate mouse motion in pixels (`dy` positive is down).
    pub fn add_mouse_motion(&mut self, dx: f32, dy: f32) {
        let sensitivity = self.bindings.mouse_sensitivity;
        self.look = self.look + LookDelta::new(dx * sensitivity, -dy * sensitivity);
    }

    /// Block kind placed by a right click.
    #[must_use]
    pub const fn selected(&self) -> BlockKind {
        self.selected
    }

    /// The intent for the current frame.
    #[must_use]
    pub fn intent(&self) -> MoveIntent {
        let movement = self
            .held
            .iter()
            .filter_map(|&key| self.bindings.movement(key))
            .fold(MoveFlags::empty(), |acc, flag| acc | flag);

        MoveIntent {
            movement,
            action: self.action,
            look: self.look,
        }
    }

    /// Drop the frame's click and mouse motion. Held keys persist.
    pub fn end_frame(&mut self) {
        self.action = None;
        self.look = LookDelta::default();
    }

    /// Forget all input, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
        self.end_frame();
    }
}
