//! Movement intent for the Cubeland voxel sandbox.
//!
//! Every input device reduces to a partial [`MoveIntent`]: held direction
//! flags, at most one block action, and a look delta in degrees. A host
//! gathers the intents of all active sources each frame and folds them with
//! [`MoveIntent::combine`] before handing the result to the session.
//!
//! # Sources
//!
//! - [`KeyboardSource`]: winit keyboard and mouse events through [`KeyBindings`]
//! - [`JoystickSource`]: an on-screen or hardware analog stick with a dead zone
//!
//! # Usage
//!
//! ```ignore
//! use cubeland_input::{JoystickSource, KeyboardSource, MoveIntent};
//!
//! let mut keyboard = KeyboardSource::new();
//! let mut stick = JoystickSource::new();
//!
//! // In the window event handler
//! keyboard.process_window_event(&event);
//!
//! // Once per frame
//! let intent = MoveIntent::combine([keyboard.intent(), stick.intent(dt)]);
//! session.tick(dt, &intent)?;
//! keyboard.end_frame();
//! ```

mod intent;
mod joystick;
mod keyboard;

pub use intent::{BlockAction, LookDelta, MoveFlags, MoveIntent};
pub use joystick::JoystickSource;
pub use keyboard::{KeyBindings, KeyboardSource};

// Re-export winit types used to drive the keyboard source
pub use winit::event::{DeviceEvent, WindowEvent};
pub use winit::keyboard::KeyCode;
