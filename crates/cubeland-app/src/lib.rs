//! Game session and headless runner for the Cubeland voxel sandbox.
//!
//! A [`Session`] owns the block store, the player body and the camera. A host
//! feeds it one merged [`MoveIntent`] per frame and forwards the returned
//! [`GameEvent`]s to its audio layer.
//!
//! # Example
//!
//! ```no_run
//! use cubeland_app::{AppConfig, run_headless, init_logging};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging();
//!     let summary = run_headless(&AppConfig::new("demo").with_walk(true))?;
//!     println!("ended at {:?}", summary.final_position);
//!     Ok(())
//! }
//! ```

mod config;
mod runner;
mod session;

pub use config::SessionConfig;
pub use runner::{
    init_logging, run_headless, run_with, AppConfig, IntentSource, RunSummary, ScriptedInput,
};
pub use session::{Session, SessionStats, SharedSession};

// Re-export commonly used types for convenience
pub use cubeland_core::{BlockKind, BlockPos, GameEvent};
pub use cubeland_input::{BlockAction, LookDelta, MoveFlags, MoveIntent};
