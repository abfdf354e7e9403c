//! Headless runner: drives a session from a scripted input source.

use std::time::Instant;

use cubeland_core::BlockKind;
use cubeland_input::{BlockAction, LookDelta, MoveFlags, MoveIntent};
use glam::Vec3;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::SessionConfig;
use crate::session::{Session, SessionStats};

/// Something that produces a [`MoveIntent`] every frame.
pub trait IntentSource {
    /// Intent for the frame starting at `time` seconds and lasting `dt`.
    fn intent(&mut self, time: f32, dt: f32, session: &Session) -> MoveIntent;
}

impl<F> IntentSource for F
where
    F: FnMut(f32, f32, &Session) -> MoveIntent,
{
    fn intent(&mut self, time: f32, dt: f32, session: &Session) -> MoveIntent {
        self(time, dt, session)
    }
}

/// Headless run configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Name used in log lines.
    pub title: String,
    /// World and player setup.
    pub session: SessionConfig,
    /// Simulated frames per second.
    pub tick_rate: u32,
    /// Simulated run length in seconds.
    pub duration: f32,
    /// Hold forward for the whole run.
    pub walk: bool,
    /// Jump on this period in seconds.
    pub jump_every: Option<f32>,
    /// Alternately place and break a block at the crosshair on this period in seconds.
    pub build_every: Option<f32>,
    /// Kind placed while building.
    pub build_block: BlockKind,
    /// Turn at this rate in degrees per second.
    pub turn_rate: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Cubeland".to_string(),
            session: SessionConfig::default(),
            tick_rate: 60,
            duration: 10.0,
            walk: false,
            jump_every: None,
            build_every: None,
            build_block: BlockKind::Wood,
            turn_rate: 0.0,
        }
    }
}

impl AppConfig {
    /// Create a new config with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the session configuration.
    #[must_use]
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Set the simulated frame rate.
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Set the run length.
    #[must_use]
    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    /// Walk forward for the whole run.
    #[must_use]
    pub fn with_walk(mut self, walk: bool) -> Self {
        self.walk = walk;
        self
    }

    /// Jump periodically.
    #[must_use]
    pub fn with_jump_every(mut self, seconds: f32) -> Self {
        self.jump_every = Some(seconds);
        self
    }

    /// Place and break blocks periodically.
    #[must_use]
    pub fn with_build_every(mut self, seconds: f32) -> Self {
        self.build_every = Some(seconds);
        self
    }

    /// Set the kind placed while building.
    #[must_use]
    pub const fn with_build_block(mut self, kind: BlockKind) -> Self {
        self.build_block = kind;
        self
    }

    /// Turn steadily while running.
    #[must_use]
    pub fn with_turn_rate(mut self, degrees_per_second: f32) -> Self {
        self.turn_rate = degrees_per_second;
        self
    }

    fn frame_dt(&self) -> anyhow::Result<f32> {
        anyhow::ensure!(self.tick_rate > 0, "tick rate must be positive");
        anyhow::ensure!(
            self.duration.is_finite() && self.duration >= 0.0,
            "duration must be non-negative, got {}",
            self.duration
        );
        Ok(1.0 / self.tick_rate as f32)
    }
}

/// The built-in script: optional walk, periodic jumps, a steady turn, and
/// blocks alternately placed and broken at the crosshair.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    walk: bool,
    jump_every: Option<f32>,
    build_every: Option<f32>,
    build_block: BlockKind,
    turn_rate: f32,
    next_jump: f32,
    next_build: f32,
    builds: u32,
    aimed: bool,
}

impl ScriptedInput {
    /// Pitch used to aim at the ground ahead when building.
    const BUILD_PITCH_DEGREES: f32 = -35.0;

    /// Script the behaviour requested by `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        let build_every = config.build_every.filter(|period| *period > 0.0);
        Self {
            walk: config.walk,
            jump_every: config.jump_every.filter(|period| *period > 0.0),
            build_every,
            build_block: config.build_block,
            turn_rate: config.turn_rate,
            next_jump: 0.0,
            next_build: build_every.unwrap_or(0.0),
            builds: 0,
            aimed: false,
        }
    }
}

impl IntentSource for ScriptedInput {
    fn intent(&mut self, time: f32, dt: f32, session: &Session) -> MoveIntent {
        let mut movement = MoveFlags::empty();
        if self.walk {
            movement |= MoveFlags::FORWARD;
        }
        if let Some(period) = self.jump_every {
            if time >= self.next_jump && session.player().is_grounded() {
                movement |= MoveFlags::JUMP;
                self.next_jump = time + period;
            }
        }

        let mut look = LookDelta::new(self.turn_rate * dt, 0.0);
        let mut action = None;
        if let Some(period) = self.build_every {
            if !self.aimed {
                look.pitch_degrees += Self::BUILD_PITCH_DEGREES;
                self.aimed = true;
            }
            if time >= self.next_build {
                action = Some(if self.builds % 2 == 0 {
                    BlockAction::Place(self.build_block)
                } else {
                    BlockAction::Break
                });
                self.builds += 1;
                self.next_build += period;
            }
        }

        MoveIntent {
            movement,
            action,
            look,
        }
    }
}

/// What a headless run ended with.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Session totals.
    pub stats: SessionStats,
    /// Player feet position after the last frame.
    pub final_position: Vec3,
    /// Whether the player ended on the ground.
    pub grounded: bool,
    /// Occupied cells at the end.
    pub blocks: usize,
    /// Store version at the end.
    pub version: u64,
}

/// Install the global `tracing` subscriber, reading `RUST_LOG` (default `info`).
///
/// Does nothing if a subscriber is already installed.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let result = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    if result.is_err() {
        warn!("Logging already initialized");
    }
}

/// Run a session for `config.duration` simulated seconds with the built-in script.
pub fn run_headless(config: &AppConfig) -> anyhow::Result<RunSummary> {
    let mut script = ScriptedInput::from_config(config);
    run_with(config, &mut script)
}

/// Run a session for `config.duration` simulated seconds driven by `source`.
pub fn run_with(config: &AppConfig, source: &mut impl IntentSource) -> anyhow::Result<RunSummary> {
    let dt = config.frame_dt()?;
    let frames = (config.duration * config.tick_rate as f32).round() as u64;

    info!("{} starting: {} frames at {} Hz", config.title, frames, config.tick_rate);
    let started = Instant::now();
    let mut session = Session::new(config.session.clone())?;

    for frame in 0..frames {
        let time = frame as f32 * dt;
        let intent = source.intent(time, dt, &session);
        session.tick(dt, &intent)?;
    }

    let player = session.player();
    let summary = RunSummary {
        stats: *session.stats(),
        final_position: player.position(),
        grounded: player.is_grounded(),
        blocks: session.store().len(),
        version: session.store().version(),
    };
    info!(
        "{} finished in {:.2?}: {} frames, player at {:?}, {} jumps, {} footsteps, \
         {} respawns, {} placed, {} removed",
        config.title,
        started.elapsed(),
        summary.stats.frames,
        summary.final_position,
        summary.stats.jumps,
        summary.stats.footsteps,
        summary.stats.respawns,
        summary.stats.blocks_placed,
        summary.stats.blocks_removed,
    );
    Ok(summary)
}
