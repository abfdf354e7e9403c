//! Command-line options.

use std::str::FromStr;

use anyhow::{bail, Context};
use cubeland_app::{AppConfig, BlockKind, SessionConfig};
use cubeland_world::TerrainConfig;

/// Parsed sandbox options.
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxArgs {
    pub seconds: f32,
    pub fps: u32,
    pub walk: bool,
    pub jump_every: Option<f32>,
    pub build_every: Option<f32>,
    pub block: BlockKind,
    pub turn_rate: f32,
    pub half_extent: i32,
}

impl Default for SandboxArgs {
    fn default() -> Self {
        Self {
            seconds: 10.0,
            fps: 60,
            walk: false,
            jump_every: None,
            build_every: None,
            block: AppConfig::default().build_block,
            turn_rate: 0.0,
            half_extent: TerrainConfig::default().half_extent,
        }
    }
}

impl SandboxArgs {
    /// Parse options, excluding the program name.
    pub fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seconds" => parsed.seconds = value(&arg, args.next())?,
                "--fps" => parsed.fps = value(&arg, args.next())?,
                "--walk" => parsed.walk = true,
                "--jump-every" => parsed.jump_every = Some(value(&arg, args.next())?),
                "--build-every" => parsed.build_every = Some(value(&arg, args.next())?),
                "--block" => parsed.block = block(args.next())?,
                "--turn-rate" => parsed.turn_rate = value(&arg, args.next())?,
                "--half-extent" => parsed.half_extent = value(&arg, args.next())?,
                other => bail!("unknown option '{other}' (try --help)"),
            }
        }
        Ok(parsed)
    }

    /// Build the runner configuration.
    pub fn into_config(self) -> AppConfig {
        let terrain = TerrainConfig::default().with_half_extent(self.half_extent);
        let mut config = AppConfig::new("Cubeland Sandbox")
            .with_session(SessionConfig::default().with_terrain(terrain))
            .with_tick_rate(self.fps)
            .with_duration(self.seconds)
            .with_walk(self.walk)
            .with_build_block(self.block)
            .with_turn_rate(self.turn_rate);
        config.jump_every = self.jump_every;
        config.build_every = self.build_every;
        config
    }
}

fn value<T>(flag: &str, raw: Option<String>) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = raw.with_context(|| format!("{flag} needs a value"))?;
    raw.parse()
        .with_context(|| format!("invalid value '{raw}' for {flag}"))
}

fn block(raw: Option<String>) -> anyhow::Result<BlockKind> {
    let raw = raw.context("--block needs a value")?;
    BlockKind::from_name(&raw).with_context(|| {
        let names: Vec<_> = BlockKind::ALL.iter().map(|kind| kind.name()).collect();
        format!("unknown block '{raw}', expected one of: {}", names.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> anyhow::Result<SandboxArgs> {
        SandboxArgs::parse(line.split_whitespace().map(ToString::to_string))
    }

    #[test]
    fn defaults() {
        assert_eq!(parse("").unwrap(), SandboxArgs::default());
    }

    #[test]
    fn all_options() {
        let args = parse(
            "--seconds 3.5 --fps 30 --walk --jump-every 0.8 --build-every 2 \
             --block stone --turn-rate -15 --half-extent 8",
        )
        .unwrap();
        assert_eq!(
            args,
            SandboxArgs {
                seconds: 3.5,
                fps: 30,
                walk: true,
                jump_every: Some(0.8),
                build_every: Some(2.0),
                block: BlockKind::Stone,
                turn_rate: -15.0,
                half_extent: 8,
            }
        );

        let config = args.into_config();
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.session.terrain.half_extent, 8);
        assert_eq!(config.jump_every, Some(0.8));
        assert_eq!(config.build_block, BlockKind::Stone);
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(parse("--fps").is_err());
        assert!(parse("--fps fast").is_err());
        assert!(parse("--fly").is_err());
        assert!(parse("--block lava").is_err());
        assert!(parse("--block").is_err());
    }

    #[test]
    fn oversized_world_is_an_error() {
        let config = parse("--half-extent 2000000000").unwrap().into_config();
        assert!(cubeland_app::run_headless(&config).is_err());
    }
}
