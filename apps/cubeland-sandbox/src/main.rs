//! Cubeland Headless Sandbox
//!
//! Generates the island, drops the player at the spawn point and simulates a
//! scripted session for a fixed number of seconds, logging what happened.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p cubeland-sandbox -- [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `--seconds <N>`: Simulated run length (default: 10)
//! - `--fps <N>`: Simulated frames per second (default: 60)
//! - `--walk`: Hold forward for the whole run
//! - `--jump-every <SECONDS>`: Jump on this period
//! - `--build-every <SECONDS>`: Alternately place and break a block on this period
//! - `--block <NAME>`: Block kind placed while building (default: wood)
//! - `--turn-rate <DEGREES>`: Turn this many degrees per second
//! - `--half-extent <N>`: Terrain footprint half-width in blocks (default: 20)
//! - `-h, --help`: Print help message
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod args;

use cubeland_app::{init_logging, run_headless};
use tracing::info;

use crate::args::SandboxArgs;

fn main() -> anyhow::Result<()> {
    // Check for help flag before starting the run
    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    init_logging();
    let args = SandboxArgs::parse(std::env::args().skip(1))?;
    let summary = run_headless(&args.into_config())?;

    info!(
        "Final state: feet at {:?}, {}, {} blocks at version {}",
        summary.final_position,
        if summary.grounded { "grounded" } else { "airborne" },
        summary.blocks,
        summary.version
    );
    Ok(())
}

fn print_help() {
    eprintln!(
        "Cubeland Headless Sandbox

USAGE:
    cargo run -p cubeland-sandbox -- [OPTIONS]

RUN OPTIONS:
    --seconds <N>           Simulated run length in seconds (default: 10)
    --fps <N>               Simulated frames per second (default: 60)

SCRIPT OPTIONS:
    --walk                  Hold forward for the whole run
    --jump-every <SECONDS>  Jump on this period whenever grounded
    --build-every <SECONDS> Alternately place and break a block at the crosshair
    --block <NAME>          Block placed while building: grass, dirt, stone, wood, glass
    --turn-rate <DEGREES>   Turn this many degrees per second

WORLD OPTIONS:
    --half-extent <N>       Terrain footprint half-width in blocks (default: 20)

OTHER:
    -h, --help              Print this help message

EXAMPLES:
    # Drop the player and let them settle
    cargo run -p cubeland-sandbox -- --seconds 3

    # Hop around in circles
    cargo run -p cubeland-sandbox -- --walk --jump-every 0.8 --turn-rate 30

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log level (e.g., info, debug, trace)"
    );
}
