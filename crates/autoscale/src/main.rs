//! AutoScale - Headless Session Replayer
//!
//! Replays session scripts against the in-memory scene and prints what the
//! auto-apply engine did.
//!
//! ```text
//! autoscale [--config <file>] <session.toml>...
//! ```

#![warn(missing_docs)]

mod config;
mod logging_setup;
mod session;

use anyhow::{bail, Result};
use config::AppConfig;
use session::Session;
use std::path::PathBuf;
use tracing::{error, info};

const USAGE: &str = "Usage: autoscale [--config <file>] <session.toml>...";

struct Args {
    config: Option<PathBuf>,
    sessions: Vec<PathBuf>,
}

fn parse_args() -> Result<Option<Args>> {
    let mut config = None;
    let mut sessions = Vec::new();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-c" | "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => bail!("--config needs a file path"),
            },
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            other => sessions.push(PathBuf::from(other)),
        }
    }

    Ok(Some(Args { config, sessions }))
}

fn main() -> Result<()> {
    let Some(args) = parse_args()? else {
        println!("{}", USAGE);
        return Ok(());
    };
    if args.sessions.is_empty() {
        bail!("No session script given\n{}", USAGE);
    }

    let config = AppConfig::load(args.config.as_deref())?;
    let _log_guard = logging_setup::init(&config.log)?;

    info!("==========================================");
    info!("===     AutoScale Replay Started       ===");
    info!("==========================================");

    let mut failed = 0;
    for path in &args.sessions {
        let session = match Session::load(path) {
            Ok(session) => session,
            Err(e) => {
                error!("{:#}", e);
                failed += 1;
                continue;
            }
        };
        let summary = session.replay(&config.settings);
        summary.print();
        if !summary.step_errors.is_empty() {
            failed += 1;
        }
    }

    info!("Replayed {} sessions", args.sessions.len());
    if failed > 0 {
        bail!("{} of {} sessions had errors", failed, args.sessions.len());
    }
    Ok(())
}
