//! Chess Replay - plays a scripted game and prints its events.
//!
//! Events go to stdout, logs to stderr.

use anyhow::Context;
use chess_replay::{OutputFormat, ReplayConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

/// Replays a scripted chess game through the rules engine.
#[derive(Parser)]
#[command(name = "chess-replay")]
#[command(about = "Replays a scripted chess game and prints every event")]
struct Args {
    /// Path to the replay script
    #[arg(long, default_value = "replay.toml")]
    config: PathBuf,

    /// Print events as JSON lines, overriding the script's format
    #[arg(long)]
    json: bool,

    /// Log level, overriding the script's log_level
    #[arg(long)]
    log_level: Option<Level>,

    /// Stop at the first illegal move instead of skipping it
    #[arg(long)]
    stop_on_illegal: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ReplayConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if args.json {
        config.format = OutputFormat::Json;
    }
    let level = match args.log_level {
        Some(level) => level,
        None => config.level()?,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Script: {:?}", args.config);
    tracing::info!("Moves: {}", config.moves.len());

    let stdout = std::io::stdout();
    let summary = chess_replay::run(&config, args.stop_on_illegal, &mut stdout.lock())?;
    if summary.rejected > 0 {
        tracing::warn!("{} move(s) were rejected", summary.rejected);
    }
    Ok(())
}
