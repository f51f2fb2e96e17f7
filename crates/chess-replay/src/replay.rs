//! Plays a script through the engine and writes out the resulting events.

use chess_core::GeometryError;
use chess_engine::{EngineConfig, Game, GameError, GameEvent, GameStatus};
use std::io::{self, Write};
use std::sync::mpsc::Receiver;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{OutputFormat, ReplayConfig, ScriptedMove};

/// Errors that stop a replay.
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("invalid engine config: {0}")]
    Geometry(#[from] GeometryError),
    #[error("move {index} ({piece} to {to}) rejected: {source}")]
    Rejected {
        index: usize,
        piece: chess_core::PieceId,
        to: chess_core::Square,
        source: GameError,
    },
    #[error("failed to write event: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode event: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a finished replay amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub applied: usize,
    pub rejected: usize,
    pub status: GameStatus,
}

/// A game plus a channel carrying everything it emits.
pub struct Replay {
    game: Game,
    events: Receiver<GameEvent>,
}

impl Replay {
    pub fn new(config: &EngineConfig) -> Result<Self, GeometryError> {
        let mut game = Game::with_config(config)?;
        let events = game.subscribe();
        Ok(Replay { game, events })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Applies one move and returns the events it produced.
    pub fn step(&mut self, mv: &ScriptedMove) -> Result<Vec<GameEvent>, GameError> {
        self.game.apply_move(mv.piece, mv.to)?;
        Ok(self.events.try_iter().collect())
    }
}

/// Writes one event in the requested format.
pub fn write_event<W: Write>(
    out: &mut W,
    format: OutputFormat,
    event: &GameEvent,
) -> Result<(), ReplayError> {
    match format {
        OutputFormat::Text => writeln!(out, "{}", event)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(event)?)?,
    }
    Ok(())
}

/// Replays every scripted move, writing events to `out`.
///
/// Illegal moves are logged and skipped unless `stop_on_illegal` is set,
/// in which case the first one ends the replay with an error.
pub fn run<W: Write>(
    config: &ReplayConfig,
    stop_on_illegal: bool,
    out: &mut W,
) -> Result<Summary, ReplayError> {
    let mut replay = Replay::new(&config.engine)?;
    let mut applied = 0;
    let mut rejected = 0;

    for (index, mv) in config.moves.iter().enumerate() {
        match replay.step(mv) {
            Ok(events) => {
                applied += 1;
                debug!(index, piece = %mv.piece, to = %mv.to, events = events.len(), "move applied");
                for event in &events {
                    write_event(out, config.format, event)?;
                }
            }
            Err(source) if stop_on_illegal => {
                return Err(ReplayError::Rejected {
                    index,
                    piece: mv.piece,
                    to: mv.to,
                    source,
                });
            }
            Err(err) => {
                rejected += 1;
                warn!(index, piece = %mv.piece, to = %mv.to, error = %err, "skipping move");
            }
        }
    }
    out.flush()?;

    let status = replay.game().status();
    info!(applied, rejected, status = ?status, "replay finished");
    Ok(Summary {
        applied,
        rejected,
        status,
    })
}
