//! Scripted game replay.
//!
//! Loads a list of moves from a TOML script, plays them through
//! [`chess_engine::Game`] and writes every emitted event as text or JSON lines.

pub mod config;
pub mod replay;

pub use config::{ConfigError, OutputFormat, ReplayConfig, ScriptedMove};
pub use replay::{run, write_event, Replay, ReplayError, Summary};
