//! xo-break: pop-up tic-tac-toe matches as timed breaks
//!
//! This crate provides:
//! - Tic-Tac-Toe board with win and draw detection
//! - Match engine with a countdown, a computer opponent and automatic restarts
//! - Pop-up scheduler that opens at most one match at a time
//! - Reward points per match and a durable points ledger
//! - Virtual clock so every timed behavior runs deterministically

pub mod adapters;
pub mod app;
pub mod cli;
pub mod engine;
pub mod error;
pub mod ports;
pub mod rewards;
pub mod tictactoe;
pub mod timeline;
pub mod types;

pub use engine::{EngineConfig, MatchEngine, MatchPhase, MatchSnapshot};
pub use error::{Error, Result};
pub use tictactoe::{Board, Cell, GameOutcome, Mark};
