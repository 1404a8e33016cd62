//! Pop-up match engine: tic-tac-toe matches against a computer opponent, run
//! against a countdown, opened periodically by a scheduler and paid out in
//! reward points.

pub mod config;
pub mod events;
pub mod match_engine;
pub mod opponent;
pub mod scheduler;
pub mod state;

pub use config::{
    DEFAULT_CLOSE_DELAY, DEFAULT_INTERVAL_MINUTES, DEFAULT_MATCH_SECONDS, DEFAULT_OPPONENT_DELAY,
    DEFAULT_RESET_DELAY, EngineConfig,
};
pub use events::{EndReason, MoveReport};
pub use match_engine::MatchEngine;
pub use opponent::{RandomOpponent, ScriptedOpponent};
pub use scheduler::{PopupScheduler, TickDecision};
pub use state::{MatchPhase, MatchSnapshot, MatchState, ScoreTally};
