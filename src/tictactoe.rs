//! Tic-Tac-Toe board and rules

pub mod board;
pub mod lines;

pub use board::{Board, Cell, GameOutcome, Mark};
pub use lines::{LineAnalyzer, WINNING_LINES};
