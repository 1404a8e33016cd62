//! Results reported by engine operations

use serde::{Deserialize, Serialize};

use crate::{
    rewards::Award,
    tictactoe::{GameOutcome, Mark},
    types::Generation,
};

/// Why a match stopped accepting moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// A side completed a line
    Won(Mark),
    /// The board filled up with no line
    Draw,
    /// The countdown reached zero with `filled_cells` marks on the board
    TimedOut { filled_cells: usize },
}

impl From<GameOutcome> for EndReason {
    fn from(outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::Win(mark) => EndReason::Won(mark),
            GameOutcome::Draw => EndReason::Draw,
        }
    }
}

impl EndReason {
    /// Toast-style message for the end of a match
    pub fn message(&self, cumulative_points: u32) -> String {
        match self {
            EndReason::Won(Mark::Player) => "You win!".to_string(),
            EndReason::Won(Mark::Opponent) => "AI wins!".to_string(),
            EndReason::Draw => "It's a draw!".to_string(),
            EndReason::TimedOut { .. } => {
                format!("Game ended! You earned {cumulative_points} points!")
            }
        }
    }
}

/// What a successful move did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// Match the move belongs to
    pub generation: Generation,
    /// Side that moved
    pub mark: Mark,
    /// Cell that was marked
    pub cell: usize,
    /// Points awarded for the move itself
    pub award: Option<Award>,
    /// Set when the move finished the board
    pub outcome: Option<GameOutcome>,
}

impl MoveReport {
    /// True when the move ended the match
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}
