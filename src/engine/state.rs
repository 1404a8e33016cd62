//! Match and tally state

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::events::EndReason;
use crate::{
    tictactoe::{Board, Mark},
    types::Generation,
};

/// Lifecycle position of the engine's match slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// No match is open
    Closed,
    /// A match is open and accepting moves
    Active,
    /// A match is open but finished; it is waiting to restart or close
    Ended,
}

/// State of the one open match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub generation: Generation,
    pub board: Board,
    pub active_mark: Mark,
    pub is_active: bool,
    pub seconds_remaining: u32,
    pub session_points: u32,
    pub end_reason: Option<EndReason>,
}

impl MatchState {
    /// Fresh match: empty board, player to move, full countdown
    pub fn new(generation: Generation, duration_seconds: u32) -> Self {
        Self {
            generation,
            board: Board::new(),
            active_mark: Mark::Player,
            is_active: true,
            seconds_remaining: duration_seconds,
            session_points: 0,
            end_reason: None,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        if self.is_active {
            MatchPhase::Active
        } else {
            MatchPhase::Ended
        }
    }
}

/// Wins per side across matches, for the lifetime of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreTally {
    pub player_wins: u32,
    pub opponent_wins: u32,
}

impl ScoreTally {
    pub fn record_win(&mut self, mark: Mark) {
        match mark {
            Mark::Player => self.player_wins += 1,
            Mark::Opponent => self.opponent_wins += 1,
        }
    }
}

/// Read-only view for presentation layers that poll instead of observing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub phase: MatchPhase,
    pub generation: Option<Generation>,
    pub board: Board,
    pub active_mark: Mark,
    pub seconds_remaining: u32,
    pub session_points: u32,
    pub end_reason: Option<EndReason>,
    pub tally: ScoreTally,
    pub now: Duration,
}

impl MatchSnapshot {
    pub(crate) fn of(current: Option<&MatchState>, tally: ScoreTally, now: Duration) -> Self {
        match current {
            Some(state) => Self {
                phase: state.phase(),
                generation: Some(state.generation),
                board: state.board,
                active_mark: state.active_mark,
                seconds_remaining: state.seconds_remaining,
                session_points: state.session_points,
                end_reason: state.end_reason,
                tally,
                now,
            },
            None => Self {
                phase: MatchPhase::Closed,
                generation: None,
                board: Board::new(),
                active_mark: Mark::Player,
                seconds_remaining: 0,
                session_points: 0,
                end_reason: None,
                tally,
                now,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_state() {
        let state = MatchState::new(Generation::new(3), 30);
        assert_eq!(state.phase(), MatchPhase::Active);
        assert_eq!(state.active_mark, Mark::Player);
        assert_eq!(state.seconds_remaining, 30);
        assert_eq!(state.session_points, 0);
        assert_eq!(state.board.filled_count(), 0);
    }

    #[test]
    fn test_tally_records_wins() {
        let mut tally = ScoreTally::default();
        tally.record_win(Mark::Player);
        tally.record_win(Mark::Player);
        tally.record_win(Mark::Opponent);
        assert_eq!(tally.player_wins, 2);
        assert_eq!(tally.opponent_wins, 1);
    }

    #[test]
    fn test_closed_snapshot() {
        let snapshot = MatchSnapshot::of(None, ScoreTally::default(), Duration::ZERO);
        assert_eq!(snapshot.phase, MatchPhase::Closed);
        assert_eq!(snapshot.generation, None);
    }
}
