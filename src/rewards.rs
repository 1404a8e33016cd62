//! Point table for match events.
//!
//! Session points live only as long as the current match and feed the on-screen
//! counter. Cumulative points are credited to the user's stored balance.

use serde::{Deserialize, Serialize};

use crate::tictactoe::{GameOutcome, Mark};

/// Points for each mark the player places (session only)
pub const MOVE_POINTS: u32 = 2;
/// Bonus for a player win (session and cumulative)
pub const WIN_POINTS: u32 = 10;
/// Bonus for a draw (session only)
pub const DRAW_POINTS: u32 = 5;
/// Points per filled cell when the countdown runs out (cumulative only)
pub const TIMEOUT_POINTS_PER_CELL: u32 = 2;

/// Where an award is booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointsScope {
    /// Current match counter only
    Session,
    /// Stored user balance only
    Cumulative,
    /// Both the match counter and the stored balance
    Both,
}

impl PointsScope {
    pub fn touches_session(self) -> bool {
        matches!(self, PointsScope::Session | PointsScope::Both)
    }

    pub fn touches_cumulative(self) -> bool {
        matches!(self, PointsScope::Cumulative | PointsScope::Both)
    }
}

/// A number of points and where they go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Award {
    pub points: u32,
    pub scope: PointsScope,
}

impl Award {
    pub const fn new(points: u32, scope: PointsScope) -> Self {
        Award { points, scope }
    }

    /// Points added to the match counter
    pub fn session_points(&self) -> u32 {
        if self.scope.touches_session() {
            self.points
        } else {
            0
        }
    }

    /// Points credited to the stored balance
    pub fn cumulative_points(&self) -> u32 {
        if self.scope.touches_cumulative() {
            self.points
        } else {
            0
        }
    }
}

/// Stateless reward rules
pub struct RewardPolicy;

impl RewardPolicy {
    /// Award for the player placing a mark
    pub fn for_move() -> Award {
        Award::new(MOVE_POINTS, PointsScope::Session)
    }

    /// Award for a finished board, if any. Opponent wins pay nothing.
    pub fn for_outcome(outcome: GameOutcome) -> Option<Award> {
        match outcome {
            GameOutcome::Win(Mark::Player) => Some(Award::new(WIN_POINTS, PointsScope::Both)),
            GameOutcome::Win(Mark::Opponent) => None,
            GameOutcome::Draw => Some(Award::new(DRAW_POINTS, PointsScope::Session)),
        }
    }

    /// Award when the countdown expires with `filled_cells` marks on the board
    pub fn for_timeout(filled_cells: usize) -> Award {
        let cells = u32::try_from(filled_cells).unwrap_or(u32::MAX);
        Award::new(
            cells.saturating_mul(TIMEOUT_POINTS_PER_CELL),
            PointsScope::Cumulative,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_award_is_session_only() {
        let award = RewardPolicy::for_move();
        assert_eq!(award.session_points(), 2);
        assert_eq!(award.cumulative_points(), 0);
    }

    #[test]
    fn test_outcome_awards() {
        let win = RewardPolicy::for_outcome(GameOutcome::Win(Mark::Player)).unwrap();
        assert_eq!(win.session_points(), 10);
        assert_eq!(win.cumulative_points(), 10);

        let draw = RewardPolicy::for_outcome(GameOutcome::Draw).unwrap();
        assert_eq!(draw.session_points(), 5);
        assert_eq!(draw.cumulative_points(), 0);

        assert_eq!(
            RewardPolicy::for_outcome(GameOutcome::Win(Mark::Opponent)),
            None
        );
    }

    #[test]
    fn test_timeout_award_scales_with_filled_cells() {
        let award = RewardPolicy::for_timeout(4);
        assert_eq!(award.cumulative_points(), 8);
        assert_eq!(award.session_points(), 0);

        assert_eq!(RewardPolicy::for_timeout(0).points, 0);
        assert_eq!(RewardPolicy::for_timeout(9).points, 18);
    }
}
