//! Winning line analysis for Tic-Tac-Toe

use super::{Cell, Mark};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if a mark holds three in a row
    pub fn has_won(cells: &[Cell; 9], mark: Mark) -> bool {
        Self::winning_line(cells, mark).is_some()
    }

    /// The first line completed by `mark`, in [`WINNING_LINES`] order
    pub fn winning_line(cells: &[Cell; 9], mark: Mark) -> Option<[usize; 3]> {
        let target = mark.to_cell();
        WINNING_LINES
            .iter()
            .copied()
            .find(|line| line.iter().all(|&idx| cells[idx] == target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_won_horizontal() {
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::Player;
        cells[1] = Cell::Player;
        cells[2] = Cell::Player;

        assert!(LineAnalyzer::has_won(&cells, Mark::Player));
        assert!(!LineAnalyzer::has_won(&cells, Mark::Opponent));
    }

    #[test]
    fn test_has_won_vertical() {
        let mut cells = [Cell::Empty; 9];
        cells[1] = Cell::Opponent;
        cells[4] = Cell::Opponent;
        cells[7] = Cell::Opponent;

        assert!(LineAnalyzer::has_won(&cells, Mark::Opponent));
        assert!(!LineAnalyzer::has_won(&cells, Mark::Player));
    }

    #[test]
    fn test_has_won_anti_diagonal() {
        let mut cells = [Cell::Empty; 9];
        cells[2] = Cell::Player;
        cells[4] = Cell::Player;
        cells[6] = Cell::Player;

        assert_eq!(
            LineAnalyzer::winning_line(&cells, Mark::Player),
            Some([2, 4, 6])
        );
    }

    #[test]
    fn test_every_line_wins_for_both_marks() {
        for line in WINNING_LINES {
            for mark in [Mark::Player, Mark::Opponent] {
                let mut cells = [Cell::Empty; 9];
                for idx in line {
                    cells[idx] = mark.to_cell();
                }
                assert!(LineAnalyzer::has_won(&cells, mark), "line {line:?}");
                assert!(!LineAnalyzer::has_won(&cells, mark.opponent()));
            }
        }
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::Player;
        cells[1] = Cell::Opponent;
        cells[2] = Cell::Player;

        assert_eq!(LineAnalyzer::winning_line(&cells, Mark::Player), None);
    }
}
