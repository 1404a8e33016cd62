//! Opponent port - who plays the O marks

use crate::{Result, tictactoe::Board};

/// Move source for the computer side of a match.
///
/// The engine only asks for a cell when it is the opponent's turn and the board
/// still has an empty cell; it validates the answer before committing it.
///
/// # Examples
///
/// ```
/// use xo_break::{ports::Opponent, tictactoe::Board};
///
/// struct FirstEmpty;
///
/// impl Opponent for FirstEmpty {
///     fn select_cell(&mut self, board: &Board) -> xo_break::Result<usize> {
///         board
///             .empty_positions()
///             .first()
///             .copied()
///             .ok_or(xo_break::Error::NoEmptyCells)
///     }
///
///     fn name(&self) -> &str {
///         "first-empty"
///     }
/// }
/// ```
pub trait Opponent: Send {
    /// Pick the cell (0-8) for the next O mark.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoEmptyCells`] if the board is full.
    fn select_cell(&mut self, board: &Board) -> Result<usize>;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Reseed any internal randomness.
    ///
    /// # Default Implementation
    ///
    /// Does nothing; deterministic opponents have nothing to reseed.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
