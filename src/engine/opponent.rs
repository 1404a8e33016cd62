//! Opponent implementations

use std::collections::VecDeque;

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{Error, Result, ports::Opponent, tictactoe::Board};

/// Uniformly random opponent with no look-ahead
pub struct RandomOpponent {
    name: String,
    rng: StdRng,
}

impl RandomOpponent {
    /// Create a new random opponent
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a new random opponent with a deterministic seed
    pub fn with_seed(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Opponent for RandomOpponent {
    fn select_cell(&mut self, board: &Board) -> Result<usize> {
        let cells = board.empty_positions();
        if cells.is_empty() {
            return Err(Error::NoEmptyCells);
        }
        let index = self.rng.random_range(0..cells.len());
        Ok(cells[index])
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

/// Opponent that replays a fixed list of cells.
///
/// Cells that are already taken are skipped; once the script runs out it
/// takes the lowest empty cell. Used for reproducible matches.
pub struct ScriptedOpponent {
    script: VecDeque<usize>,
}

impl ScriptedOpponent {
    pub fn new(cells: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: cells.into_iter().collect(),
        }
    }
}

impl Opponent for ScriptedOpponent {
    fn select_cell(&mut self, board: &Board) -> Result<usize> {
        while let Some(cell) = self.script.pop_front() {
            if cell < 9 && board.is_empty(cell) {
                return Ok(cell);
            }
        }
        board
            .empty_positions()
            .first()
            .copied()
            .ok_or(Error::NoEmptyCells)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
