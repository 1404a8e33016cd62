//! Observer port - abstraction for watching a match engine
//!
//! Presentation layers, toast surfaces and the points ledger all hang off this
//! port instead of being called by the engine directly.

use crate::{
    Result,
    engine::EndReason,
    rewards::Award,
    tictactoe::{Board, Mark},
    types::Generation,
};

/// Observer trait for match lifecycle events
///
/// # Event Sequence
///
/// For each match:
/// 1. `on_match_open(generation, seconds, restart)`
/// 2. Any number of `on_mark_placed`, `on_points` and `on_tick` calls
/// 3. `on_match_end(generation, reason)` once the board finishes or time runs out
/// 4. Either another `on_match_open` with `restart = true` (automatic restart
///    after a finished board) or `on_match_close(generation)`
///
/// `on_popup_skipped` fires whenever a scheduler tick finds a match already open.
///
/// The engine finishes each transition, including the callbacks it schedules,
/// before notifying. Every observer hears every event; the first observer error
/// is returned to the caller and never leaves the match half-updated.
///
/// # Examples
///
/// ```no_run
/// use xo_break::{engine::EndReason, ports::MatchObserver, types::Generation};
///
/// struct EndCounter {
///     ended: usize,
/// }
///
/// impl MatchObserver for EndCounter {
///     fn on_match_end(
///         &mut self,
///         _generation: Generation,
///         _reason: EndReason,
///     ) -> xo_break::Result<()> {
///         self.ended += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait MatchObserver: Send {
    /// Called when a match opens, either fresh or as an automatic restart.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_match_open(
        &mut self,
        _generation: Generation,
        _seconds: u32,
        _restart: bool,
    ) -> Result<()> {
        Ok(())
    }

    /// Called after a mark is committed to the board.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_mark_placed(
        &mut self,
        _generation: Generation,
        _mark: Mark,
        _cell: usize,
        _board: &Board,
    ) -> Result<()> {
        Ok(())
    }

    /// Called once per countdown second with the time left.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_tick(&mut self, _generation: Generation, _seconds_remaining: u32) -> Result<()> {
        Ok(())
    }

    /// Called whenever points are awarded.
    ///
    /// The award's scope says whether the points count towards the match
    /// counter, the stored balance, or both.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_points(&mut self, _generation: Generation, _award: Award) -> Result<()> {
        Ok(())
    }

    /// Called when a match stops accepting moves.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_match_end(&mut self, _generation: Generation, _reason: EndReason) -> Result<()> {
        Ok(())
    }

    /// Called when a match is closed, explicitly or after a timeout.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_match_close(&mut self, _generation: Generation) -> Result<()> {
        Ok(())
    }

    /// Called when a pop-up tick is dropped because a match is already open.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_popup_skipped(&mut self) -> Result<()> {
        Ok(())
    }
}
