//! Ledger port for cumulative reward points.
//!
//! The engine never stores a balance. Cumulative awards are handed to a ledger
//! keyed by user, and the ledger decides where they live.

use crate::{Result, types::UserId};

/// Port for crediting and reading a user's stored point balance.
///
/// Writes are "last write wins": implementations need not merge concurrent
/// writers.
///
/// # Examples
///
/// ```
/// use xo_break::adapters::InMemoryLedger;
/// use xo_break::ports::PointsLedger;
/// use xo_break::types::UserId;
///
/// let ledger = InMemoryLedger::new();
/// let user = UserId::new("ada");
///
/// ledger.credit(&user, 10)?;
/// assert_eq!(ledger.balance(&user)?, 10);
/// # Ok::<(), xo_break::Error>(())
/// ```
pub trait PointsLedger {
    /// Add `points` to the user's balance and return the new balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read or written.
    fn credit(&self, user: &UserId, points: u32) -> Result<u64>;

    /// Current balance for the user; unknown users have a balance of zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn balance(&self, user: &UserId) -> Result<u64>;
}
