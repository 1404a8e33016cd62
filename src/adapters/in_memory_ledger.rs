//! In-memory points ledger.
//!
//! Balances live in a shared map and vanish with the process. Used by tests
//! and by sessions that do not persist points.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, ports::PointsLedger, types::UserId};

/// In-memory ledger.
///
/// # Examples
///
/// ```
/// use xo_break::adapters::InMemoryLedger;
/// use xo_break::ports::PointsLedger;
/// use xo_break::types::UserId;
///
/// let ledger = InMemoryLedger::new();
/// let shared = ledger.clone();
///
/// ledger.credit(&UserId::new("ada"), 8)?;
/// assert_eq!(shared.balance(&UserId::new("ada"))?, 8);
/// # Ok::<(), xo_break::Error>(())
/// ```
///
/// # Thread Safety
///
/// Clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    balances: Arc<Mutex<HashMap<UserId, u64>>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a stored balance.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Remove every balance.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, u64>> {
        self.balances.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PointsLedger for InMemoryLedger {
    fn credit(&self, user: &UserId, points: u32) -> Result<u64> {
        let mut balances = self.lock();
        let balance = balances.entry(user.clone()).or_insert(0);
        *balance = balance.saturating_add(u64::from(points));
        Ok(*balance)
    }

    fn balance(&self, user: &UserId) -> Result<u64> {
        Ok(self.lock().get(user).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_accumulates() {
        let ledger = InMemoryLedger::new();
        let user = UserId::new("ada");

        assert_eq!(ledger.balance(&user).unwrap(), 0);
        assert_eq!(ledger.credit(&user, 10).unwrap(), 10);
        assert_eq!(ledger.credit(&user, 8).unwrap(), 18);
        assert_eq!(ledger.balance(&user).unwrap(), 18);
    }

    #[test]
    fn test_users_are_independent() {
        let ledger = InMemoryLedger::new();
        ledger.credit(&UserId::new("ada"), 10).unwrap();
        ledger.credit(&UserId::new("bob"), 2).unwrap();

        assert_eq!(ledger.count(), 2);
        assert_eq!(ledger.balance(&UserId::new("bob")).unwrap(), 2);

        ledger.clear();
        assert_eq!(ledger.count(), 0);
    }

    #[test]
    fn test_clone_shares_storage() {
        let ledger = InMemoryLedger::new();
        let other = ledger.clone();
        ledger.credit(&UserId::new("ada"), 5).unwrap();
        assert_eq!(other.balance(&UserId::new("ada")).unwrap(), 5);
    }
}
