//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the match engine and its
//! collaborators. Following hexagonal architecture, these traits are owned by the
//! domain and implemented by adapters.

pub mod ledger;
pub mod observer;
pub mod opponent;

pub use ledger::PointsLedger;
pub use observer::MatchObserver;
pub use opponent::Opponent;
