//! Adapters implementing domain ports.
//!
//! This module contains infrastructure implementations of the traits defined
//! in the ports module. Following hexagonal architecture, adapters depend on
//! domain ports, not the other way around.

pub mod in_memory_ledger;
pub mod json_ledger;
pub mod observers;

pub use in_memory_ledger::InMemoryLedger;
pub use json_ledger::JsonFileLedger;
pub use observers::{EventLog, LedgerObserver, MatchEvent};
