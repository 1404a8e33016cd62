//! Common test utilities for the xo-break test suite.
//!
//! Engines here use a scripted opponent so every match is reproducible.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use xo_break::{
    adapters::{EventLog, InMemoryLedger, LedgerObserver, MatchEvent},
    engine::{EngineConfig, MatchEngine, ScriptedOpponent},
    types::UserId,
};

/// Time the opponent takes to answer with the default configuration
pub const REPLY: Duration = Duration::from_millis(500);

/// Engine without the pop-up scheduler, plus a log of everything it reported
pub fn scripted_engine(script: &[usize]) -> (MatchEngine, EventLog) {
    engine_with_config(EngineConfig::new().with_scheduler(false), script)
}

pub fn engine_with_config(config: EngineConfig, script: &[usize]) -> (MatchEngine, EventLog) {
    let log = EventLog::new();
    let engine = MatchEngine::new(config, Box::new(ScriptedOpponent::new(script.to_vec())))
        .expect("valid configuration")
        .with_observer(Box::new(log.clone()));
    (engine, log)
}

/// Scripted engine whose cumulative awards land in `ledger` under `user`
pub fn ledger_engine(script: &[usize], ledger: &InMemoryLedger, user: &UserId) -> MatchEngine {
    let (engine, _) = scripted_engine(script);
    engine.with_observer(Box::new(LedgerObserver::new(
        Arc::new(ledger.clone()),
        user.clone(),
    )))
}

/// Advance in one-second steps
pub fn advance_secs(engine: &mut MatchEngine, seconds: u64) {
    for _ in 0..seconds {
        engine.advance(Duration::from_secs(1)).expect("advance");
    }
}

/// Number of fresh (non-restart) opens in `events`
pub fn fresh_opens(events: &[MatchEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, MatchEvent::Opened { restart: false, .. }))
        .count()
}
