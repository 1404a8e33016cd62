//! Pop-up scheduler state.
//!
//! Decides whether a periodic tick may open a match. Timing itself lives on the
//! engine's timeline; this type only holds the period and the open flag.

use std::time::Duration;

use super::config::interval_from_minutes;
use crate::Result;

/// Outcome of a scheduler tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    /// No match was open; the caller must open one now
    Open,
    /// A match is already open; the tick is dropped
    Skip,
}

/// Period and single-match guard for unattended pop-ups
#[derive(Debug, Clone, PartialEq)]
pub struct PopupScheduler {
    interval: Duration,
    match_open: bool,
    skipped: u64,
}

impl PopupScheduler {
    /// Create a scheduler with a period given in minutes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] for a non-positive or
    /// non-finite period.
    pub fn new(interval_minutes: f64) -> Result<Self> {
        Ok(Self {
            interval: interval_from_minutes(interval_minutes)?,
            match_open: false,
            skipped: 0,
        })
    }

    /// Replace the period. On error the previous period is kept.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] for a non-positive or
    /// non-finite period.
    pub fn configure(&mut self, interval_minutes: f64) -> Result<Duration> {
        self.interval = interval_from_minutes(interval_minutes)?;
        Ok(self.interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_match_open(&self) -> bool {
        self.match_open
    }

    /// Ticks dropped so far because a match was open
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped
    }

    /// Handle one periodic tick. Claims the match slot when it is free.
    ///
    /// Dropped ticks are counted but never queued.
    pub fn tick(&mut self) -> TickDecision {
        if self.match_open {
            self.skipped += 1;
            TickDecision::Skip
        } else {
            self.match_open = true;
            TickDecision::Open
        }
    }

    pub(crate) fn set_match_open(&mut self, open: bool) {
        self.match_open = open;
    }
}
