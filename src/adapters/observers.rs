//! Observer adapters

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    engine::EndReason,
    ports::{MatchObserver, PointsLedger},
    rewards::Award,
    tictactoe::{Board, Mark},
    types::{Generation, UserId},
};

/// Forwards cumulative awards to a ledger under one user id
pub struct LedgerObserver {
    ledger: Arc<dyn PointsLedger + Send + Sync>,
    user: UserId,
    credited: u64,
}

impl LedgerObserver {
    pub fn new(ledger: Arc<dyn PointsLedger + Send + Sync>, user: UserId) -> Self {
        Self {
            ledger,
            user,
            credited: 0,
        }
    }

    /// Points this observer has credited so far
    pub fn credited(&self) -> u64 {
        self.credited
    }
}

impl MatchObserver for LedgerObserver {
    fn on_points(&mut self, generation: Generation, award: Award) -> Result<()> {
        let points = award.cumulative_points();
        if points == 0 {
            return Ok(());
        }
        let balance = self.ledger.credit(&self.user, points)?;
        self.credited += u64::from(points);
        info!(%generation, user = %self.user, points, balance, "credited points");
        Ok(())
    }
}

/// One recorded engine notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    Opened {
        generation: Generation,
        seconds: u32,
        restart: bool,
    },
    MarkPlaced {
        generation: Generation,
        mark: Mark,
        cell: usize,
        board: Board,
    },
    Tick {
        generation: Generation,
        seconds_remaining: u32,
    },
    Points {
        generation: Generation,
        award: Award,
    },
    Ended {
        generation: Generation,
        reason: EndReason,
    },
    Closed {
        generation: Generation,
    },
    PopupSkipped,
}

/// Records every notification; clones share the same log.
///
/// Useful for presentation layers that drain events once per frame, and for
/// tests.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<MatchEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<MatchEvent> {
        self.lock().clone()
    }

    /// Take everything recorded so far, leaving the log empty
    pub fn drain(&self) -> Vec<MatchEvent> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn push(&self, event: MatchEvent) -> Result<()> {
        self.lock().push(event);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MatchEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MatchObserver for EventLog {
    fn on_match_open(
        &mut self,
        generation: Generation,
        seconds: u32,
        restart: bool,
    ) -> Result<()> {
        self.push(MatchEvent::Opened {
            generation,
            seconds,
            restart,
        })
    }

    fn on_mark_placed(
        &mut self,
        generation: Generation,
        mark: Mark,
        cell: usize,
        board: &Board,
    ) -> Result<()> {
        self.push(MatchEvent::MarkPlaced {
            generation,
            mark,
            cell,
            board: *board,
        })
    }

    fn on_tick(&mut self, generation: Generation, seconds_remaining: u32) -> Result<()> {
        self.push(MatchEvent::Tick {
            generation,
            seconds_remaining,
        })
    }

    fn on_points(&mut self, generation: Generation, award: Award) -> Result<()> {
        self.push(MatchEvent::Points { generation, award })
    }

    fn on_match_end(&mut self, generation: Generation, reason: EndReason) -> Result<()> {
        self.push(MatchEvent::Ended { generation, reason })
    }

    fn on_match_close(&mut self, generation: Generation) -> Result<()> {
        self.push(MatchEvent::Closed { generation })
    }

    fn on_popup_skipped(&mut self) -> Result<()> {
        self.push(MatchEvent::PopupSkipped)
    }
}
