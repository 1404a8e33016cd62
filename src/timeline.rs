//! Virtual clock with cancellable deferred tasks.
//!
//! The engine never sleeps. Every delayed action (countdown ticks, the opponent's
//! reply, automatic restarts, pop-up ticks) is an entry on a [`Timeline`], and a
//! driver moves time forward with [`Timeline::pop_due`]. Entries fire in due-time
//! order; entries due at the same instant fire in the order they were scheduled.

use std::{collections::BTreeMap, time::Duration};

/// Handle to a scheduled entry, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    due: Duration,
    seq: u64,
}

impl TaskId {
    /// Time at which the entry fires
    pub fn due(&self) -> Duration {
        self.due
    }
}

/// An entry taken off the timeline because its time has come
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub id: TaskId,
    pub task: T,
}

/// Ordered queue of deferred tasks over a monotonic virtual clock
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<TaskId, T>,
}

impl<T> Timeline<T> {
    /// Create an empty timeline at time zero
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BTreeMap::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to fire `delay` after the current time
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskId {
        let id = TaskId {
            due: self.now.saturating_add(delay),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.queue.insert(id, task);
        id
    }

    /// Cancel a pending entry. Returns the task if it had not fired yet.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        self.queue.remove(&id)
    }

    /// Cancel every pending entry matching `predicate`, returning how many were removed
    pub fn cancel_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.queue.len();
        self.queue.retain(|_, task| !predicate(task));
        before - self.queue.len()
    }

    /// Check whether an entry is still pending
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.queue.contains_key(&id)
    }

    /// Number of pending entries
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Iterate pending tasks in firing order
    pub fn pending_tasks(&self) -> impl Iterator<Item = &T> {
        self.queue.values()
    }

    /// Due time of the earliest pending entry
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(TaskId::due)
    }

    /// Take the earliest entry due at or before `until`.
    ///
    /// The clock jumps to the entry's due time so that anything scheduled while
    /// handling it is measured from the moment it fired. Returns `None` once no
    /// entry is due; call [`Timeline::settle`] afterwards to land on `until`.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<T>> {
        let (&id, _) = self.queue.iter().next()?;
        if id.due > until {
            return None;
        }
        let task = self.queue.remove(&id)?;
        self.now = self.now.max(id.due);
        Some(Fired { id, task })
    }

    /// Move the clock forward to `until`. The clock never runs backwards.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}
