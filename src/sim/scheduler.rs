//! Single-threaded timer queue
//!
//! Virtual clock in milliseconds. The host advances it; due timers are
//! handed out one at a time so every callback runs to completion before
//! the next one starts.

use std::collections::BTreeMap;

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer wakes up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Advance the spin with this id by one step
    SpinStep { spin_id: u64 },
    /// One-second auto-spin countdown tick
    AutoSpinTick,
    /// End of the winner highlight for this spin
    HighlightExpired { spin_id: u64 },
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_id: u64,
    /// Keyed by (deadline, id) so equal deadlines fire in scheduling order
    pending: BTreeMap<(u64, TimerId), TimerKind>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: u64, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((self.now_ms + delay_ms, id), kind);
        id
    }

    /// Returns true if the timer was still pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.pending.keys().find(|(_, tid)| *tid == id).copied();
        key.is_some_and(|k| self.pending.remove(&k).is_some())
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.keys().any(|(_, tid)| *tid == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to its deadline
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, TimerKind)> {
        let (&(due, id), _) = self.pending.iter().next()?;
        if due > until {
            return None;
        }
        let kind = self.pending.remove(&(due, id))?;
        self.now_ms = self.now_ms.max(due);
        Some((id, kind))
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}
