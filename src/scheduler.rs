#![warn(clippy::all, clippy::pedantic)]

//! Deterministic timers for the game controller.
//!
//! The scheduler keeps its own millisecond clock. The frame loop feeds it real
//! elapsed time, tests feed it exact amounts, and the controller drains due
//! timers with [`Scheduler::pop_due`]. Timers due at the same instant fire in
//! the order they were scheduled.

use bevy_ecs::prelude::*;
use log::trace;

/// Identifies a scheduled timer so it can be cancelled later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// What the controller should do when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// "Get Ready" delay elapsed, start the main loop
    ReadyElapsed,
    CountdownTick,
    Spawn,
    AutoMiss(Entity),
    RemoveTarget(Entity),
    RemovePopup(Entity),
}

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    due_ms: u64,
    period_ms: Option<u64>,
    kind: TimerKind,
}

#[derive(Resource, Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers still waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    /// Pending timers of the given kind.
    #[must_use]
    pub fn count_kind(&self, kind: TimerKind) -> usize {
        self.timers.iter().filter(|t| t.kind == kind).count()
    }

    pub fn schedule_once(&mut self, delay_ms: u64, kind: TimerKind) -> TimerHandle {
        self.push(delay_ms, None, kind)
    }

    /// Fires every `period_ms` until cancelled. A zero period is treated as one millisecond.
    pub fn schedule_repeating(&mut self, period_ms: u64, kind: TimerKind) -> TimerHandle {
        let period_ms = period_ms.max(1);
        self.push(period_ms, Some(period_ms), kind)
    }

    fn push(&mut self, delay_ms: u64, period_ms: Option<u64>, kind: TimerKind) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let due_ms = self.now_ms.saturating_add(delay_ms);
        trace!("Scheduling {kind:?} at {due_ms}ms ({handle:?})");
        self.timers.push(Timer {
            handle,
            due_ms,
            period_ms,
            kind,
        });
        handle
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        before != self.timers.len()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Takes the earliest timer due at or before `until_ms` and moves the clock to its due time.
    ///
    /// Repeating timers stay pending under the same handle, re-armed one period later.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerHandle, TimerKind)> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.handle))
            .map(|(i, _)| i)?;

        let due_ms = self.timers[index].due_ms;
        self.now_ms = self.now_ms.max(due_ms);

        let timer = &mut self.timers[index];
        let fired = (timer.handle, timer.kind);
        if let Some(period) = timer.period_ms {
            timer.due_ms = due_ms.saturating_add(period);
        } else {
            self.timers.swap_remove(index);
        }
        Some(fired)
    }

    /// Moves the clock forward without firing anything.
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
