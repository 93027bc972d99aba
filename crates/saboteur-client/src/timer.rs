//! Single-slot scheduled tasks.
//!
//! A [`TimerSlot`] holds at most one pending task handle. Platform handles
//! cancel their task when dropped, so arming a slot that is already armed
//! cancels the previous task before the new one takes its place.
//!
//! Every arming gets a fresh [`TimerId`]. A platform may already have queued
//! the expiry of a task by the time it is superseded; [`TimerSlot::fired`]
//! only accepts the id of the task currently armed, so such late expiries
//! are ignored.

use crate::platform::TimerId;

/// Holder for at most one live scheduled task.
#[derive(Debug)]
pub struct TimerSlot<T> {
    pending: Option<(TimerId, T)>,
    generation: u64,
}

impl<T> Default for TimerSlot<T> {
    fn default() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }
}

impl<T> TimerSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever was pending, then store the handle `schedule` returns
    /// for a new task id.
    pub fn arm(&mut self, schedule: impl FnOnce(TimerId) -> T) -> TimerId {
        // Drop the superseded handle first so two tasks never coexist.
        self.pending = None;
        self.generation += 1;
        let id = TimerId(self.generation);
        self.pending = Some((id, schedule(id)));
        id
    }

    /// Cancel the pending task, if any.
    pub fn disarm(&mut self) {
        self.pending = None;
    }

    /// Task `id` has fired. Returns `false`, leaving the slot untouched, when
    /// `id` is not the task currently armed.
    pub fn fired(&mut self, id: TimerId) -> bool {
        if self.armed_id() != Some(id) {
            return false;
        }
        self.pending = None;
        true
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn armed_id(&self) -> Option<TimerId> {
        self.pending.as_ref().map(|(id, _)| *id)
    }
}
