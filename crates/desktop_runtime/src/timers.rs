//! Clock sources and the deferred action queue backing delayed close/shutdown.

use std::{
    cell::Cell,
    collections::BTreeMap,
    rc::Rc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::reducer::DesktopAction;

/// Millisecond time source used to stamp deferred actions.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self(Rc::new(Cell::new(start_ms)))
    }

    pub fn advance(&self, by: Duration) {
        let by_ms = by.as_millis() as u64;
        self.0.set(self.0.get().saturating_add(by_ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

/// Actions waiting for their due time. Equal due times fire in schedule order.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    next_seq: u64,
    pending: BTreeMap<(u64, u64), DesktopAction>,
}

impl DeferredQueue {
    pub fn schedule(&mut self, now_ms: u64, delay: Duration, action: DesktopAction) {
        let due_ms = now_ms.saturating_add(delay.as_millis() as u64);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert((due_ms, seq), action);
    }

    /// Removes and returns every action due at or before `now_ms`.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<DesktopAction> {
        let later = self.pending.split_off(&(now_ms.saturating_add(1), 0));
        std::mem::replace(&mut self.pending, later)
            .into_values()
            .collect()
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due_ms, _)| *due_ms)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
