//! `EventQueue` — the pending-event set of the discrete-event loop.
//!
//! `BTreeMap` gives O(log T) insert and pop where T = number of distinct
//! timestamps currently enqueued.  Beacons carry jitter, so most timestamps
//! hold a single event; the per-timestamp `VecDeque` only matters for
//! same-instant channel deliveries.
//!
//! Events are never removed early.  A cancelled protocol timer stays in the
//! queue, fires, and is ignored by its owner.

use std::collections::{BTreeMap, VecDeque};

use sg_core::SimTime;

/// A time-ordered queue of events of type `E`.
pub struct EventQueue<E> {
    inner: BTreeMap<SimTime, VecDeque<E>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), total: 0 }
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` at `time`.  Same-time events keep insertion order.
    pub fn push(&mut self, time: SimTime, event: E) {
        self.inner.entry(time).or_default().push_back(event);
        self.total += 1;
    }

    /// Remove and return the earliest event.
    pub fn pop(&mut self) -> Option<(SimTime, E)> {
        let mut entry = self.inner.first_entry()?;
        let time = *entry.key();
        let event = entry.get_mut().pop_front()?;
        if entry.get().is_empty() {
            entry.remove();
        }
        self.total -= 1;
        Some((time, event))
    }

    /// The earliest timestamp with at least one event, or `None` if empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Total number of queued events.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future timestamps holding at least one event.
    pub fn time_count(&self) -> usize {
        self.inner.len()
    }
}
