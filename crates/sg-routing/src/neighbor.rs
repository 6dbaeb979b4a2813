//! The neighbor table: what a node knows about the vehicles around it.
//!
//! Records are created by the first Hello from an unseen id and refreshed
//! by every later one.  A record not refreshed within
//! `neighbor_ttl_beacons` hello intervals is evicted.
//!
//! Per-decision values (`rt`, ETX, predicted position) are never stored on
//! the record; [`NeighborTable::views`] computes them fresh into
//! [`NeighborView`]s that the caller drops after the decision.

use std::collections::{BTreeMap, VecDeque};

use log::trace;

use sg_core::{NodeId, Point, SimTime};
use sg_topology::LinkSample;

use crate::predict::predict_position;
use crate::wire::{HelloHeader, point};
use crate::{SigoConfig, etx, transmission_rate};

/// Everything learned about one neighbor from its beacons.
#[derive(Clone, Debug)]
pub struct NeighborRecord {
    pub last_position: Point,
    pub previous_position: Point,
    /// Metres per second, estimated over one hello interval.
    pub speed: f64,
    /// Radians, `atan2` of the last two beacon positions.
    pub heading: f64,
    pub acceleration: f64,
    pub last_heard: SimTime,
    /// Receive times of beacons inside the sliding window, oldest first.
    beacons: VecDeque<SimTime>,
}

impl NeighborRecord {
    /// Beacons heard in the window ending at `now`, and the first of them.
    pub fn window(&self, now: SimTime, window_us: u64) -> (usize, Option<SimTime>) {
        let start = SimTime(now.0.saturating_sub(window_us));
        let mut in_window = self.beacons.iter().filter(|t| **t >= start && **t <= now);
        let first = in_window.next().copied();
        let count = first.map_or(0, |_| 1 + in_window.count());
        (count, first)
    }

    fn prune(&mut self, now: SimTime, window_us: u64) {
        let start = SimTime(now.0.saturating_sub(window_us));
        while self.beacons.front().is_some_and(|t| *t < start) {
            self.beacons.pop_front();
        }
    }
}

/// A neighbor as seen by one forwarding decision.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NeighborView {
    pub id: NodeId,
    /// Predicted position at decision time.
    pub position: Point,
    pub rt: f64,
    pub etx: f64,
}

impl NeighborView {
    pub fn sample(&self) -> LinkSample {
        LinkSample { position: self.position, rt: self.rt }
    }
}

#[derive(Clone, Debug, Default)]
pub struct NeighborTable {
    records: BTreeMap<NodeId, NeighborRecord>,
}

impl NeighborTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&NeighborRecord> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.records.contains_key(&id)
    }

    /// Record a Hello beacon received at `now`.
    pub fn observe(&mut self, hello: &HelloHeader, now: SimTime, cfg: &SigoConfig) {
        let last = point(hello.position);
        let previous = point(hello.previous);
        let moved = last.distance(previous);
        let speed = moved / cfg.hello_interval_secs;
        let acceleration = hello.acceleration();

        let rec = self.records.entry(hello.sender).or_insert_with(|| NeighborRecord {
            last_position: last,
            previous_position: previous,
            speed: 0.0,
            heading: 0.0,
            acceleration: 0.0,
            last_heard: now,
            beacons: VecDeque::new(),
        });
        // A stationary neighbor keeps its last known heading.
        if moved > 0.0 {
            rec.heading = previous.bearing_to(last);
        }
        rec.last_position = last;
        rec.previous_position = previous;
        rec.speed = speed;
        rec.acceleration = acceleration;
        rec.last_heard = now;
        rec.beacons.push_back(now);
        rec.prune(now, cfg.window_us());
        trace!("beacon from {} at {now}: pos={last:?} speed={speed:.2}", hello.sender);
    }

    /// Drop neighbors silent for longer than the TTL.  Returns how many were
    /// removed.
    pub fn evict_stale(&mut self, now: SimTime, cfg: &SigoConfig) -> usize {
        let ttl = cfg.neighbor_ttl_us();
        let before = self.records.len();
        self.records.retain(|_, rec| now.0.saturating_sub(rec.last_heard.0) <= ttl);
        before - self.records.len()
    }

    /// Fresh link estimates and predicted positions for every neighbor, in
    /// ascending id order.
    pub fn views(&self, now: SimTime, cfg: &SigoConfig) -> Vec<NeighborView> {
        let window_us = cfg.window_us();
        self.records
            .iter()
            .map(|(&id, rec)| {
                let (count, first) = rec.window(now, window_us);
                let rt = first.map_or(0.0, |first| {
                    transmission_rate(count, first, now, cfg.hello_interval_secs)
                });
                NeighborView { id, position: predict_position(rec, now), rt, etx: etx(rt) }
            })
            .collect()
    }
}
