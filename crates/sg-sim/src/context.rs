//! Run-wide bookkeeping shared by the event loop and observers.

use rustc_hash::FxHashMap;

use sg_core::{NodeId, SimTime};
use sg_routing::{DeliveryLog, DropReason, ReceiveRecord};
use sg_schedule::Flow;

/// Outcome of one send cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowOutcome {
    pub source:      NodeId,
    pub destination: NodeId,
    /// When the source originated the packet.
    pub start:       SimTime,
    /// First arrival at the destination within this epoch.
    pub finish:      Option<SimTime>,
    /// Hop count carried by the first arriving copy.
    pub hop_count:   Option<u32>,
}

impl FlowOutcome {
    pub fn delivered(&self) -> bool {
        self.finish.is_some()
    }

    /// End-to-end delay in seconds, if delivered.
    pub fn delay_secs(&self) -> Option<f64> {
        self.finish.map(|f| f.secs_since(self.start))
    }
}

/// Counters, per-destination epochs and the delivery log for one run.
#[derive(Debug, Default)]
pub struct SimulationContext {
    pub node_count: usize,

    // ── Channel counters ──────────────────────────────────────────────────
    pub hello_broadcasts: u64,
    pub data_broadcasts:  u64,
    pub unicasts:         u64,
    /// Frames that survived the loss draw.
    pub frames_delivered: u64,
    /// Frames that failed to decode at a receiver.
    pub malformed:        u64,

    // ── Protocol outcomes ─────────────────────────────────────────────────
    pub drops:              FxHashMap<DropReason, u64>,
    /// Copies reaching a destination that already received in this epoch.
    pub duplicate_arrivals: u64,
    pub flows:              Vec<FlowOutcome>,
    pub log:                DeliveryLog,

    /// Destination → index into `flows` of its current epoch.
    epochs: FxHashMap<NodeId, usize>,
}

impl SimulationContext {
    pub fn new(node_count: usize) -> Self {
        Self { node_count, ..Self::default() }
    }

    /// Open a new send epoch toward `flow.destination`, resetting its
    /// received guard.
    pub fn begin_epoch(&mut self, flow: &Flow, now: SimTime) {
        self.epochs.insert(flow.destination, self.flows.len());
        self.flows.push(FlowOutcome {
            source:      flow.source,
            destination: flow.destination,
            start:       now,
            finish:      None,
            hop_count:   None,
        });
    }

    /// Record an arrival if it is the first for the receiver's current
    /// epoch.  Returns whether it was recorded.
    pub fn accept_arrival(&mut self, rec: &ReceiveRecord) -> bool {
        let Some(&index) = self.epochs.get(&rec.receiver) else {
            self.duplicate_arrivals += 1;
            return false;
        };
        let flow = &mut self.flows[index];
        if flow.finish.is_some() {
            self.duplicate_arrivals += 1;
            return false;
        }
        flow.finish = Some(rec.time);
        flow.hop_count = Some(rec.hop_count);
        self.log.record_receive(*rec);
        true
    }

    pub fn record_drop(&mut self, reason: DropReason) {
        *self.drops.entry(reason).or_insert(0) += 1;
    }

    pub fn drop_count(&self, reason: DropReason) -> u64 {
        self.drops.get(&reason).copied().unwrap_or(0)
    }

    /// Start time of the current epoch toward `dest`.
    pub fn start_time(&self, dest: NodeId) -> Option<SimTime> {
        self.epochs.get(&dest).map(|&i| self.flows[i].start)
    }

    /// Finish time of the current epoch toward `dest`, once delivered.
    pub fn finish_time(&self, dest: NodeId) -> Option<SimTime> {
        self.epochs.get(&dest).and_then(|&i| self.flows[i].finish)
    }

    pub fn delivered_count(&self) -> usize {
        self.flows.iter().filter(|f| f.delivered()).count()
    }
}
