//! Plain data row types written by output backends.

use sg_routing::{ReceiveRecord, SendRecord};
use sg_sim::FlowOutcome;

/// One data transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct SendLogRow {
    pub time_secs:  f64,
    pub sender:     u32,
    pub x:          f64,
    pub y:          f64,
    pub dest:       u32,
    pub dest_x:     f64,
    pub dest_y:     f64,
    pub hop_count:  u32,
    pub kind:       &'static str,
    /// Addressed relays in rank order, `;`-separated (empty when none).
    pub candidates: String,
    /// Priority of the first-ranked relay, `0.0` when none.
    pub best_priority: f64,
}

impl From<&SendRecord> for SendLogRow {
    fn from(r: &SendRecord) -> Self {
        let candidates = r
            .candidates
            .iter()
            .map(|c| c.id.0.to_string())
            .collect::<Vec<_>>()
            .join(";");
        Self {
            time_secs: r.time.as_secs_f64(),
            sender: r.sender.0,
            x: r.position.x,
            y: r.position.y,
            dest: r.dest.0,
            dest_x: r.dest_pos.x,
            dest_y: r.dest_pos.y,
            hop_count: r.hop_count,
            kind: r.kind.as_str(),
            candidates,
            best_priority: r.candidates.first().map_or(0.0, |c| c.priority),
        }
    }
}

/// A packet reaching its destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceiveLogRow {
    pub time_secs: f64,
    pub receiver:  u32,
    pub x:         f64,
    pub y:         f64,
    pub sender:    u32,
    pub sender_x:  f64,
    pub sender_y:  f64,
    pub hop_count: u32,
    pub kind:      &'static str,
}

impl From<&ReceiveRecord> for ReceiveLogRow {
    fn from(r: &ReceiveRecord) -> Self {
        Self {
            time_secs: r.time.as_secs_f64(),
            receiver: r.receiver.0,
            x: r.position.x,
            y: r.position.y,
            sender: r.sender.0,
            sender_x: r.sender_pos.x,
            sender_y: r.sender_pos.y,
            hop_count: r.hop_count,
            kind: r.kind.as_str(),
        }
    }
}

/// Outcome of one send cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSummaryRow {
    pub source:      u32,
    pub destination: u32,
    pub start_secs:  f64,
    pub delivered:   bool,
    /// `None` when the packet never arrived.
    pub finish_secs: Option<f64>,
    pub delay_secs:  Option<f64>,
    pub hop_count:   Option<u32>,
}

impl From<&FlowOutcome> for FlowSummaryRow {
    fn from(f: &FlowOutcome) -> Self {
        Self {
            source: f.source.0,
            destination: f.destination.0,
            start_secs: f.start.as_secs_f64(),
            delivered: f.delivered(),
            finish_secs: f.finish.map(|t| t.as_secs_f64()),
            delay_secs: f.delay_secs(),
            hop_count: f.hop_count,
        }
    }
}
