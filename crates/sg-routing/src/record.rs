//! Delivery log records.

use sg_core::{NodeId, Point, SimTime};

use crate::{CandidateSet, PacketKind};

/// One data transmission.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SendRecord {
    pub time: SimTime,
    pub sender: NodeId,
    pub position: Point,
    pub dest: NodeId,
    pub dest_pos: Point,
    pub hop_count: u32,
    pub kind: PacketKind,
    /// Addressed relays with their priorities and link estimates.
    pub candidates: CandidateSet,
}

/// A data packet reaching its destination.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReceiveRecord {
    pub time: SimTime,
    pub receiver: NodeId,
    pub position: Point,
    pub sender: NodeId,
    pub sender_pos: Point,
    pub hop_count: u32,
    pub kind: PacketKind,
}

/// Append-only send and receive streams for a whole run.
#[derive(Clone, Debug, Default)]
pub struct DeliveryLog {
    pub sends: Vec<SendRecord>,
    pub receives: Vec<ReceiveRecord>,
}

impl DeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_send(&mut self, r: SendRecord) {
        self.sends.push(r);
    }

    pub fn record_receive(&mut self, r: ReceiveRecord) {
        self.receives.push(r);
    }

    pub fn is_empty(&self) -> bool {
        self.sends.is_empty() && self.receives.is_empty()
    }
}
