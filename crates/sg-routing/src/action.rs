//! Requests a node hands back to the simulation loop.

use sg_core::NodeId;

use crate::record::{ReceiveRecord, SendRecord};
use crate::wire::Packet;

/// A timer a node asked to be woken by.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Timer {
    Beacon,
    /// Contention timer for a pending relay toward `dest`.
    Forward { dest: NodeId, token: u64 },
}

/// Why a data packet stopped at this node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DropReason {
    /// Relaying would exceed `max_hop`.
    MaxHop,
    /// No greedy candidate and recovery is disabled.
    LocalOptimum,
    /// SIGO recovery found no eligible neighbor.
    NoRecoveryCandidate,
    /// JBR recovery found no next hop.
    NoNextHop,
    /// Discarded by an adversarial node.
    BlackHole,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DropReason::MaxHop => "max_hop",
            DropReason::LocalOptimum => "local_optimum",
            DropReason::NoRecoveryCandidate => "no_recovery_candidate",
            DropReason::NoNextHop => "no_next_hop",
            DropReason::BlackHole => "black_hole",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Broadcast(Packet),
    Unicast { to: NodeId, packet: Packet },
    /// Wake this node with `timer` after `after_us` microseconds.
    Schedule { after_us: u64, timer: Timer },
    /// A data packet was put on the air.
    Sent(SendRecord),
    /// This node is the destination of a packet it just heard.
    Arrived(ReceiveRecord),
    Dropped { dest: NodeId, hop: u32, reason: DropReason },
}
