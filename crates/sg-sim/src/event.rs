//! Events carried by the simulation queue.

use sg_core::NodeId;
use sg_routing::Timer;
use sg_schedule::Flow;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A timer a node scheduled for itself.
    Timer { node: NodeId, timer: Timer },
    /// Encoded packet bytes arriving at `to`.
    Deliver { to: NodeId, bytes: Vec<u8> },
    /// The source of `flow` originates a data packet.
    StartFlow(Flow),
}
