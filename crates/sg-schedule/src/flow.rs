//! A single traffic flow: one send cycle from a source to a destination.

use sg_core::{NodeId, SimTime};

/// Start a send cycle from `source` to `destination` at `start`.
///
/// A later flow toward the same destination opens a new send epoch: the
/// destination's "already received" guard is reset when it starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flow {
    pub source:      NodeId,
    pub destination: NodeId,
    pub start:       SimTime,
}

impl Flow {
    pub fn new(source: NodeId, destination: NodeId, start: SimTime) -> Self {
        Self { source, destination, start }
    }
}
