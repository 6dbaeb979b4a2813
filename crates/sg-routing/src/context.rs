//! Read-only state handed to every node callback.

use sg_core::{Point, SimTime};
use sg_topology::RoadTopology;

use crate::SigoConfig;

/// What a node may consult while handling one event.
///
/// Built by the simulation loop per event; the node's own position and
/// acceleration come from the mobility model at `now`.
pub struct NodeContext<'a> {
    pub now: SimTime,
    pub position: Point,
    /// m/s², carried in Hello beacons.
    pub acceleration: f64,
    pub topology: &'a RoadTopology,
    pub config: &'a SigoConfig,
}

impl<'a> NodeContext<'a> {
    #[inline]
    pub fn new(
        now:          SimTime,
        position:     Point,
        acceleration: f64,
        topology:     &'a RoadTopology,
        config:       &'a SigoConfig,
    ) -> Self {
        Self { now, position, acceleration, topology, config }
    }
}
