//! Fluent builder for constructing a [`Sim`].

use sg_core::{NodeId, SimConfig};
use sg_mobility::MobilityStore;
use sg_routing::{NodeBehavior, SigoConfig, SigoNode, WIRE_NO_NODE};
use sg_schedule::{EventQueue, Flow};
use sg_topology::RoadTopology;

use crate::{ChannelConfig, Event, Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, duration, flow start offset
/// - [`RoadTopology`]: junctions and roads used by the priority engine
/// - [`MobilityStore`]: one motion per node; its length fixes the node count
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                        |
/// |-------------------|--------------------------------|
/// | `.protocol(c)`    | `SigoConfig::default()`        |
/// | `.channel(c)`     | `ChannelConfig::default()`     |
/// | `.behaviors(v)`   | every node `Normal`            |
/// | `.flows(v)`       | no traffic (beacons only)      |
///
/// Flow start times are offsets from `config.flow_start_secs`.
pub struct SimBuilder {
    config:    SimConfig,
    topology:  RoadTopology,
    mobility:  MobilityStore,
    protocol:  Option<SigoConfig>,
    channel:   Option<ChannelConfig>,
    behaviors: Option<Vec<NodeBehavior>>,
    flows:     Vec<Flow>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, topology: RoadTopology, mobility: MobilityStore) -> Self {
        Self {
            config,
            topology,
            mobility,
            protocol:  None,
            channel:   None,
            behaviors: None,
            flows:     Vec::new(),
        }
    }

    pub fn protocol(mut self, protocol: SigoConfig) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn channel(mut self, channel: ChannelConfig) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Per-node behavior (must be length `node_count`).
    pub fn behaviors(mut self, behaviors: Vec<NodeBehavior>) -> Self {
        self.behaviors = Some(behaviors);
        self
    }

    pub fn flows(mut self, flows: Vec<Flow>) -> Self {
        self.flows = flows;
        self
    }

    /// Validate inputs, create the nodes and seed the event queue with the
    /// flow starts.
    pub fn build(self) -> SimResult<Sim> {
        let node_count = self.mobility.len();

        // ── Validate ──────────────────────────────────────────────────────
        if node_count == 0 {
            return Err(SimError::Config("at least one node is required".into()));
        }
        if node_count >= WIRE_NO_NODE as usize {
            return Err(SimError::Config(format!(
                "{node_count} nodes collide with the wire sentinel {WIRE_NO_NODE}"
            )));
        }
        if !(self.config.duration_secs.is_finite() && self.config.duration_secs > 0.0) {
            return Err(SimError::Config(format!(
                "duration must be positive, got {}",
                self.config.duration_secs
            )));
        }
        if !(self.config.flow_start_secs.is_finite() && self.config.flow_start_secs >= 0.0) {
            return Err(SimError::Config(format!(
                "flow start offset must be non-negative, got {}",
                self.config.flow_start_secs
            )));
        }

        let protocol = self.protocol.unwrap_or_default();
        protocol.validate()?;
        let channel = self.channel.unwrap_or_default();
        channel.validate()?;

        let behaviors = match self.behaviors {
            Some(b) => {
                if b.len() != node_count {
                    return Err(SimError::NodeCountMismatch {
                        expected: node_count,
                        got:      b.len(),
                        what:     "behaviors",
                    });
                }
                b
            }
            None => vec![NodeBehavior::Normal; node_count],
        };

        // ── Seed the queue with flow starts ───────────────────────────────
        let offset = self.config.flow_start();
        let mut queue = EventQueue::new();
        for flow in self.flows {
            for id in [flow.source, flow.destination] {
                if id.index() >= node_count {
                    return Err(SimError::UnknownNode(id));
                }
            }
            queue.push(offset + flow.start.0, Event::StartFlow(flow));
        }

        let nodes = behaviors
            .into_iter()
            .enumerate()
            .map(|(i, b)| SigoNode::new(NodeId(i as u32), b))
            .collect();

        Ok(Sim::new(self.config, protocol, channel, self.topology, self.mobility, nodes, queue))
    }
}
