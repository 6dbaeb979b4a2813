//! The `Sim` struct and its event loop.

use log::{debug, info, warn};

use sg_core::{NodeId, NodeRngs, SimClock, SimConfig, SimRng, SimTime};
use sg_mobility::MobilityStore;
use sg_routing::{Action, NodeContext, Packet, PacketKind, SigoConfig, SigoNode};
use sg_schedule::EventQueue;
use sg_topology::RoadTopology;

use crate::{ChannelConfig, Event, SimObserver, SimResult, SimulationContext};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Holds every node's protocol instance, their motion, the road topology and
/// the event queue.  Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config:   SimConfig,
    pub protocol: SigoConfig,
    pub channel:  ChannelConfig,
    pub clock:    SimClock,
    pub topology: RoadTopology,
    pub mobility: MobilityStore,

    /// Protocol instances, indexed by `NodeId`.
    pub nodes: Vec<SigoNode>,

    /// Per-node jitter RNGs, separate from `nodes` for the split borrow.
    pub rngs: NodeRngs,

    /// Loss draws for the channel.
    pub channel_rng: SimRng,

    pub queue:   EventQueue<Event>,
    pub context: SimulationContext,

    booted: bool,
}

impl std::fmt::Debug for Sim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sim")
            .field("nodes", &self.nodes.len())
            .field("booted", &self.booted)
            .finish_non_exhaustive()
    }
}

impl Sim {
    pub(crate) fn new(
        config:      SimConfig,
        protocol:    SigoConfig,
        channel:     ChannelConfig,
        topology:    RoadTopology,
        mobility:    MobilityStore,
        nodes:       Vec<SigoNode>,
        queue:       EventQueue<Event>,
    ) -> Self {
        let count = nodes.len();
        Self {
            rngs: NodeRngs::new(count, config.seed),
            channel_rng: SimRng::new(config.seed).child(count as u64),
            clock: SimClock::new(),
            context: SimulationContext::new(count),
            booted: false,
            config,
            protocol,
            channel,
            topology,
            mobility,
            nodes,
            queue,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run until the configured end time, then hand the context to
    /// `observer.on_sim_end`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let end = self.config.end_time();
        self.run_until(end, observer)?;
        info!(
            "run finished at {end}: {}/{} flows delivered, {} data frames, {} hellos",
            self.context.delivered_count(),
            self.context.flows.len(),
            self.context.data_broadcasts + self.context.unicasts,
            self.context.hello_broadcasts,
        );
        observer.on_sim_end(end, &self.context);
        Ok(())
    }

    /// Process every event with a timestamp `≤ until`.
    ///
    /// Useful for tests and incremental stepping; does not call
    /// `on_sim_end`.
    pub fn run_until<O: SimObserver>(&mut self, until: SimTime, observer: &mut O) -> SimResult<()> {
        self.boot(observer);
        while self.queue.next_time().is_some_and(|t| t <= until) {
            let Some((now, event)) = self.queue.pop() else { break };
            self.clock.advance_to(now);
            self.dispatch(now, event, observer);
        }
        self.clock.advance_to(until);
        Ok(())
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ── Event dispatch ────────────────────────────────────────────────────

    /// Ask every node for its first beacon.  Runs once.
    fn boot<O: SimObserver>(&mut self, observer: &mut O) {
        if self.booted {
            return;
        }
        self.booted = true;
        let now = self.clock.now();
        for i in 0..self.nodes.len() {
            let id = NodeId(i as u32);
            let ctx = node_context(id, now, &self.mobility, &self.topology, &self.protocol);
            let actions = self.nodes[i].start(&ctx, self.rngs.get_mut(id));
            self.apply(id, now, actions, observer);
        }
        debug!("booted {} nodes", self.nodes.len());
    }

    fn dispatch<O: SimObserver>(&mut self, now: SimTime, event: Event, observer: &mut O) {
        match event {
            Event::Timer { node, timer } => {
                let ctx = node_context(node, now, &self.mobility, &self.topology, &self.protocol);
                let rng = self.rngs.get_mut(node);
                let actions = self.nodes[node.index()].on_timer(timer, &ctx, rng);
                self.apply(node, now, actions, observer);
            }
            Event::Deliver { to, bytes } => {
                let ctx = node_context(to, now, &self.mobility, &self.topology, &self.protocol);
                match self.nodes[to.index()].on_packet(&bytes, &ctx, self.rngs.get_mut(to)) {
                    Ok(actions) => self.apply(to, now, actions, observer),
                    Err(e) => {
                        warn!("{to}: discarding undecodable frame at {now}: {e}");
                        self.context.malformed += 1;
                    }
                }
            }
            Event::StartFlow(flow) => {
                let dest_pos = self.mobility.position_at(flow.destination, now);
                self.context.begin_epoch(&flow, now);
                let src = flow.source;
                let ctx = node_context(src, now, &self.mobility, &self.topology, &self.protocol);
                let actions = self.nodes[src.index()].originate(flow.destination, dest_pos, &ctx);
                self.apply(src, now, actions, observer);
            }
        }
    }

    // ── Apply phase ───────────────────────────────────────────────────────

    fn apply<O: SimObserver>(
        &mut self,
        from: NodeId,
        now: SimTime,
        actions: Vec<Action>,
        observer: &mut O,
    ) {
        for action in actions {
            match action {
                Action::Broadcast(packet) => {
                    if packet.kind() == PacketKind::Hello {
                        self.context.hello_broadcasts += 1;
                    } else {
                        self.context.data_broadcasts += 1;
                    }
                    self.broadcast(from, now, &packet);
                }
                Action::Unicast { to, packet } => {
                    self.context.unicasts += 1;
                    self.unicast(from, to, now, &packet);
                }
                Action::Schedule { after_us, timer } => {
                    self.queue.push(now + after_us, Event::Timer { node: from, timer });
                }
                Action::Sent(record) => {
                    observer.on_send(&record);
                    self.context.log.record_send(record);
                }
                Action::Arrived(record) => {
                    if self.context.accept_arrival(&record) {
                        let (to, hops) = (record.receiver, record.hop_count);
                        debug!("{to}: packet arrived at {now} after {hops} hops");
                        observer.on_receive(&record);
                    }
                }
                Action::Dropped { dest, hop, reason } => {
                    debug!("{from}: dropped packet for {dest} at hop {hop}: {}", reason.as_str());
                    self.context.record_drop(reason);
                    observer.on_drop(now, from, dest, hop, reason);
                }
            }
        }
    }

    fn broadcast(&mut self, from: NodeId, now: SimTime, packet: &Packet) {
        let bytes = packet.encode();
        let origin = self.mobility.position_at(from, now);
        let at = now + self.channel.tx_delay_us;
        for i in 0..self.nodes.len() {
            let to = NodeId(i as u32);
            if to == from {
                continue;
            }
            let d = origin.distance(self.mobility.position_at(to, now));
            if self.channel.draw(d, &mut self.channel_rng) {
                self.context.frames_delivered += 1;
                self.queue.push(at, Event::Deliver { to, bytes: bytes.clone() });
            }
        }
    }

    fn unicast(&mut self, from: NodeId, to: NodeId, now: SimTime, packet: &Packet) {
        if to.index() >= self.nodes.len() || to == from {
            warn!("{from}: unicast to unknown node {to} discarded");
            return;
        }
        let d = self.mobility.position_at(from, now).distance(self.mobility.position_at(to, now));
        if self.channel.draw(d, &mut self.channel_rng) {
            self.context.frames_delivered += 1;
            let at = now + self.channel.tx_delay_us;
            self.queue.push(at, Event::Deliver { to, bytes: packet.encode() });
        }
    }
}

/// Build the read-only view a node callback needs at `now`.
fn node_context<'a>(
    node:     NodeId,
    now:      SimTime,
    mobility: &MobilityStore,
    topology: &'a RoadTopology,
    protocol: &'a SigoConfig,
) -> NodeContext<'a> {
    NodeContext::new(
        now,
        mobility.position_at(node, now),
        mobility.acceleration_at(node, now),
        topology,
        protocol,
    )
}
