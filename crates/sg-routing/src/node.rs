//! `SigoNode` — the protocol instance running on one vehicle.
//!
//! # Packet lifecycle
//!
//! ```text
//!   originate ──► transmit(hop 1) ──► SEND(candidates) ─┐
//!                                                        │ heard by neighbors
//!   on_packet(SEND/RECOVER):                             ▼
//!     dest == self            → Arrived
//!     overheard hop ≥ waiting → cancel pending relay
//!     listed at rank r        → wait (r − 1)·WaitT + jitter, then transmit(h + 1)
//!
//!   transmit:
//!     hop > max_hop           → Dropped(MaxHop)
//!     greedy candidates       → SEND
//!     none (local optimum)    → recovery by mode: SEND-once-and-drop | RECOVER | JBR unicast
//! ```

use log::{debug, trace};

use sg_core::{NodeId, NodeRng, Point};

use crate::recovery::{decide_next_hop, sigo_candidates};
use crate::wire::{HelloHeader, JbrHeader, Packet, RecoverHeader, SendHeader, point};
use crate::{
    Action, Candidate, CandidateSet, Contention, DropReason, Hop, NeighborTable, NeighborView,
    NodeBehavior, NodeContext, PacketKind, ReceiveRecord, RecoveryMode, RelayJob, RelayMode,
    RoutingResult, SendRecord, Timer, select_candidates,
};

pub struct SigoNode {
    id: NodeId,
    behavior: NodeBehavior,
    neighbors: NeighborTable,
    contention: Contention,
    /// Position announced in the previous beacon.
    last_beacon: Option<Point>,
}

impl SigoNode {
    pub fn new(id: NodeId, behavior: NodeBehavior) -> Self {
        Self {
            id,
            behavior,
            neighbors: NeighborTable::new(),
            contention: Contention::new(),
            last_beacon: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn behavior(&self) -> NodeBehavior {
        self.behavior
    }

    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    pub fn contention(&self) -> &Contention {
        &self.contention
    }

    /// First beacon, jittered so nodes do not beacon in lockstep.
    pub fn start(&mut self, ctx: &NodeContext<'_>, rng: &mut NodeRng) -> Vec<Action> {
        let after_us = rng.jitter_us(0, ctx.config.hello_interval_us());
        vec![Action::Schedule { after_us, timer: Timer::Beacon }]
    }

    pub fn on_timer(
        &mut self,
        timer: Timer,
        ctx: &NodeContext<'_>,
        rng: &mut NodeRng,
    ) -> Vec<Action> {
        match timer {
            Timer::Beacon => self.beacon(ctx, rng),
            Timer::Forward { dest, token } => match self.contention.fire(dest, token) {
                Some(job) => self.transmit(job, ctx),
                None => {
                    trace!("{}: stale forward timer for {dest}", self.id);
                    vec![]
                }
            },
        }
    }

    /// Start a send cycle toward `dest`, whose position is known to the
    /// source.  The source never waits.
    pub fn originate(
        &mut self,
        dest: NodeId,
        dest_pos: Point,
        ctx: &NodeContext<'_>,
    ) -> Vec<Action> {
        debug!("{}: originating packet for {dest} at {}", self.id, ctx.now);
        let job = RelayJob { dest, dest_pos, hop: 1, previous: None, mode: RelayMode::Greedy };
        self.transmit(job, ctx)
    }

    /// Handle bytes heard on the channel.
    ///
    /// # Errors
    ///
    /// Only a malformed packet is an error; every protocol outcome is
    /// expressed as actions.
    pub fn on_packet(
        &mut self,
        bytes: &[u8],
        ctx: &NodeContext<'_>,
        rng: &mut NodeRng,
    ) -> RoutingResult<Vec<Action>> {
        let actions = match Packet::decode(bytes)? {
            Packet::Hello(h) => {
                if h.sender != self.id {
                    self.neighbors.observe(&h, ctx.now, ctx.config);
                }
                vec![]
            }
            Packet::Send(h) => self.on_data(&h, PacketKind::Send, None, ctx, rng),
            Packet::Recover(h) => {
                let recovery = (point(h.local_source), point(h.previous));
                self.on_data(&h.send, PacketKind::Recover, Some(recovery), ctx, rng)
            }
            Packet::JbrRecover(h) => self.on_jbr(&h, ctx),
        };
        Ok(actions)
    }

    // ── Beacons ───────────────────────────────────────────────────────────

    fn beacon(&mut self, ctx: &NodeContext<'_>, rng: &mut NodeRng) -> Vec<Action> {
        let evicted = self.neighbors.evict_stale(ctx.now, ctx.config);
        if evicted > 0 {
            trace!("{}: evicted {evicted} stale neighbors", self.id);
        }

        let position = ctx.position.to_wire();
        let previous = self.last_beacon.map_or(position, Point::to_wire);
        self.last_beacon = Some(ctx.position);

        let hello = HelloHeader {
            sender: self.id,
            position,
            previous,
            acceleration_mm: (ctx.acceleration * 1000.0).round() as i32,
        };
        let after_us =
            ctx.config.hello_interval_us() + rng.jitter_us(0, ctx.config.beacon_jitter_us);
        vec![
            Action::Broadcast(Packet::Hello(hello)),
            Action::Schedule { after_us, timer: Timer::Beacon },
        ]
    }

    // ── Receiving data ────────────────────────────────────────────────────

    fn on_data(
        &mut self,
        h: &SendHeader,
        kind: PacketKind,
        recovery: Option<(Point, Point)>,
        ctx: &NodeContext<'_>,
        rng: &mut NodeRng,
    ) -> Vec<Action> {
        if h.dest == self.id {
            return vec![self.arrived(h.sender, h.sender_pos, h.hop_count, kind, ctx)];
        }

        if self.contention.overhear(h.dest, h.hop_count) {
            debug!("{}: overheard hop {} for {}, relay cancelled", self.id, h.hop_count, h.dest);
        }

        let Some(rank) = h.rank_of(self.id) else {
            return vec![];
        };

        let (mode, previous_pos) = match recovery {
            Some((local_source, previous)) => (RelayMode::Recovery { local_source }, previous),
            None => (RelayMode::Greedy, point(h.sender_pos)),
        };
        let job = RelayJob {
            dest: h.dest,
            dest_pos: point(h.dest_pos),
            hop: h.hop_count + 1,
            previous: Some(Hop { id: h.sender, position: previous_pos }),
            mode,
        };

        if self.behavior.is_malicious() {
            return self.swallow(job, ctx);
        }
        if self.contention.is_waiting(h.dest) {
            return vec![];
        }

        let token = self.contention.enlist(job, rank);
        let after_us = Contention::wait_time_us(rank, ctx.config, rng);
        debug!("{}: candidate rank {rank} for {}, waiting {after_us}us", self.id, h.dest);
        vec![Action::Schedule { after_us, timer: Timer::Forward { dest: h.dest, token } }]
    }

    fn on_jbr(&mut self, h: &JbrHeader, ctx: &NodeContext<'_>) -> Vec<Action> {
        if h.dest == self.id {
            let kind = PacketKind::JbrRecover;
            return vec![self.arrived(h.sender, h.sender_pos, h.hop_count, kind, ctx)];
        }
        if h.next_hop != Some(self.id) {
            return vec![];
        }

        let job = RelayJob {
            dest: h.dest,
            dest_pos: point(h.dest_pos),
            hop: h.hop_count + 1,
            previous: Some(Hop { id: h.sender, position: point(h.previous) }),
            mode: RelayMode::Recovery { local_source: point(h.local_source) },
        };
        if self.behavior.is_malicious() {
            return vec![self.dropped(&job, DropReason::BlackHole)];
        }
        // No contention on a unicast.
        self.transmit(job, ctx)
    }

    fn arrived(
        &self,
        sender: NodeId,
        sender_pos: (i32, i32),
        hop_count: u32,
        kind: PacketKind,
        ctx: &NodeContext<'_>,
    ) -> Action {
        debug!("{}: received packet from {sender} after {hop_count} hops", self.id);
        Action::Arrived(ReceiveRecord {
            time: ctx.now,
            receiver: self.id,
            position: ctx.position,
            sender,
            sender_pos: point(sender_pos),
            hop_count,
            kind,
        })
    }

    /// Black-hole handling: advance the hop count with an empty candidate
    /// list so waiting candidates cancel, then discard.
    fn swallow(&mut self, job: RelayJob, ctx: &NodeContext<'_>) -> Vec<Action> {
        if job.hop > ctx.config.max_hop {
            return vec![self.dropped(&job, DropReason::MaxHop)];
        }
        let mut actions = self.send(&job, CandidateSet::empty(), ctx);
        actions.push(self.dropped(&job, DropReason::BlackHole));
        actions
    }

    // ── Transmitting ──────────────────────────────────────────────────────

    fn transmit(&mut self, job: RelayJob, ctx: &NodeContext<'_>) -> Vec<Action> {
        if job.hop > ctx.config.max_hop {
            debug!("{}: hop {} exceeds max_hop for {}", self.id, job.hop, job.dest);
            return vec![self.dropped(&job, DropReason::MaxHop)];
        }

        let views = self.views(ctx);
        match job.mode {
            RelayMode::Greedy => self.forward_greedy(job, &views, ctx),
            RelayMode::Recovery { local_source } => {
                if ctx.position.distance(job.dest_pos) < local_source.distance(job.dest_pos) {
                    debug!("{}: recovery toward {} succeeded, back to greedy", self.id, job.dest);
                    self.forward_greedy(RelayJob { mode: RelayMode::Greedy, ..job }, &views, ctx)
                } else {
                    self.continue_recovery(job, local_source, &views, ctx)
                }
            }
        }
    }

    fn views(&mut self, ctx: &NodeContext<'_>) -> Vec<NeighborView> {
        self.neighbors.evict_stale(ctx.now, ctx.config);
        self.neighbors.views(ctx.now, ctx.config)
    }

    fn forward_greedy(
        &mut self,
        job: RelayJob,
        views: &[NeighborView],
        ctx: &NodeContext<'_>,
    ) -> Vec<Action> {
        let candidates =
            select_candidates(ctx.position, job.dest_pos, views, ctx.topology, ctx.config);
        if !candidates.is_empty() {
            return self.send(&job, candidates, ctx);
        }

        let mode = ctx.config.recovery_mode;
        debug!("{}: local optimum toward {} ({mode:?} recovery)", self.id, job.dest);
        match mode {
            RecoveryMode::None => {
                let mut actions = self.send(&job, CandidateSet::empty(), ctx);
                actions.push(self.dropped(&job, DropReason::LocalOptimum));
                actions
            }
            RecoveryMode::Sigo | RecoveryMode::Jbr => {
                let local_source = ctx.position;
                let job = RelayJob { mode: RelayMode::Recovery { local_source }, ..job };
                self.continue_recovery(job, local_source, views, ctx)
            }
        }
    }

    fn continue_recovery(
        &mut self,
        job: RelayJob,
        local_source: Point,
        views: &[NeighborView],
        ctx: &NodeContext<'_>,
    ) -> Vec<Action> {
        match ctx.config.recovery_mode {
            RecoveryMode::Jbr => {
                let next = decide_next_hop(
                    ctx.position,
                    job.dest_pos,
                    local_source,
                    job.previous,
                    views,
                    ctx.topology,
                    ctx.config,
                );
                match next.and_then(|id| views.iter().find(|v| v.id == id)) {
                    Some(v) => self.unicast_jbr(&job, local_source, v, ctx),
                    None => vec![self.dropped(&job, DropReason::NoNextHop)],
                }
            }
            // A RECOVER packet still in flight after a mode change keeps
            // using geometric recovery.
            RecoveryMode::Sigo | RecoveryMode::None => {
                let candidates = sigo_candidates(
                    ctx.position,
                    job.dest_pos,
                    local_source,
                    job.previous,
                    views,
                    ctx.topology,
                    ctx.config,
                );
                if candidates.is_empty() {
                    return vec![self.dropped(&job, DropReason::NoRecoveryCandidate)];
                }
                self.send_recover(&job, local_source, candidates, ctx)
            }
        }
    }

    fn send_header(
        &self,
        job: &RelayJob,
        candidates: &CandidateSet,
        ctx: &NodeContext<'_>,
    ) -> SendHeader {
        SendHeader {
            dest: job.dest,
            dest_pos: job.dest_pos.to_wire(),
            sender: self.id,
            sender_pos: ctx.position.to_wire(),
            hop_count: job.hop,
            candidates: candidates.ids(),
        }
    }

    fn record(
        &self,
        job: &RelayJob,
        kind: PacketKind,
        candidates: CandidateSet,
        ctx: &NodeContext<'_>,
    ) -> Action {
        Action::Sent(SendRecord {
            time: ctx.now,
            sender: self.id,
            position: ctx.position,
            dest: job.dest,
            dest_pos: job.dest_pos,
            hop_count: job.hop,
            kind,
            candidates,
        })
    }

    fn send(&self, job: &RelayJob, candidates: CandidateSet, ctx: &NodeContext<'_>) -> Vec<Action> {
        let header = self.send_header(job, &candidates, ctx);
        debug!("{}: SEND hop {} for {} to {:?}", self.id, job.hop, job.dest, header.candidates);
        vec![
            Action::Broadcast(Packet::Send(header)),
            self.record(job, PacketKind::Send, candidates, ctx),
        ]
    }

    fn send_recover(
        &self,
        job: &RelayJob,
        local_source: Point,
        candidates: CandidateSet,
        ctx: &NodeContext<'_>,
    ) -> Vec<Action> {
        let header = RecoverHeader {
            send: self.send_header(job, &candidates, ctx),
            local_source: local_source.to_wire(),
            previous: ctx.position.to_wire(),
        };
        let addressed = header.send.candidates;
        debug!("{}: RECOVER hop {} for {} to {addressed:?}", self.id, job.hop, job.dest);
        vec![
            Action::Broadcast(Packet::Recover(header)),
            self.record(job, PacketKind::Recover, candidates, ctx),
        ]
    }

    fn unicast_jbr(
        &self,
        job: &RelayJob,
        local_source: Point,
        next: &NeighborView,
        ctx: &NodeContext<'_>,
    ) -> Vec<Action> {
        let header = JbrHeader {
            sender: self.id,
            sender_pos: ctx.position.to_wire(),
            next_hop: Some(next.id),
            local_source: local_source.to_wire(),
            previous: ctx.position.to_wire(),
            dest: job.dest,
            dest_pos: job.dest_pos.to_wire(),
            hop_count: job.hop,
        };
        let chosen = Candidate {
            id: next.id,
            priority: 0.0,
            rt: next.rt,
            is_intersection: ctx.topology.is_intersection(next.position),
        };
        debug!("{}: JBR hop {} for {} via {}", self.id, job.hop, job.dest, next.id);
        vec![
            Action::Unicast { to: next.id, packet: Packet::JbrRecover(header) },
            self.record(job, PacketKind::JbrRecover, CandidateSet::single(chosen), ctx),
        ]
    }

    fn dropped(&self, job: &RelayJob, reason: DropReason) -> Action {
        let why = reason.as_str();
        debug!("{}: dropping packet for {} at hop {}: {why}", self.id, job.dest, job.hop);
        Action::Dropped { dest: job.dest, hop: job.hop, reason }
    }
}
