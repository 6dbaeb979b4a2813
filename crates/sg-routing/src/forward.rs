//! Timer-based contention among ranked candidates.
//!
//! A node listed at rank `r` in a packet with hop count `h` waits
//! `(r − 1)·WaitT + jitter` and then relays at hop `h + 1`.  While waiting,
//! overhearing any packet for the same destination with hop count
//! `≥ h + 1` means a better-ranked candidate already relayed, so the pending
//! relay is dropped.  The timer itself stays queued and fires as a no-op
//! because its token no longer matches.

use std::collections::BTreeMap;

use sg_core::{NodeId, NodeRng, Point};

use crate::SigoConfig;

/// The node a packet was received from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hop {
    pub id: NodeId,
    pub position: Point,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RelayMode {
    Greedy,
    /// Routing around a local optimum that began at `local_source`.
    Recovery { local_source: Point },
}

/// Everything needed to relay a packet once contention is won.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RelayJob {
    pub dest: NodeId,
    pub dest_pos: Point,
    /// Hop count the relayed packet will carry.
    pub hop: u32,
    /// `None` only at the originating source.
    pub previous: Option<Hop>,
    pub mode: RelayMode,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PendingForward {
    pub waiting_hop: u32,
    pub rank: usize,
    pub token: u64,
    pub job: RelayJob,
}

/// Pending relays of one node, keyed by destination.
#[derive(Debug, Default)]
pub struct Contention {
    pending: BTreeMap<NodeId, PendingForward>,
    next_token: u64,
}

impl Contention {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay before a rank-`rank` candidate relays.
    pub fn wait_time_us(rank: usize, cfg: &SigoConfig, rng: &mut NodeRng) -> u64 {
        let slots = rank.saturating_sub(1) as u64;
        slots * cfg.wait_t_us + rng.jitter_us(cfg.forward_jitter_min_us, cfg.forward_jitter_max_us)
    }

    pub fn pending(&self, dest: NodeId) -> Option<&PendingForward> {
        self.pending.get(&dest)
    }

    pub fn is_waiting(&self, dest: NodeId) -> bool {
        self.pending.contains_key(&dest)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Start waiting to relay `job`.  Returns the token the fire timer must
    /// carry.  Replaces any pending relay for the same destination.
    pub fn enlist(&mut self, job: RelayJob, rank: usize) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        self.pending.insert(job.dest, PendingForward { waiting_hop: job.hop, rank, token, job });
        token
    }

    /// A packet for `dest` carrying `hop` was heard.  Returns `true` if it
    /// cancelled a pending relay.
    pub fn overhear(&mut self, dest: NodeId, hop: u32) -> bool {
        match self.pending.get(&dest) {
            Some(p) if hop >= p.waiting_hop => {
                self.pending.remove(&dest);
                true
            }
            _ => false,
        }
    }

    /// Timer for `dest` fired.  Yields the job only if `token` is still the
    /// current one; the pending entry is cleared either way on a match.
    pub fn fire(&mut self, dest: NodeId, token: u64) -> Option<RelayJob> {
        match self.pending.get(&dest) {
            Some(p) if p.token == token => self.pending.remove(&dest).map(|p| p.job),
            _ => None,
        }
    }
}
