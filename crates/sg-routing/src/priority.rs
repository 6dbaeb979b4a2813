//! Greedy candidate selection.
//!
//! Every neighbor that makes non-negative progress toward the destination
//! is scored `progress / etx²`, plus a bonus for junction-to-junction hops
//! that turn sharply toward a poorly covered road.  The five best become the
//! ranked candidate set; only as many are addressed as needed to reach the
//! configured cumulative delivery probability.

use std::cmp::Ordering;

use sg_core::geo::angle_between;
use sg_core::{NodeId, Point};
use sg_topology::RoadTopology;

use crate::{NeighborView, SigoConfig};

/// Number of ranked relay slots carried in a data packet.
pub const MAX_CANDIDATES: usize = 5;

/// One ranked relay.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub id: NodeId,
    pub priority: f64,
    pub rt: f64,
    pub is_intersection: bool,
}

/// Ranks 1..=5.  Empty slots are `None` and only ever trail the filled ones.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateSet {
    slots: [Option<Candidate>; MAX_CANDIDATES],
}

impl CandidateSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A set addressing exactly one relay.
    pub fn single(c: Candidate) -> Self {
        let mut set = Self::default();
        set.slots[0] = Some(c);
        set
    }

    /// Sort `candidates`, keep the best five, then blank every slot past
    /// the smallest prefix that reaches `trans_probability`.
    pub fn from_scored(mut candidates: Vec<Candidate>, trans_probability: f64) -> Self {
        rank(&mut candidates);
        candidates.truncate(MAX_CANDIDATES);
        let rts: Vec<f64> = candidates.iter().map(|c| c.rt).collect();
        let n = candidate_count(&rts, trans_probability);

        let mut set = Self::default();
        for (slot, c) in set.slots.iter_mut().zip(candidates.into_iter().take(n)) {
            *slot = Some(c);
        }
        set
    }

    pub fn slots(&self) -> &[Option<Candidate>; MAX_CANDIDATES] {
        &self.slots
    }

    /// The ids as carried in a packet header.
    pub fn ids(&self) -> [Option<NodeId>; MAX_CANDIDATES] {
        self.slots.map(|s| s.map(|c| c.id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.slots.iter().flatten()
    }

    pub fn first(&self) -> Option<&Candidate> {
        self.slots[0].as_ref()
    }

    /// Number of addressed candidates.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots[0].is_none()
    }

    /// 1-based rank of `id`.
    pub fn rank_of(&self, id: NodeId) -> Option<usize> {
        self.iter().position(|c| c.id == id).map(|i| i + 1)
    }
}

/// Descending priority, lowest id first among equal priorities.
fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| match b.priority.total_cmp(&a.priority) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });
}

/// Smallest `n` such that `1 − Π_{i<n}(1 − rt_i) ≥ threshold`, or all of
/// `rts` when the threshold is never reached.
pub fn candidate_count(rts: &[f64], threshold: f64) -> usize {
    let mut miss = 1.0;
    for (i, rt) in rts.iter().enumerate() {
        miss *= 1.0 - rt.clamp(0.0, 1.0);
        if 1.0 - miss >= threshold {
            return i + 1;
        }
    }
    rts.len()
}

/// Rank greedy relays for a packet at `self_pos` heading to `dest`.
///
/// `neighbors` must hold fresh predictions (see
/// [`NeighborTable::views`](crate::NeighborTable::views)).  An empty result
/// means `self_pos` is a local optimum.
pub fn select_candidates(
    self_pos:  Point,
    dest:      Point,
    neighbors: &[NeighborView],
    topology:  &RoadTopology,
    cfg:       &SigoConfig,
) -> CandidateSet {
    let dsd = self_pos.distance(dest);
    let self_at_junction = topology.is_intersection(self_pos);

    // Reach probability of the occupied road closest to the destination.
    let reach = if self_at_junction {
        let samples = neighbors.iter().map(NeighborView::sample);
        topology
            .nearest_road_to_point(samples.clone(), dest)
            .map(|road| topology.road_reach_probability(road, samples))
    } else {
        None
    };

    let mut scored = Vec::new();
    for n in neighbors {
        if self_pos.distance(n.position) > cfg.max_range {
            continue;
        }
        let progress = dsd - n.position.distance(dest);
        if progress < 0.0 {
            continue;
        }

        let mut priority = progress / (n.etx * n.etx);
        let is_intersection = topology.is_intersection(n.position);
        if self_at_junction && is_intersection {
            let angle = angle_between(dest, self_pos, n.position);
            if let Some(rp) = reach.filter(|rp| *rp > 0.0 && *rp < 1.0) {
                if angle > 45.0 {
                    let turn = (angle / 90.0).powf(1.0 / cfg.angle_gamma) * 90.0;
                    priority += cfg.inter_point_weight * turn / rp.powf(1.0 / cfg.rp_gamma);
                }
            }
        }
        scored.push(Candidate { id: n.id, priority, rt: n.rt, is_intersection });
    }

    CandidateSet::from_scored(scored, cfg.trans_probability)
}
