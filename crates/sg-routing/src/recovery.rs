//! Local recovery around a greedy local optimum.
//!
//! Both strategies share the three-point progress test against the
//! previous hop `p`: a neighbor `n` of the current node `c` is eligible when
//! `d(n, p) > d(c, p)` and `d(n, p) > d(c, n)`, i.e. it lies beyond `c` as
//! seen from `p`.  With no previous hop (recovery at the source) the test
//! passes trivially.

use sg_core::geo::signed_angle;
use sg_core::{NodeId, Point};
use sg_topology::{Location, RoadTopology};

use crate::{Candidate, CandidateSet, Hop, NeighborView, SigoConfig};

fn beyond(current: Point, previous: Option<Hop>, n: Point) -> bool {
    match previous {
        Some(p) => {
            let nl = n.distance(p.position);
            nl > current.distance(p.position) && nl > current.distance(n)
        }
        None => true,
    }
}

/// Unsigned angle in radians between `bearing` and `from → to`; zero when
/// either direction is degenerate.
fn deviation(bearing: (f64, f64), from: Point, to: Point) -> f64 {
    let dir = (to.x - from.x, to.y - from.y);
    if bearing == (0.0, 0.0) || dir == (0.0, 0.0) {
        return 0.0;
    }
    signed_angle(bearing, dir).abs()
}

fn same_road(a: Option<Location>, b: Option<Location>) -> bool {
    matches!((a, b), (Some(Location::Road(x)), Some(Location::Road(y))) if x == y)
}

/// Re-rank neighbors for SIGO geometric recovery.
///
/// Score is `(d(p, n) + bonus) / ((1 + dev)·etx²)`.  `dev` is the angle in
/// radians between the `local_source → dest` bearing, fixed when recovery
/// began, and the direction `current → n`.  `bonus` applies to neighbors on
/// `current`'s road or at a junction.  The previous hop itself is never a
/// candidate.
pub fn sigo_candidates(
    current:      Point,
    dest:         Point,
    local_source: Point,
    previous:     Option<Hop>,
    neighbors:    &[NeighborView],
    topology:     &RoadTopology,
    cfg:          &SigoConfig,
) -> CandidateSet {
    let own = topology.classify(current);
    let anchor = previous.map_or(current, |p| p.position);
    let bearing = (dest.x - local_source.x, dest.y - local_source.y);

    let scored = neighbors
        .iter()
        .filter(|n| current.distance(n.position) <= cfg.max_range)
        .filter(|n| previous.is_none_or(|p| p.id != n.id))
        .filter(|n| beyond(current, previous, n.position))
        .map(|n| {
            let loc = topology.classify(n.position);
            let is_intersection = loc.is_some_and(Location::is_junction);
            let bonus =
                if is_intersection || same_road(own, loc) { cfg.recovery_road_bonus } else { 0.0 };
            let dev = deviation(bearing, current, n.position);
            let priority = (anchor.distance(n.position) + bonus) / ((1.0 + dev) * n.etx * n.etx);
            Candidate { id: n.id, priority, rt: n.rt, is_intersection }
        })
        .collect();

    CandidateSet::from_scored(scored, cfg.trans_probability)
}

/// Pick the single JBR next hop, or `None` when recovery must give up.
///
/// In order of preference:
/// 1. a junction neighbor not on `current`'s junction that passes the
///    progress test, closest to the destination;
/// 2. when `current` is itself at a junction, the neighbor whose direction
///    deviates least from the `local_source → dest` bearing;
/// 3. a neighbor on `current`'s road that passes the progress test,
///    farthest from the previous hop.
///
/// The previous hop is never chosen.  Ties go to the lowest id.
pub fn decide_next_hop(
    current:      Point,
    dest:         Point,
    local_source: Point,
    previous:     Option<Hop>,
    neighbors:    &[NeighborView],
    topology:     &RoadTopology,
    cfg:          &SigoConfig,
) -> Option<NodeId> {
    let own = topology.classify(current);
    let pool: Vec<(&NeighborView, Option<Location>)> = neighbors
        .iter()
        .filter(|n| current.distance(n.position) <= cfg.max_range)
        .filter(|n| previous.is_none_or(|p| p.id != n.id))
        .map(|n| (n, topology.classify(n.position)))
        .collect();

    // Lowest key wins, lower id on ties.
    let least = |a: &(f64, NodeId), b: &(f64, NodeId)| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1));

    let junction = pool
        .iter()
        .filter(|(n, loc)| {
            matches!(loc, Some(Location::Junction(_)))
                && *loc != own
                && beyond(current, previous, n.position)
        })
        .map(|(n, _)| (n.position.distance(dest), n.id))
        .min_by(least);
    if let Some((_, id)) = junction {
        return Some(id);
    }

    if own.is_some_and(Location::is_junction) {
        let bearing = (dest.x - local_source.x, dest.y - local_source.y);
        let aligned = pool
            .iter()
            .map(|(n, _)| {
                let dir = (n.position.x - current.x, n.position.y - current.y);
                (signed_angle(bearing, dir).abs(), n.id)
            })
            .min_by(least);
        if let Some((_, id)) = aligned {
            return Some(id);
        }
    }

    let anchor = previous.map_or(current, |p| p.position);
    pool.iter()
        .filter(|(n, loc)| same_road(own, *loc) && beyond(current, previous, n.position))
        .map(|(n, _)| (-anchor.distance(n.position), n.id))
        .min_by(least)
        .map(|(_, id)| id)
}
