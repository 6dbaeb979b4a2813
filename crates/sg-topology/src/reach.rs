//! Road reachability queries over a snapshot of neighbor link estimates.
//!
//! These functions take plain `(position, rt)` samples rather than a
//! neighbor table so the topology crate stays independent of the routing
//! layer.

use sg_core::{Point, RoadId};

use crate::{Location, RoadTopology};

/// One neighbor's predicted position and expected transmission rate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkSample {
    pub position: Point,
    /// Expected transmission rate in `[0, 1]`.
    pub rt: f64,
}

impl RoadTopology {
    /// Probability that at least one neighbor on `road` relays successfully:
    /// `1 − Π(1 − rt_i)` over samples classified onto that road.
    ///
    /// Returns `0.0` when no sample lies on the road.
    pub fn road_reach_probability<I>(&self, road: RoadId, samples: I) -> f64
    where
        I: IntoIterator<Item = LinkSample>,
    {
        let miss: f64 = samples
            .into_iter()
            .filter(|s| self.classify(s.position) == Some(Location::Road(road)))
            .map(|s| 1.0 - s.rt.clamp(0.0, 1.0))
            .product();
        1.0 - miss
    }

    /// Among roads holding at least one (non-intersection) sample, the road
    /// whose centre is closest to `target`.
    ///
    /// `None` means "no information": no sample lies on any road.  Ties
    /// resolve to the lower `RoadId`.
    pub fn nearest_road_to_point<I>(&self, samples: I, target: Point) -> Option<RoadId>
    where
        I: IntoIterator<Item = LinkSample>,
    {
        let mut roads: Vec<RoadId> = samples
            .into_iter()
            .filter_map(|s| self.classify(s.position).and_then(Location::road))
            .collect();
        roads.sort_unstable();
        roads.dedup();

        let mut best: Option<(RoadId, f64)> = None;
        for road in roads {
            let d = self.road_center(road).distance(target);
            if best.is_none_or(|(_, b)| d < b) {
                best = Some((road, d));
            }
        }
        best.map(|(r, _)| r)
    }
}
