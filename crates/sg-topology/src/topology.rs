//! Road topology representation, builder, and point classifier.
//!
//! # Data layout
//!
//! Junctions and roads are stored in dense `Vec`s indexed by `JunctionId` /
//! `RoadId`; the textual ids from the topology file are kept alongside for
//! logging and output.  Name lookup goes through a `HashMap`.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over junction centres answers "nearest junction to
//! this point" in O(log J).  Road classification is a linear scan over the
//! road list; urban topologies hold a few hundred segments at most.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use sg_core::geo::line_distance;
use sg_core::{JunctionId, Point, RoadId};

/// Radius (simulation metres) inside which a point counts as "on" a junction.
pub const DEFAULT_JUNCTION_RADIUS: f64 = 20.0;

// ── R-tree junction entry ─────────────────────────────────────────────────────

#[derive(Clone)]
struct JunctionEntry {
    point: [f64; 2],
    id:    JunctionId,
}

impl RTreeObject for JunctionEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for JunctionEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Public types ──────────────────────────────────────────────────────────────

/// Where a point lies relative to the road topology.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Location {
    Junction(JunctionId),
    Road(RoadId),
}

impl Location {
    #[inline]
    pub fn is_junction(self) -> bool {
        matches!(self, Location::Junction(_))
    }

    #[inline]
    pub fn road(self) -> Option<RoadId> {
        match self {
            Location::Road(r) => Some(r),
            Location::Junction(_) => None,
        }
    }
}

/// A road segment between two junctions.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSegment {
    pub name: String,
    pub from: JunctionId,
    pub to:   JunctionId,
}

// ── RoadTopology ──────────────────────────────────────────────────────────────

/// Static junction/road topology.  Immutable after [`RoadTopologyBuilder::build`].
#[derive(Clone)]
pub struct RoadTopology {
    junction_names: Vec<String>,
    junction_pos:   Vec<Point>,
    junction_index: HashMap<String, JunctionId>,
    roads:          Vec<RoadSegment>,
    road_index:     HashMap<String, RoadId>,
    junction_radius: f64,
    spatial_idx:    RTree<JunctionEntry>,
}

impl std::fmt::Debug for RoadTopology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadTopology")
            .field("junction_names", &self.junction_names)
            .field("roads", &self.roads.len())
            .field("junction_radius", &self.junction_radius)
            .finish_non_exhaustive()
    }
}

impl RoadTopology {
    /// A topology with no junctions or roads.  Every point classifies to
    /// `None` and is never an intersection.
    pub fn empty() -> Self {
        RoadTopologyBuilder::new().build()
    }

    // ── Dimensions & lookup ───────────────────────────────────────────────

    pub fn junction_count(&self) -> usize {
        self.junction_pos.len()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.junction_pos.is_empty()
    }

    pub fn junction_radius(&self) -> f64 {
        self.junction_radius
    }

    pub fn junction_pos(&self, id: JunctionId) -> Point {
        self.junction_pos[id.index()]
    }

    pub fn junction_name(&self, id: JunctionId) -> &str {
        &self.junction_names[id.index()]
    }

    pub fn junction_id(&self, name: &str) -> Option<JunctionId> {
        self.junction_index.get(name).copied()
    }

    pub fn road(&self, id: RoadId) -> &RoadSegment {
        &self.roads[id.index()]
    }

    pub fn road_id(&self, name: &str) -> Option<RoadId> {
        self.road_index.get(name).copied()
    }

    pub fn roads(&self) -> impl Iterator<Item = (RoadId, &RoadSegment)> + '_ {
        self.roads.iter().enumerate().map(|(i, r)| (RoadId(i as u32), r))
    }

    /// Midpoint of a road's two junction endpoints.
    pub fn road_center(&self, id: RoadId) -> Point {
        let r = &self.roads[id.index()];
        self.junction_pos(r.from).midpoint(self.junction_pos(r.to))
    }

    /// Distance from `p` to the road's centre-line segment.
    pub fn distance_to_road(&self, p: Point, id: RoadId) -> f64 {
        let r = &self.roads[id.index()];
        line_distance(p, self.junction_pos(r.from), self.junction_pos(r.to))
    }

    /// Human-readable id of a location (the topology file's token).
    pub fn location_name(&self, loc: Location) -> &str {
        match loc {
            Location::Junction(j) => self.junction_name(j),
            Location::Road(r) => &self.roads[r.index()].name,
        }
    }

    // ── Classification ────────────────────────────────────────────────────

    /// Nearest junction to `p` and its distance, or `None` for an empty
    /// topology.
    pub fn nearest_junction(&self, p: Point) -> Option<(JunctionId, f64)> {
        self.spatial_idx
            .nearest_neighbor(&[p.x, p.y])
            .map(|e| (e.id, self.junction_pos(e.id).distance(p)))
    }

    /// Classify `p` as on a junction (within the junction radius) or on the
    /// road whose endpoint sum-distance to `p` is minimal.
    ///
    /// Pure function of the static topology; ties between roads resolve to
    /// the lower `RoadId`.  Returns `None` only when no junction lies within
    /// the radius and the topology has no roads.
    pub fn classify(&self, p: Point) -> Option<Location> {
        if let Some((j, d)) = self.nearest_junction(p) {
            if d <= self.junction_radius {
                return Some(Location::Junction(j));
            }
        }

        let mut best: Option<(RoadId, f64)> = None;
        for (id, road) in self.roads() {
            let sum =
                p.distance(self.junction_pos(road.from)) + p.distance(self.junction_pos(road.to));
            if best.is_none_or(|(_, b)| sum < b) {
                best = Some((id, sum));
            }
        }
        best.map(|(id, _)| Location::Road(id))
    }

    /// `true` iff `p` lies within the junction radius of any junction.
    pub fn is_intersection(&self, p: Point) -> bool {
        self.nearest_junction(p)
            .is_some_and(|(_, d)| d <= self.junction_radius)
    }
}

// ── RoadTopologyBuilder ───────────────────────────────────────────────────────

/// Construct a [`RoadTopology`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use sg_core::Point;
/// use sg_topology::RoadTopologyBuilder;
///
/// let mut b = RoadTopologyBuilder::new();
/// let a = b.add_junction("A", Point::new(0.0, 0.0)).unwrap();
/// let c = b.add_junction("C", Point::new(500.0, 0.0)).unwrap();
/// b.add_road("AC", a, c).unwrap();
/// let topo = b.build();
/// assert_eq!(topo.junction_count(), 2);
/// assert_eq!(topo.road_count(), 1);
/// ```
pub struct RoadTopologyBuilder {
    junction_names:  Vec<String>,
    junction_pos:    Vec<Point>,
    junction_index:  HashMap<String, JunctionId>,
    roads:           Vec<RoadSegment>,
    road_index:      HashMap<String, RoadId>,
    junction_radius: f64,
}

impl RoadTopologyBuilder {
    pub fn new() -> Self {
        Self {
            junction_names:  Vec::new(),
            junction_pos:    Vec::new(),
            junction_index:  HashMap::new(),
            roads:           Vec::new(),
            road_index:      HashMap::new(),
            junction_radius: DEFAULT_JUNCTION_RADIUS,
        }
    }

    /// Override the junction classification radius.
    pub fn junction_radius(mut self, radius: f64) -> Self {
        self.junction_radius = radius;
        self
    }

    /// Add a junction.  Returns `None` if `name` is already taken.
    pub fn add_junction(&mut self, name: impl Into<String>, pos: Point) -> Option<JunctionId> {
        let name = name.into();
        if self.junction_index.contains_key(&name) {
            return None;
        }
        let id = JunctionId(self.junction_pos.len() as u32);
        self.junction_index.insert(name.clone(), id);
        self.junction_names.push(name);
        self.junction_pos.push(pos);
        Some(id)
    }

    /// Add a road between two existing junctions.  Returns `None` if `name`
    /// is already taken.
    pub fn add_road(
        &mut self,
        name: impl Into<String>,
        from: JunctionId,
        to: JunctionId,
    ) -> Option<RoadId> {
        let name = name.into();
        if self.road_index.contains_key(&name) {
            return None;
        }
        let id = RoadId(self.roads.len() as u32);
        self.road_index.insert(name.clone(), id);
        self.roads.push(RoadSegment { name, from, to });
        Some(id)
    }

    pub fn junction_id(&self, name: &str) -> Option<JunctionId> {
        self.junction_index.get(name).copied()
    }

    pub fn junction_count(&self) -> usize { self.junction_pos.len() }
    pub fn road_count(&self) -> usize { self.roads.len() }

    /// Consume the builder and bulk-load the junction R-tree.
    pub fn build(self) -> RoadTopology {
        let entries: Vec<JunctionEntry> = self
            .junction_pos
            .iter()
            .enumerate()
            .map(|(i, p)| JunctionEntry { point: [p.x, p.y], id: JunctionId(i as u32) })
            .collect();

        RoadTopology {
            junction_names:  self.junction_names,
            junction_pos:    self.junction_pos,
            junction_index:  self.junction_index,
            roads:           self.roads,
            road_index:      self.road_index,
            junction_radius: self.junction_radius,
            spatial_idx:     RTree::bulk_load(entries),
        }
    }
}

impl Default for RoadTopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
