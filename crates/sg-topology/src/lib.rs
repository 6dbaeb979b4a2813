//! `sg-topology` — road topology, point classification, and reachability.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`topology`] | `RoadTopology` (junctions + R-tree, roads), `Location`,     |
//! |              | `RoadTopologyBuilder`                                       |
//! | [`loader`]   | `load_topology_file`, `load_topology_reader`                |
//! | [`reach`]    | `LinkSample`, road reach probability, nearest road query    |
//! | [`error`]    | `TopologyError`, `TopologyResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod loader;
pub mod reach;
pub mod topology;


pub use error::{TopologyError, TopologyResult};
pub use loader::{load_topology_file, load_topology_reader};
pub use reach::LinkSample;
pub use topology::{
    DEFAULT_JUNCTION_RADIUS, Location, RoadSegment, RoadTopology, RoadTopologyBuilder,
};
