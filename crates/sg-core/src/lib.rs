//! `sg-core` — foundational types for the SIGO vehicular routing simulator.
//!
//! This crate is a dependency of every other `sg-*` crate.  It has no `sg-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `JunctionId`, `RoadId`                      |
//! | [`geo`]         | `Point`, distance / bearing / angle / line distance   |
//! | [`time`]        | `SimTime` (µs), `SimClock`, `SimConfig`               |
//! | [`rng`]         | `NodeRng` (per-node), `NodeRngs`, `SimRng` (global)   |
//! | [`error`]       | `SgError`, `SgResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{SgError, SgResult};
pub use geo::Point;
pub use ids::{JunctionId, NodeId, RoadId};
pub use rng::{NodeRng, NodeRngs, SimRng};
pub use time::{SimClock, SimConfig, SimTime};
