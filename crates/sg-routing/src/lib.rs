//! `sg-routing` — the SIGO greedy forwarding and local-recovery protocol.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                          |
//! |----------------|-------------------------------------------------------------------|
//! | [`config`]     | `SigoConfig`, `RecoveryMode`                                      |
//! | [`wire`]       | `Packet` sum type and the big-endian header codec                 |
//! | [`link`]       | transmission-rate (`rt`) and ETX estimation                       |
//! | [`predict`]    | dead-reckoning position prediction                                |
//! | [`neighbor`]   | `NeighborTable` built from Hello beacons, TTL eviction            |
//! | [`priority`]   | `Candidate`, `CandidateSet`, greedy candidate selection           |
//! | [`forward`]    | `Contention` — per-destination pending relays and fire tokens     |
//! | [`recovery`]   | SIGO geometric recovery ranking, JBR next-hop decision            |
//! | [`behavior`]   | `NodeBehavior` — honest or black-hole                             |
//! | [`action`]     | `Action`, `Timer`, `DropReason` — what a node asks the sim to do  |
//! | [`record`]     | `SendRecord`, `ReceiveRecord`, `DeliveryLog`                      |
//! | [`node`]       | `SigoNode` — the per-vehicle protocol instance                    |
//! | [`error`]      | `WireError`, `RoutingError`                                       |
//!
//! # Execution model
//!
//! A [`SigoNode`] never touches the event queue or the channel.  Every
//! callback takes a read-only [`NodeContext`] plus the node's own RNG and
//! returns a `Vec<Action>`; the simulation loop applies those actions in a
//! separate phase.  Timers are never cancelled: a contention timer carries a
//! token, and a timer whose token no longer matches the node's pending relay
//! fires as a no-op.

pub mod action;
pub mod behavior;
pub mod config;
pub mod context;
pub mod error;
pub mod forward;
pub mod link;
pub mod neighbor;
pub mod node;
pub mod predict;
pub mod priority;
pub mod record;
pub mod recovery;
pub mod wire;


pub use action::{Action, DropReason, Timer};
pub use behavior::NodeBehavior;
pub use config::{RecoveryMode, SigoConfig};
pub use context::NodeContext;
pub use error::{RoutingError, RoutingResult, WireError, WireResult};
pub use forward::{Contention, Hop, PendingForward, RelayJob, RelayMode};
pub use link::{ETX_CEILING, etx, transmission_rate};
pub use neighbor::{NeighborRecord, NeighborTable, NeighborView};
pub use node::SigoNode;
pub use priority::{Candidate, CandidateSet, MAX_CANDIDATES, candidate_count, select_candidates};
pub use record::{DeliveryLog, ReceiveRecord, SendRecord};
pub use recovery::{decide_next_hop, sigo_candidates};
pub use wire::{HelloHeader, JbrHeader, Packet, PacketKind, RecoverHeader, SendHeader, WIRE_NO_NODE};
