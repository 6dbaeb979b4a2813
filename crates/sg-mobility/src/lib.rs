//! `sg-mobility` — vehicle motion.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`state`]   | `Kinematics` — origin, heading, speed, acceleration        |
//! | [`store`]   | `MobilityStore` — `Vec<Kinematics>` indexed by `NodeId`    |
//! | [`error`]   | `MobilityError`, `MobilityResult<T>`                       |
//!
//! # Movement model
//!
//! Each vehicle moves along a straight line from the point it was placed at,
//! with constant acceleration.  A decelerating vehicle stops when its speed
//! reaches zero; it never reverses.  Positions are evaluated lazily at query
//! time, so the event loop never has to step vehicles forward.
//!
//! Richer mobility (waypoints, lane changes) is out of scope; the protocol
//! only needs "where is node N at time t" and its current acceleration.

pub mod error;
pub mod state;
pub mod store;


pub use error::{MobilityError, MobilityResult};
pub use state::Kinematics;
pub use store::MobilityStore;
