//! `sg-sim` — discrete-event loop for the SIGO simulator.
//!
//! # Event loop
//!
//! ```text
//! boot: every node's start() → first beacon timer
//!
//! while next event time ≤ end:
//!   Timer{node, timer}   → SigoNode::on_timer
//!   Deliver{to, bytes}   → SigoNode::on_packet   (decode errors: warn + count)
//!   StartFlow(flow)      → open send epoch, SigoNode::originate at the source
//!
//!   apply actions in order:
//!     Broadcast / Unicast  → channel draws per-receiver loss, pushes Deliver
//!     Schedule             → push Timer at now + after_us
//!     Sent / Arrived       → delivery log (Arrived only once per epoch)
//!     Dropped              → drop counters
//!
//! on_sim_end(end, &SimulationContext)
//! ```
//!
//! Nodes never see the queue.  All run-wide counters and per-destination
//! start/finish times live in [`SimulationContext`], owned by the [`Sim`] and
//! lent to observers, so independent runs can execute on separate threads.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sg_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(config, topology, mobility)
//!     .protocol(sigo_config)
//!     .flows(flows)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("delivered {}", sim.context.delivered_count());
//! ```

pub mod builder;
pub mod channel;
pub mod context;
pub mod error;
pub mod event;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use channel::ChannelConfig;
pub use context::{FlowOutcome, SimulationContext};
pub use error::{SimError, SimResult};
pub use event::Event;
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
