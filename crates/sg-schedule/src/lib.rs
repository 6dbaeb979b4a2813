//! `sg-schedule` — discrete-event queue and traffic-flow loading.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`event_queue`] | `EventQueue<E>` (`BTreeMap<SimTime, VecDeque<E>>`)        |
//! | [`flow`]        | `Flow` — one source → destination send cycle              |
//! | [`loader`]      | `load_flows_csv`, `load_flows_reader`                     |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Ordering model
//!
//! Events are popped in timestamp order; events sharing a timestamp pop in
//! insertion order.  That FIFO tie-break is what makes a run reproducible:
//! two nodes whose timers expire in the same microsecond are always served
//! in the order they were scheduled.

pub mod error;
pub mod event_queue;
pub mod flow;
pub mod loader;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use event_queue::EventQueue;
pub use flow::Flow;
pub use loader::{load_flows_csv, load_flows_reader};
