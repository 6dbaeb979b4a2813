//! Simulation observer trait for progress reporting and data collection.

use sg_core::{NodeId, SimTime};
use sg_routing::{DropReason, ReceiveRecord, SendRecord};

use crate::SimulationContext;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] as protocol events
/// happen.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: drop printer
///
/// ```rust,ignore
/// struct DropPrinter;
///
/// impl SimObserver for DropPrinter {
///     fn on_drop(&mut self, at: SimTime, node: NodeId, dest: NodeId, _hop: u32, reason: DropReason) {
///         println!("{at}: {node} dropped packet for {dest}: {}", reason.as_str());
///     }
/// }
/// ```
pub trait SimObserver {
    /// A data packet (SEND, RECOVER or JBR) was put on the air.
    fn on_send(&mut self, _record: &SendRecord) {}

    /// A destination received its packet for the first time this epoch.
    fn on_receive(&mut self, _record: &ReceiveRecord) {}

    /// A node gave up on a packet.
    fn on_drop(
        &mut self,
        _at: SimTime,
        _node: NodeId,
        _dest: NodeId,
        _hop: u32,
        _reason: DropReason,
    ) {
    }

    /// Called once after the last event at or before the end time.
    ///
    /// The context holds the full delivery log and per-flow outcomes.
    fn on_sim_end(&mut self, _end: SimTime, _context: &SimulationContext) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
