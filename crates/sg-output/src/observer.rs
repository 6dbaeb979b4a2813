//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use log::warn;

use sg_core::SimTime;
use sg_sim::{SimObserver, SimulationContext};

use crate::row::{FlowSummaryRow, ReceiveLogRow, SendLogRow};
use crate::writer::OutputWriter;
use crate::{DeliveryStats, OutputError, OutputResult};

/// A [`SimObserver`] that writes the send log, receive log and flow
/// summary to any [`OutputWriter`] backend when the run ends.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    stats:      Option<DeliveryStats>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, stats: None, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Statistics of the finished run; `None` before `on_sim_end`.
    pub fn stats(&self) -> Option<&DeliveryStats> {
        self.stats.as_ref()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_all(&mut self, ctx: &SimulationContext) -> OutputResult<()> {
        let sends: Vec<SendLogRow> = ctx.log.sends.iter().map(SendLogRow::from).collect();
        let receives: Vec<ReceiveLogRow> =
            ctx.log.receives.iter().map(ReceiveLogRow::from).collect();
        let flows: Vec<FlowSummaryRow> = ctx.flows.iter().map(FlowSummaryRow::from).collect();
        self.writer.write_sends(&sends)?;
        self.writer.write_receives(&receives)?;
        self.writer.write_flows(&flows)?;
        self.writer.finish()
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_sim_end(&mut self, end: SimTime, context: &SimulationContext) {
        self.stats = Some(DeliveryStats::from_context(context));
        if let Err(e) = self.write_all(context) {
            warn!("writing delivery logs at {end} failed: {e}");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}
