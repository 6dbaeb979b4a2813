//! The `OutputWriter` trait implemented by all backend writers.

use crate::{FlowSummaryRow, OutputResult, ReceiveLogRow, SendLogRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors are stored by [`SimOutputObserver`](crate::SimOutputObserver)
/// and retrieved with its `take_error`.
pub trait OutputWriter {
    fn write_sends(&mut self, rows: &[SendLogRow]) -> OutputResult<()>;

    fn write_receives(&mut self, rows: &[ReceiveLogRow]) -> OutputResult<()>;

    fn write_flows(&mut self, rows: &[FlowSummaryRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
