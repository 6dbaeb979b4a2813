//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `send_log.csv`
//! - `receive_log.csv`
//! - `flow_summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{FlowSummaryRow, OutputResult, ReceiveLogRow, SendLogRow};

pub const SEND_HEADER: [&str; 11] = [
    "time_secs", "sender", "x", "y", "dest", "dest_x", "dest_y", "hop_count", "kind", "candidates",
    "best_priority",
];
pub const RECEIVE_HEADER: [&str; 9] =
    ["time_secs", "receiver", "x", "y", "sender", "sender_x", "sender_y", "hop_count", "kind"];
pub const FLOW_HEADER: [&str; 7] =
    ["source", "destination", "start_secs", "delivered", "finish_secs", "delay_secs", "hop_count"];

/// Writes delivery logs to three CSV files.
pub struct CsvWriter {
    sends:    Writer<File>,
    receives: Writer<File>,
    flows:    Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the three files and write their headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut sends = Writer::from_path(dir.join("send_log.csv"))?;
        sends.write_record(SEND_HEADER)?;

        let mut receives = Writer::from_path(dir.join("receive_log.csv"))?;
        receives.write_record(RECEIVE_HEADER)?;

        let mut flows = Writer::from_path(dir.join("flow_summary.csv"))?;
        flows.write_record(FLOW_HEADER)?;

        Ok(Self { sends, receives, flows, finished: false })
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_sends(&mut self, rows: &[SendLogRow]) -> OutputResult<()> {
        for row in rows {
            self.sends.write_record(&[
                row.time_secs.to_string(),
                row.sender.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.dest.to_string(),
                row.dest_x.to_string(),
                row.dest_y.to_string(),
                row.hop_count.to_string(),
                row.kind.to_string(),
                row.candidates.clone(),
                row.best_priority.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_receives(&mut self, rows: &[ReceiveLogRow]) -> OutputResult<()> {
        for row in rows {
            self.receives.write_record(&[
                row.time_secs.to_string(),
                row.receiver.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.sender.to_string(),
                row.sender_x.to_string(),
                row.sender_y.to_string(),
                row.hop_count.to_string(),
                row.kind.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_flows(&mut self, rows: &[FlowSummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.flows.write_record(&[
                row.source.to_string(),
                row.destination.to_string(),
                row.start_secs.to_string(),
                (row.delivered as u8).to_string(),
                opt(row.finish_secs),
                opt(row.delay_secs),
                opt(row.hop_count),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.sends.flush()?;
        self.receives.flush()?;
        self.flows.flush()?;
        Ok(())
    }
}
