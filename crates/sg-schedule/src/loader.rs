//! Traffic-flow CSV loader.
//!
//! # CSV format
//!
//! One row per send cycle.  `start_secs` is relative to the run's flow-start
//! offset (see `SimConfig::flow_start_secs`).
//!
//! ```csv
//! source,destination,start_secs
//! 0,17,0.0
//! 4,17,2.5
//! 9,3,5.0
//! ```
//!
//! Rows are returned sorted by start time; rows sharing a start time keep
//! their file order.  A row whose source equals its destination is rejected.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use sg_core::{NodeId, SimTime};

use crate::{Flow, ScheduleError, ScheduleResult};

#[derive(Deserialize)]
struct FlowRecord {
    source:      u32,
    destination: u32,
    start_secs:  f64,
}

/// Load flows from a CSV file.
pub fn load_flows_csv(path: &Path) -> ScheduleResult<Vec<Flow>> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_flows_reader(file)
}

/// Like [`load_flows_csv`] but accepts any `Read` source.
pub fn load_flows_reader<R: Read>(reader: R) -> ScheduleResult<Vec<Flow>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut flows = Vec::new();

    for (i, result) in csv_reader.deserialize::<FlowRecord>().enumerate() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        // Header is line 1.
        let line = i + 2;
        if row.source == row.destination {
            return Err(ScheduleError::Parse(format!(
                "line {line}: source and destination are both {}",
                row.source
            )));
        }
        if !row.start_secs.is_finite() || row.start_secs < 0.0 {
            return Err(ScheduleError::Parse(format!(
                "line {line}: invalid start_secs {}",
                row.start_secs
            )));
        }
        flows.push(Flow::new(
            NodeId(row.source),
            NodeId(row.destination),
            SimTime::from_secs_f64(row.start_secs),
        ));
    }

    // Stable: same-time rows keep file order.
    flows.sort_by_key(|f| f.start);
    Ok(flows)
}
