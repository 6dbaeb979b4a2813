//! `sg-output` — delivery log writers for the SIGO simulator.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                          |
//! |-----------|---------|--------------------------------------------------------|
//! | *(none)*  | CSV     | `send_log.csv`, `receive_log.csv`, `flow_summary.csv`  |
//! | `sqlite`  | SQLite  | `output.db`                                            |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `sg_sim::SimObserver` and writes everything once, when
//! the run ends.  [`DeliveryStats`] condenses a finished run into delivery
//! ratio, mean delay and transmission counts.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sg_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! println!("{}", obs.stats().unwrap());
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod stats;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{FlowSummaryRow, ReceiveLogRow, SendLogRow};
pub use stats::DeliveryStats;
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
