//! Topology error type.

use thiserror::Error;

/// Errors produced by `sg-topology`.
///
/// Every parse error carries the 1-based line number of the offending
/// record so a bad topology file is rejected with a usable message.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("line {line}: malformed record: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("line {line}: road references unknown junction(s) in {endpoints:?}")]
    UnknownJunction { line: usize, endpoints: String },

    #[error("line {line}: duplicate {kind} id {name:?}")]
    Duplicate { line: usize, kind: &'static str, name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
