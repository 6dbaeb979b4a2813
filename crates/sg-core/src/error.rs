//! Framework error type.
//!
//! Sub-crates define their own error enums and convert them into `SgError`
//! via `From` impls where a common type is convenient.

use thiserror::Error;

use crate::NodeId;

/// The top-level error type for `sg-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum SgError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `sg-*` crates.
pub type SgResult<T> = Result<T, SgError>;
