use thiserror::Error;

/// Failure to decode a packet off the channel.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("empty packet")]
    Empty,

    #[error("unknown packet tag {0}")]
    UnknownTag(u8),

    #[error("truncated packet: needed {needed} more bytes, {remaining} left")]
    Truncated { needed: usize, remaining: usize },

    #[error("{0} trailing bytes after packet")]
    Trailing(usize),

    #[error("invalid {field} value {value}")]
    InvalidField { field: &'static str, value: i32 },
}

pub type WireResult<T> = Result<T, WireError>;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    #[error("routing configuration error: {0}")]
    Config(String),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
