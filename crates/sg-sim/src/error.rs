use sg_core::NodeId;
use sg_mobility::MobilityError;
use sg_routing::RoutingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match node count {expected}")]
    NodeCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("flow references {0}, which is not a simulated node")]
    UnknownNode(NodeId),

    #[error("protocol configuration rejected: {0}")]
    Routing(#[from] RoutingError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
