use sg_core::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("node {0} is not in the mobility store")]
    UnknownNode(NodeId),

    #[error("invalid motion for node {node}: {reason}")]
    InvalidMotion { node: NodeId, reason: String },
}

pub type MobilityResult<T> = Result<T, MobilityError>;
