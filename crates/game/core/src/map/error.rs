use crate::error::{ErrorSeverity, GameError};
use crate::ids::{ActorId, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("nodes {a} and {b} are not hex-adjacent")]
    NotAdjacent { a: NodeId, b: NodeId },

    #[error("node {node} is already held by actor {holder}")]
    NodeAlreadyHeld { node: NodeId, holder: ActorId },

    #[error("node {node} is not held by actor {actor}")]
    NodeNotHeld { node: NodeId, actor: ActorId },

    #[error("node {0} is not passable")]
    Impassable(NodeId),

    #[error("actor {0} is not on the map")]
    ActorNotFound(ActorId),
}

impl GameError for MapError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownNode(_) | Self::NotAdjacent { .. } | Self::Impassable(_) | Self::ActorNotFound(_) => {
                ErrorSeverity::Validation
            }
            Self::NodeAlreadyHeld { .. } | Self::NodeNotHeld { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownNode(_) => "MAP_UNKNOWN_NODE",
            Self::NotAdjacent { .. } => "MAP_NOT_ADJACENT",
            Self::NodeAlreadyHeld { .. } => "MAP_NODE_ALREADY_HELD",
            Self::NodeNotHeld { .. } => "MAP_NODE_NOT_HELD",
            Self::Impassable(_) => "MAP_IMPASSABLE",
            Self::ActorNotFound(_) => "MAP_ACTOR_NOT_FOUND",
        }
    }
}
