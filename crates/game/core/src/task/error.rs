use crate::combat::CombatError;
use crate::error::{ErrorSeverity, GameError};
use crate::ids::{ActorId, ContainerId, NodeId};
use crate::inventory::InventoryError;
use crate::map::MapError;
use crate::person::PersonError;

/// A task could not run although it was valid when it was chosen.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("actor {0} is not in the sector")]
    ActorMissing(ActorId),

    #[error("next path node {0} is blocked")]
    PathBlocked(NodeId),

    #[error("path ended before reaching {0}")]
    TargetNotReached(NodeId),

    #[error("target actor {0} is not in the sector")]
    TargetMissing(ActorId),

    #[error("actor has no usable act")]
    NoUsableAct,

    #[error("container {0} does not exist")]
    ContainerMissing(ContainerId),

    #[error("container {0} was already opened")]
    ContainerAlreadyOpened(ContainerId),

    #[error("container {0} is out of reach")]
    ContainerOutOfReach(ContainerId),

    #[error("prop {0} cannot be used on oneself")]
    PropNotUsable(String),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Person(#[from] PersonError),
}

impl GameError for TaskError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Map(err) => err.severity(),
            Self::Combat(err) => err.severity(),
            Self::Inventory(err) => err.severity(),
            Self::Person(err) => err.severity(),
            Self::ActorMissing(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActorMissing(_) => "TASK_ACTOR_MISSING",
            Self::PathBlocked(_) => "TASK_PATH_BLOCKED",
            Self::TargetNotReached(_) => "TASK_TARGET_NOT_REACHED",
            Self::TargetMissing(_) => "TASK_TARGET_MISSING",
            Self::NoUsableAct => "TASK_NO_USABLE_ACT",
            Self::ContainerMissing(_) => "TASK_CONTAINER_MISSING",
            Self::ContainerAlreadyOpened(_) => "TASK_CONTAINER_ALREADY_OPENED",
            Self::ContainerOutOfReach(_) => "TASK_CONTAINER_OUT_OF_REACH",
            Self::PropNotUsable(_) => "TASK_PROP_NOT_USABLE",
            Self::Map(err) => err.error_code(),
            Self::Combat(err) => err.error_code(),
            Self::Inventory(err) => err.error_code(),
            Self::Person(err) => err.error_code(),
        }
    }
}
