use crate::error::{ErrorSeverity, GameError};
use crate::ids::{ActorId, NodeId};
use crate::inventory::InventoryError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("target at distance {distance} is outside act range {min}..={max}")]
    OutOfRange { distance: u32, min: u32, max: u32 },

    #[error("no line of sight from {from} to {to}")]
    NoLineOfSight { from: NodeId, to: NodeId },

    #[error("target {0} is already dead")]
    TargetDead(ActorId),

    #[error("act resource unavailable: {0}")]
    ResourceUnavailable(#[from] InventoryError),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OutOfRange { .. } | Self::NoLineOfSight { .. } | Self::TargetDead(_) => {
                ErrorSeverity::Validation
            }
            Self::ResourceUnavailable(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "COMBAT_OUT_OF_RANGE",
            Self::NoLineOfSight { .. } => "COMBAT_NO_LINE_OF_SIGHT",
            Self::TargetDead(_) => "COMBAT_TARGET_DEAD",
            Self::ResourceUnavailable(_) => "COMBAT_RESOURCE_UNAVAILABLE",
        }
    }
}
