//! Interaction events emitted while a tick runs.
//!
//! Tasks and the scheduler push events into a per-tick list; at the end of
//! the tick the list is delivered to every [`InteractionObserver`] in
//! emission order and returned in the tick report.

use crate::combat::ActUsageOutcome;
use crate::evolution::PerkLevel;
use crate::ids::{ActorId, ContainerId, NodeId, RegionId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InteractionEvent {
    ActorMoved {
        actor: ActorId,
        from: NodeId,
        to: NodeId,
    },
    ActUsed(ActUsageOutcome),
    ContainerOpened {
        actor: ActorId,
        container: ContainerId,
        /// Sids of the props moved into the actor's inventory.
        props: Vec<String>,
    },
    PropUsed {
        actor: ActorId,
        prop: String,
    },
    PerkLeveledUp {
        actor: ActorId,
        sid: String,
        level: PerkLevel,
    },
    ActorDied {
        actor: ActorId,
        killer: Option<ActorId>,
    },
    /// A dead monster left a non-blocking loot pile where it fell.
    LootDropped {
        actor: ActorId,
        container: ContainerId,
        node: NodeId,
        props: Vec<String>,
    },
    /// Human actors standing on an exit node of an out region.
    SectorExit {
        actors: Vec<ActorId>,
        region: RegionId,
    },
}

impl InteractionEvent {
    /// Actor the event is about.
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            Self::ActorMoved { actor, .. }
            | Self::ContainerOpened { actor, .. }
            | Self::PropUsed { actor, .. }
            | Self::PerkLeveledUp { actor, .. }
            | Self::ActorDied { actor, .. }
            | Self::LootDropped { actor, .. } => Some(*actor),
            Self::ActUsed(outcome) => Some(outcome.attacker),
            Self::SectorExit { .. } => None,
        }
    }
}

/// Synchronous subscriber notified at the end of every tick.
pub trait InteractionObserver: Send {
    fn on_event(&mut self, event: &InteractionEvent);

    /// Called once after the tick's events, with the new turn number.
    fn on_turn_end(&mut self, _turn: u64) {}
}
