//! Plain data returned by the session worker.
use std::fmt;

use serde::{Deserialize, Serialize};
use tactics_core::{
    ActorId, DetailedLifetime, InteractionEvent, NodeId, OffsetCoords, Player, RegionId, ScoreManager,
};

/// Why a session or an autoplay run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    PlayerDied,
    SectorExited(RegionId),
    IterationLimit,
    Cancelled,
}

impl StopReason {
    /// Death and exit end the session; the other reasons only end a run.
    pub fn is_terminal(self) -> bool {
        matches!(self, StopReason::PlayerDied | StopReason::SectorExited(_))
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::PlayerDied => write!(f, "player died"),
            StopReason::SectorExited(region) => write!(f, "sector exited through {region}"),
            StopReason::IterationLimit => write!(f, "iteration limit reached"),
            StopReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Outcome of one tick as seen by a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    pub turn: u64,
    pub events: Vec<InteractionEvent>,
    pub faults: usize,
    pub stopped: Option<StopReason>,
}

/// Final account of an autoplay run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub reason: StopReason,
    pub turn: u64,
    pub iterations: u64,
    pub score: ScoreManager,
    pub lifetime: DetailedLifetime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub id: ActorId,
    pub player: Player,
    pub sid: String,
    pub node: NodeId,
    pub coords: OffsetCoords,
    pub health: i32,
}

/// Read-only copy of what stands on the map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorSnapshot {
    pub turn: u64,
    pub actors: Vec<ActorSnapshot>,
    pub containers: usize,
}

impl SectorSnapshot {
    pub fn actor(&self, id: ActorId) -> Option<&ActorSnapshot> {
        self.actors.iter().find(|actor| actor.id == id)
    }
}
