//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, content loading and scenario
//! setup so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use tactics_core::ActorId;

use super::summary::StopReason;
use crate::scenario::ScenarioError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("actor {0} is not controlled by a human player")]
    NotHumanActor(ActorId),

    #[error("session already finished: {0}")]
    SessionFinished(StopReason),
}
