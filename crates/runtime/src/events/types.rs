//! Event payloads that only exist in the runtime.

use serde::{Deserialize, Serialize};

use crate::api::{SessionSummary, StopReason};

/// Turn lifecycle events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// A tick finished; counts refer to that tick only.
    TickCompleted { turn: u64, events: usize, faults: usize },

    /// An autoplay run started.
    AutoplayStarted { turn: u64, limit: u64 },

    /// An autoplay run or the whole session stopped.
    Stopped { reason: StopReason, summary: Box<SessionSummary> },
}
