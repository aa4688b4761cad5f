//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! stepping the session, running autoplay or streaming events from specific
//! topics.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use tactics_core::{ActorId, Intention, ScoreManager};

use super::errors::{Result, RuntimeError};
use super::summary::{SectorSnapshot, SessionSummary, TickSummary};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    cancel_tx: Arc<watch::Sender<bool>>,
    event_bus: EventBus,
    player: ActorId,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        cancel_tx: Arc<watch::Sender<bool>>,
        event_bus: EventBus,
        player: ActorId,
    ) -> Self {
        Self {
            command_tx,
            cancel_tx,
            event_bus,
            player,
        }
    }

    /// The human actor the session scores.
    pub fn player(&self) -> ActorId {
        self.player
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Advance the sector by one tick
    pub async fn step(&self) -> Result<TickSummary> {
        self.request(|reply| Command::Step { reply }).await?
    }

    /// Queue an order for a human actor
    pub async fn push_intention(&self, actor: ActorId, intention: Intention) -> Result<()> {
        self.request(|reply| Command::PushIntention {
            actor,
            intention,
            reply,
        })
        .await?
    }

    /// Tick until the player dies or exits, `limit` ticks pass, or
    /// [`cancel`](Self::cancel) is called
    pub async fn autoplay(&self, limit: u64) -> Result<SessionSummary> {
        self.request(|reply| Command::Autoplay { limit, reply }).await?
    }

    pub async fn snapshot(&self) -> Result<SectorSnapshot> {
        self.request(|reply| Command::QuerySnapshot { reply }).await
    }

    pub async fn score(&self) -> Result<ScoreManager> {
        self.request(|reply| Command::QueryScore { reply }).await
    }

    /// Stop a running autoplay after its current tick and shut the worker
    /// down. Commands sent afterwards fail with a closed channel.
    pub fn cancel(&self) {
        self.cancel_tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Interaction` - Every interaction event drained from a tick
    /// - `Topic::Turn` - Tick completion and autoplay lifecycle
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tactics_runtime::Topic;
    ///
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turns.recv().await {
    ///     // Handle turn events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
