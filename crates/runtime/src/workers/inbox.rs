//! Intentions pushed by clients between ticks.

use std::sync::{Arc, Mutex, PoisonError};

use tactics_core::{Actor, ActorId, ActorTask, ActorTaskSource, HumanTaskSource, Intention, RandomSource, Sector, TaskError};

/// Shared queue the handle side writes and the game loop drains.
#[derive(Clone, Debug, Default)]
pub(crate) struct IntentionInbox {
    pending: Arc<Mutex<Vec<(ActorId, Intention)>>>,
}

impl IntentionInbox {
    pub(crate) fn push(&self, actor: ActorId, intention: Intention) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((actor, intention));
    }

    fn has_pending(&self, actor: ActorId) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|(id, _)| *id == actor)
    }

    fn drain(&self) -> Vec<(ActorId, Intention)> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Human task source fed from an [`IntentionInbox`].
///
/// Only claims a human actor while it has orders, so a source registered
/// after it (the autopilot) drives the actor otherwise.
#[derive(Debug, Default)]
pub(crate) struct InboxTaskSource {
    inbox: IntentionInbox,
    inner: HumanTaskSource,
}

impl InboxTaskSource {
    pub(crate) fn new(inbox: IntentionInbox) -> Self {
        Self {
            inbox,
            inner: HumanTaskSource::new(),
        }
    }
}

impl ActorTaskSource for InboxTaskSource {
    fn handles(&self, actor: &Actor) -> bool {
        self.inner.handles(actor) && (self.inner.pending(actor.id) > 0 || self.inbox.has_pending(actor.id))
    }

    fn current_task(&mut self, actor: ActorId, sector: &Sector, random: &mut dyn RandomSource) -> Option<&mut ActorTask> {
        for (id, intention) in self.inbox.drain() {
            self.inner.push_intention(id, intention);
        }
        self.inner.current_task(actor, sector, random)
    }

    fn on_task_fault(&mut self, actor: ActorId, error: &TaskError) {
        self.inner.on_task_fault(actor, error);
    }

    fn on_actor_removed(&mut self, actor: ActorId) {
        self.inner.on_actor_removed(actor);
    }
}
