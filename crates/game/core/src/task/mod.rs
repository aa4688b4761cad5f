//! Actor tasks: one unit of work executed during an actor's turn.
//!
//! Every task follows `created → executing → complete`. The scheduler calls
//! [`TaskExecution::execute`] once per turn while the task is incomplete; a
//! returned [`TaskError`] forfeits the rest of the actor's turn.

mod attack;
mod error;
mod idle;
mod move_task;
mod open_container;
mod use_self;

pub use attack::AttackTask;
pub use error::TaskError;
pub use idle::IdleTask;
pub use move_task::MoveTask;
pub use open_container::OpenContainerTask;
pub use use_self::UseSelfTask;

use tracing::debug;

use crate::actor::Actor;
use crate::events::InteractionEvent;
use crate::evolution::{EvolutionEvent, EvolutionModule, JobKind};
use crate::ids::ActorId;
use crate::random::RandomSource;
use crate::scheme::SchemeOracle;
use crate::sector::Sector;

/// Everything a task may touch while it executes.
pub struct TaskContext<'a> {
    pub sector: &'a mut Sector,
    pub random: &'a mut dyn RandomSource,
    pub schemes: &'a dyn SchemeOracle,
    /// Events emitted so far this tick, in order.
    pub events: &'a mut Vec<InteractionEvent>,
}

pub trait TaskExecution {
    /// True if executing now is expected to succeed.
    fn can_execute(&self, actor: ActorId, sector: &Sector) -> bool;

    fn execute(&mut self, actor: ActorId, ctx: &mut TaskContext<'_>) -> Result<(), TaskError>;

    fn is_complete(&self) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActorTask {
    Move(MoveTask),
    Attack(AttackTask),
    Idle(IdleTask),
    UseSelf(UseSelfTask),
    OpenContainer(OpenContainerTask),
}

impl ActorTask {
    pub fn kind(&self) -> &'static str {
        match self {
            ActorTask::Move(_) => "move",
            ActorTask::Attack(_) => "attack",
            ActorTask::Idle(_) => "idle",
            ActorTask::UseSelf(_) => "use-self",
            ActorTask::OpenContainer(_) => "open-container",
        }
    }

    fn inner(&self) -> &dyn TaskExecution {
        match self {
            ActorTask::Move(task) => task,
            ActorTask::Attack(task) => task,
            ActorTask::Idle(task) => task,
            ActorTask::UseSelf(task) => task,
            ActorTask::OpenContainer(task) => task,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn TaskExecution {
        match self {
            ActorTask::Move(task) => task,
            ActorTask::Attack(task) => task,
            ActorTask::Idle(task) => task,
            ActorTask::UseSelf(task) => task,
            ActorTask::OpenContainer(task) => task,
        }
    }
}

impl TaskExecution for ActorTask {
    fn can_execute(&self, actor: ActorId, sector: &Sector) -> bool {
        self.inner().can_execute(actor, sector)
    }

    fn execute(&mut self, actor: ActorId, ctx: &mut TaskContext<'_>) -> Result<(), TaskError> {
        self.inner_mut().execute(actor, ctx)
    }

    fn is_complete(&self) -> bool {
        self.inner().is_complete()
    }
}

/// Advances an actor's perk jobs and levels up every perk that became ready.
pub(crate) fn progress_perk_jobs(
    actor: &mut Actor,
    kind: JobKind,
    amount: u32,
    schemes: &dyn SchemeOracle,
    events: &mut Vec<InteractionEvent>,
) {
    let id = actor.id;
    let Some(evolution) = actor.person.module_safe_mut::<EvolutionModule>() else {
        return;
    };
    for sid in evolution.progress_job(kind, amount) {
        match evolution.perk_level_up(&sid, schemes) {
            Ok(EvolutionEvent::PerkLeveledUp { sid, level }) => {
                debug!(actor = %id, perk = %sid, ?level, "perk leveled up");
                events.push(InteractionEvent::PerkLeveledUp { actor: id, sid, level });
            }
            Ok(_) => {}
            Err(err) => debug!(actor = %id, perk = %sid, %err, "perk level-up skipped"),
        }
    }
}
