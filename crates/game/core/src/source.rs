//! Task sources: who decides what an actor does each turn.

use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

use crate::actor::Actor;
use crate::bot::{ArchetypeStrategyFactory, BotLogic, StrategyFactory};
use crate::ids::{ActorId, ContainerId, NodeId, Player};
use crate::random::RandomSource;
use crate::sector::Sector;
use crate::task::{ActorTask, AttackTask, IdleTask, MoveTask, OpenContainerTask, TaskError, TaskExecution, UseSelfTask};

/// Supplies the current task of the actors it handles. Polled once per actor
/// per tick.
pub trait ActorTaskSource: Send {
    fn handles(&self, actor: &Actor) -> bool;

    fn current_task(
        &mut self,
        actor: ActorId,
        sector: &Sector,
        random: &mut dyn RandomSource,
    ) -> Option<&mut ActorTask>;

    fn on_task_fault(&mut self, _actor: ActorId, _error: &TaskError) {}

    fn on_actor_removed(&mut self, _actor: ActorId) {}
}

/// A player's order, turned into a task when its turn comes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intention {
    MoveTo(NodeId),
    Attack(ActorId),
    UseProp(String),
    OpenContainer(ContainerId),
    Wait(u32),
}

impl Intention {
    fn into_task(self, actor: &Actor, sector: &Sector) -> ActorTask {
        match self {
            Intention::MoveTo(target) => ActorTask::Move(MoveTask::new(&sector.map, actor.id, actor.node, target)),
            Intention::Attack(target) => ActorTask::Attack(AttackTask::new(target)),
            Intention::UseProp(sid) => ActorTask::UseSelf(UseSelfTask::new(sid)),
            Intention::OpenContainer(container) => ActorTask::OpenContainer(OpenContainerTask::new(container)),
            Intention::Wait(turns) => ActorTask::Idle(IdleTask::new(turns)),
        }
    }
}

/// FIFO intention queues for human-controlled actors.
#[derive(Debug, Default)]
pub struct HumanTaskSource {
    queues: BTreeMap<ActorId, VecDeque<Intention>>,
    current: BTreeMap<ActorId, ActorTask>,
}

impl HumanTaskSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_intention(&mut self, actor: ActorId, intention: Intention) {
        self.queues.entry(actor).or_default().push_back(intention);
    }

    pub fn pending(&self, actor: ActorId) -> usize {
        self.queues.get(&actor).map_or(0, VecDeque::len) + usize::from(self.has_active_task(actor))
    }

    pub fn has_active_task(&self, actor: ActorId) -> bool {
        self.current.get(&actor).is_some_and(|task| !task.is_complete())
    }

    pub fn clear(&mut self, actor: ActorId) {
        self.queues.remove(&actor);
        self.current.remove(&actor);
    }
}

impl ActorTaskSource for HumanTaskSource {
    fn handles(&self, actor: &Actor) -> bool {
        actor.player.is_human()
    }

    fn current_task(
        &mut self,
        actor: ActorId,
        sector: &Sector,
        _random: &mut dyn RandomSource,
    ) -> Option<&mut ActorTask> {
        if !self.has_active_task(actor) {
            let intention = self.queues.get_mut(&actor)?.pop_front()?;
            let actor_ref = sector.actors.get(actor)?;
            debug!(%actor, ?intention, "intention taken");
            self.current.insert(actor, intention.into_task(actor_ref, sector));
        }
        self.current.get_mut(&actor)
    }

    fn on_task_fault(&mut self, actor: ActorId, _error: &TaskError) {
        self.current.remove(&actor);
    }

    fn on_actor_removed(&mut self, actor: ActorId) {
        self.clear(actor);
    }
}

/// One [`BotLogic`] per controlled actor, created on first use.
///
/// Normally drives [`Player::Bot`] actors; autoplay points one at the human
/// player instead.
pub struct BotTaskSource {
    logics: BTreeMap<ActorId, BotLogic>,
    factory: Box<dyn StrategyFactory>,
    controls: Player,
}

impl BotTaskSource {
    pub fn new(factory: Box<dyn StrategyFactory>) -> Self {
        Self::for_player(Player::Bot, factory)
    }

    pub fn for_player(controls: Player, factory: Box<dyn StrategyFactory>) -> Self {
        Self {
            logics: BTreeMap::new(),
            factory,
            controls,
        }
    }

    pub fn logic(&self, actor: ActorId) -> Option<&BotLogic> {
        self.logics.get(&actor)
    }
}

impl Default for BotTaskSource {
    fn default() -> Self {
        Self::new(Box::new(ArchetypeStrategyFactory))
    }
}

impl ActorTaskSource for BotTaskSource {
    fn handles(&self, actor: &Actor) -> bool {
        actor.player == self.controls
    }

    fn current_task(
        &mut self,
        actor: ActorId,
        sector: &Sector,
        random: &mut dyn RandomSource,
    ) -> Option<&mut ActorTask> {
        let actor_ref = sector.actors.get(actor)?;
        let factory = &self.factory;
        let logic = self
            .logics
            .entry(actor)
            .or_insert_with(|| BotLogic::new(actor, factory.create(actor_ref, sector)));
        logic.current_task(sector, random.as_decision())
    }

    fn on_task_fault(&mut self, actor: ActorId, _error: &TaskError) {
        if let Some(logic) = self.logics.get_mut(&actor) {
            logic.on_task_fault();
        }
    }

    fn on_actor_removed(&mut self, actor: ActorId) {
        self.logics.remove(&actor);
    }
}
