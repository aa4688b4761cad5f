//! Bot decision making.
//!
//! Every bot runs the same three-state machine:
//!
//! - **Bypass**: walk to the next patrol target chosen by the strategy.
//! - **Idle**: wait a random number of turns after reaching a target.
//! - **Pursuit**: chase and attack the nearest visible intruder.
//!
//! Archetypes differ only in their [`PatrolStrategy`].

mod strategy;

pub use strategy::{
    ArchetypeStrategyFactory, PatrolContext, PatrolRouteStrategy, PatrolStrategy, RoamingStrategy, StrategyFactory,
};

use tracing::debug;

use crate::actor::Actor;
use crate::ids::{ActorId, NodeId};
use crate::map::{PathFindingContext, PathFlags};
use crate::random::DecisionSource;
use crate::sector::Sector;
use crate::task::{ActorTask, AttackTask, IdleTask, MoveTask, TaskExecution};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotState {
    Bypass,
    Pursuit { intruder: ActorId },
    Idle,
}

#[derive(Debug)]
pub struct BotLogic {
    actor: ActorId,
    state: BotState,
    strategy: Box<dyn PatrolStrategy>,
    task: Option<ActorTask>,
    /// Turns the cached pursuit path may still be reused.
    pursuit_counter: u32,
    /// Pending notice for the strategy that a pursuit interrupted the patrol.
    interrupted: bool,
}

impl BotLogic {
    pub fn new(actor: ActorId, strategy: Box<dyn PatrolStrategy>) -> Self {
        Self {
            actor,
            state: BotState::Bypass,
            strategy,
            task: None,
            pursuit_counter: 0,
            interrupted: false,
        }
    }

    pub fn state(&self) -> BotState {
        self.state
    }

    /// Decides what the bot does this turn.
    pub fn current_task(&mut self, sector: &Sector, random: &mut dyn DecisionSource) -> Option<&mut ActorTask> {
        let me = sector.actors.get(self.actor).filter(|a| !a.is_dead())?;

        if let Some(intruder) = find_intruder(me, sector) {
            match self.state {
                BotState::Pursuit { intruder: current } if current == intruder => {}
                BotState::Pursuit { .. } => self.reset_pursuit(),
                BotState::Bypass | BotState::Idle => {
                    debug!(bot = %self.actor, %intruder, "intruder detected");
                    self.interrupted = true;
                    self.reset_pursuit();
                }
            }
            self.state = BotState::Pursuit { intruder };
            return self.pursue(me, intruder, sector);
        }

        if let BotState::Pursuit { intruder } = self.state {
            let target_alive = sector.actors.get(intruder).is_some_and(|a| !a.is_dead());
            if target_alive && self.pursuit_counter > 0 && self.cached_move_executable(sector) {
                self.pursuit_counter -= 1;
                return self.task.as_mut();
            }
            debug!(bot = %self.actor, %intruder, "pursuit abandoned");
            self.state = BotState::Bypass;
            self.task = None;
        }

        match self.state {
            BotState::Idle => self.idle(me, sector, random),
            _ => self.bypass(me, sector, random),
        }
    }

    /// Drops the current task so the next decision replans.
    pub fn on_task_fault(&mut self) {
        self.task = None;
        self.pursuit_counter = 0;
    }

    fn reset_pursuit(&mut self) {
        self.task = None;
        self.pursuit_counter = 0;
    }

    fn cached_move_executable(&self, sector: &Sector) -> bool {
        matches!(&self.task, Some(ActorTask::Move(task)) if task.can_execute(self.actor, sector))
    }

    fn pursue(&mut self, me: &Actor, intruder: ActorId, sector: &Sector) -> Option<&mut ActorTask> {
        let attack = AttackTask::new(intruder);
        if attack.can_execute(self.actor, sector) {
            self.task = Some(ActorTask::Attack(attack));
            return self.task.as_mut();
        }

        if self.pursuit_counter > 0 && self.cached_move_executable(sector) {
            self.pursuit_counter -= 1;
            return self.task.as_mut();
        }

        self.pursuit_counter = sector.config.pursuit_counter;
        let target_node = sector.actors.get(intruder)?.node;
        let context = PathFindingContext::for_actor(self.actor).with_flags(PathFlags::ALLOW_OCCUPIED_TARGET);
        let mut path = sector.map.find_path(me.node, target_node, &context);
        if path.last() == Some(&target_node) {
            path.pop();
        }
        let Some(&stop) = path.last() else {
            self.task = None;
            return None;
        };
        debug!(bot = %self.actor, %intruder, steps = path.len(), "pursuit path planned");
        self.task = Some(ActorTask::Move(MoveTask::from_path(me.node, stop, path)));
        self.task.as_mut()
    }

    fn bypass(&mut self, me: &Actor, sector: &Sector, random: &mut dyn DecisionSource) -> Option<&mut ActorTask> {
        self.state = BotState::Bypass;

        if let Some(ActorTask::Move(task)) = &self.task {
            let target = task.target();
            if !task.is_complete() {
                if task.can_execute(self.actor, sector) {
                    return self.task.as_mut();
                }
                return self.start_patrol_leg(me, target, sector, random);
            }
            return self.finish_patrol_leg(me, target, sector, random);
        }

        let ctx = PatrolContext {
            actor: self.actor,
            node: me.node,
            sector,
            interrupted: std::mem::take(&mut self.interrupted),
        };
        match self.strategy.pick_next_patrol_target(&ctx, random) {
            Some(target) => self.start_patrol_leg(me, target, sector, random),
            None => self.enter_idle(sector, random),
        }
    }

    fn start_patrol_leg(
        &mut self,
        me: &Actor,
        target: NodeId,
        sector: &Sector,
        random: &mut dyn DecisionSource,
    ) -> Option<&mut ActorTask> {
        let task = MoveTask::new(&sector.map, self.actor, me.node, target);
        if task.is_complete() {
            return self.finish_patrol_leg(me, target, sector, random);
        }
        debug!(bot = %self.actor, %target, "patrol leg started");
        self.task = Some(ActorTask::Move(task));
        self.task.as_mut()
    }

    fn finish_patrol_leg(
        &mut self,
        me: &Actor,
        target: NodeId,
        sector: &Sector,
        random: &mut dyn DecisionSource,
    ) -> Option<&mut ActorTask> {
        if me.node == target {
            self.strategy.on_patrol_target_reached(target);
        }
        self.enter_idle(sector, random)
    }

    fn enter_idle(&mut self, sector: &Sector, random: &mut dyn DecisionSource) -> Option<&mut ActorTask> {
        let config = &sector.config;
        let duration = random.select_idle_duration(config.idle_duration_min, config.idle_duration_max);
        self.state = BotState::Idle;
        self.task = Some(ActorTask::Idle(IdleTask::new(duration)));
        self.task.as_mut()
    }

    fn idle(&mut self, me: &Actor, sector: &Sector, random: &mut dyn DecisionSource) -> Option<&mut ActorTask> {
        if matches!(&self.task, Some(ActorTask::Idle(task)) if !task.is_complete()) {
            return self.task.as_mut();
        }
        self.task = None;
        self.bypass(me, sector, random)
    }
}

/// Nearest living hostile actor within visibility range and line of sight.
fn find_intruder(me: &Actor, sector: &Sector) -> Option<ActorId> {
    sector
        .actors
        .iter()
        .filter(|other| other.id != me.id && me.is_hostile_to(other) && !other.is_dead())
        .filter_map(|other| {
            let distance = sector.map.distance_between(me.node, other.node);
            let visible =
                distance <= sector.config.visibility_range && sector.map.target_is_on_line(me.node, other.node);
            visible.then_some((distance, other.id))
        })
        .min()
        .map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TacticsConfig;
    use crate::ids::Player;
    use crate::map::SectorMap;
    use crate::spatial::{HexGraph, OffsetCoords};
    use crate::test_support::{FixedRandom, fighter};

    fn sector(size: u32) -> Sector {
        Sector::new(SectorMap::new(HexGraph::square(size)), TacticsConfig::new())
    }

    fn node(sector: &Sector, x: i32, y: i32) -> NodeId {
        sector.map.graph().node_at(OffsetCoords::new(x, y)).unwrap()
    }

    fn route_bot(sector: &mut Sector, at: NodeId, route: Vec<NodeId>) -> (ActorId, BotLogic) {
        let id = sector.add_actor(Player::Bot, fighter("rat", 5), at, None).unwrap();
        (id, BotLogic::new(id, Box::new(PatrolRouteStrategy::new(route))))
    }

    #[test]
    fn bypass_starts_move_toward_patrol_point() {
        let mut sector = sector(8);
        let (start, target) = (node(&sector, 0, 0), node(&sector, 2, 0));
        let (_, mut logic) = route_bot(&mut sector, start, vec![target]);
        let mut random = FixedRandom::mean();

        let task = logic.current_task(&sector, &mut random).cloned();
        assert!(matches!(task, Some(ActorTask::Move(ref m)) if m.target() == target));
        assert_eq!(logic.state(), BotState::Bypass);
    }

    #[test]
    fn bot_already_at_patrol_point_goes_idle() {
        let mut sector = sector(8);
        let home = node(&sector, 3, 3);
        let (_, mut logic) = route_bot(&mut sector, home, vec![home]);
        let mut random = FixedRandom::mean();

        let task = logic.current_task(&sector, &mut random).cloned();

        assert_eq!(task, Some(ActorTask::Idle(IdleTask::new(TacticsConfig::DEFAULT_IDLE_DURATION_MIN))));
        assert_eq!(logic.state(), BotState::Idle);
    }

    #[test]
    fn adjacent_intruder_is_attacked() {
        let mut sector = sector(8);
        let (bot_at, human_at) = (node(&sector, 2, 2), node(&sector, 3, 2));
        let (_, mut logic) = route_bot(&mut sector, bot_at, vec![bot_at]);
        let human = sector.add_actor(Player::Human, fighter("human", 10), human_at, None).unwrap();
        let mut random = FixedRandom::mean();

        let task = logic.current_task(&sector, &mut random).cloned();

        assert_eq!(task, Some(ActorTask::Attack(AttackTask::new(human))));
        assert_eq!(logic.state(), BotState::Pursuit { intruder: human });
    }

    #[test]
    fn distant_intruder_is_chased_without_stepping_onto_it() {
        let mut sector = sector(8);
        let (bot_at, human_at) = (node(&sector, 0, 0), node(&sector, 4, 0));
        let (_, mut logic) = route_bot(&mut sector, bot_at, vec![bot_at]);
        sector.add_actor(Player::Human, fighter("human", 10), human_at, None).unwrap();
        let mut random = FixedRandom::mean();

        let Some(ActorTask::Move(task)) = logic.current_task(&sector, &mut random).cloned() else {
            panic!("expected a pursuit move");
        };

        assert_eq!(task.target(), node(&sector, 3, 0));
        assert!(!task.remaining().any(|n| n == human_at));
    }

    #[test]
    fn intruders_beyond_visibility_are_ignored() {
        let mut sector = sector(10);
        let bot_at = node(&sector, 0, 0);
        let (_, mut logic) = route_bot(&mut sector, bot_at, vec![bot_at]);
        sector
            .add_actor(Player::Human, fighter("human", 10), node(&sector, 9, 0), None)
            .unwrap();
        let mut random = FixedRandom::mean();

        logic.current_task(&sector, &mut random);

        assert_eq!(logic.state(), BotState::Idle);
    }

    #[test]
    fn visibility_range_comes_from_config() {
        let config = TacticsConfig::new().with_visibility_range(2);
        let mut sector = Sector::new(SectorMap::new(HexGraph::square(8)), config);
        let bot_at = node(&sector, 0, 0);
        let (me, _) = route_bot(&mut sector, bot_at, vec![bot_at]);
        let near = sector
            .add_actor(Player::Human, fighter("human", 10), node(&sector, 2, 0), None)
            .unwrap();
        assert_eq!(find_intruder(sector.actors.get(me).unwrap(), &sector), Some(near));

        sector.move_actor(near, node(&sector, 3, 0)).unwrap();
        assert_eq!(find_intruder(sector.actors.get(me).unwrap(), &sector), None);
    }

    #[test]
    fn allies_are_not_intruders() {
        let mut sector = sector(6);
        let bot_at = node(&sector, 0, 0);
        let (me, _) = route_bot(&mut sector, bot_at, vec![bot_at]);
        sector
            .add_actor(Player::Bot, fighter("rat", 5), node(&sector, 1, 0), None)
            .unwrap();

        assert_eq!(find_intruder(sector.actors.get(me).unwrap(), &sector), None);
    }

    #[test]
    fn pursuit_is_abandoned_once_the_target_is_gone() {
        let mut sector = sector(8);
        let (bot_at, human_at, far) = (node(&sector, 2, 2), node(&sector, 3, 2), node(&sector, 6, 6));
        let (_, mut logic) = route_bot(&mut sector, bot_at, vec![far]);
        let human = sector.add_actor(Player::Human, fighter("human", 10), human_at, None).unwrap();
        let mut random = FixedRandom::mean();
        logic.current_task(&sector, &mut random);
        assert_eq!(logic.state(), BotState::Pursuit { intruder: human });

        sector.remove_actor(human);
        let task = logic.current_task(&sector, &mut random).cloned();

        assert_eq!(logic.state(), BotState::Bypass);
        assert!(matches!(task, Some(ActorTask::Move(_))));
    }

    #[test]
    fn pursuit_path_is_reused_then_replanned() {
        let mut sector = sector(10);
        let bot_at = node(&sector, 0, 0);
        let (_, mut logic) = route_bot(&mut sector, bot_at, vec![bot_at]);
        let human = sector
            .add_actor(Player::Human, fighter("human", 10), node(&sector, 4, 0), None)
            .unwrap();
        let mut random = FixedRandom::mean();

        let planned = logic.current_task(&sector, &mut random).cloned();
        assert!(matches!(planned, Some(ActorTask::Move(_))));

        for (x, y) in [(4, 1), (3, 2), (3, 3)] {
            sector.move_actor(human, node(&sector, x, y)).unwrap();
            let task = logic.current_task(&sector, &mut random).cloned();
            assert_eq!(task, planned, "cached route expected with target at ({x}, {y})");
        }

        sector.move_actor(human, node(&sector, 2, 3)).unwrap();
        let Some(ActorTask::Move(replanned)) = logic.current_task(&sector, &mut random).cloned() else {
            panic!("expected a fresh pursuit move");
        };
        assert_ne!(Some(ActorTask::Move(replanned.clone())), planned);
        let human_at = sector.actors.get(human).unwrap().node;
        assert_eq!(sector.map.distance_between(replanned.target(), human_at), 1);
        assert_eq!(logic.state(), BotState::Pursuit { intruder: human });
    }
}
