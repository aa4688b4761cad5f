//! Turn scheduler.
//!
//! One [`GameLoop::update`] call is one sector turn: every living actor gets a
//! single turn in ascending [`ActorId`] order, dead actors are reaped, exits
//! are checked, and the tick's events are handed to observers.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::actor::Actor;
use crate::error::{ErrorContext, GameError};
use crate::events::{InteractionEvent, InteractionObserver};
use crate::evolution::JobKind;
use crate::ids::{ActorId, RegionId};
use crate::loot::DropResolver;
use crate::random::{DropRandomSource, RandomSource};
use crate::scheme::SchemeOracle;
use crate::sector::Sector;
use crate::source::ActorTaskSource;
use crate::survival::SurvivalModule;
use crate::task::{TaskContext, TaskError, TaskExecution, progress_perk_jobs};

/// A task that failed during an actor's turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskFault {
    pub actor: ActorId,
    pub task: &'static str,
    pub error: TaskError,
    pub context: ErrorContext,
}

/// Result of one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Turn number after the tick.
    pub turn: u64,
    pub events: Vec<InteractionEvent>,
    pub faults: Vec<TaskFault>,
}

impl TickReport {
    pub fn exits(&self) -> impl Iterator<Item = (RegionId, &[ActorId])> {
        self.events.iter().filter_map(|event| match event {
            InteractionEvent::SectorExit { actors, region } => Some((*region, actors.as_slice())),
            _ => None,
        })
    }

    pub fn deaths(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.events.iter().filter_map(|event| match event {
            InteractionEvent::ActorDied { actor, .. } => Some(*actor),
            _ => None,
        })
    }
}

/// Drives task sources over a sector, one tick at a time.
#[derive(Default)]
pub struct GameLoop {
    sources: Vec<Box<dyn ActorTaskSource>>,
    observers: Vec<Box<dyn InteractionObserver>>,
}

impl GameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a task source. Earlier sources win when several handle the
    /// same actor.
    pub fn add_source(&mut self, source: Box<dyn ActorTaskSource>) {
        self.sources.push(source);
    }

    pub fn add_observer(&mut self, observer: Box<dyn InteractionObserver>) {
        self.observers.push(observer);
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Runs one tick.
    pub fn update(
        &mut self,
        sector: &mut Sector,
        random: &mut dyn RandomSource,
        schemes: &dyn SchemeOracle,
    ) -> TickReport {
        let mut events = Vec::new();
        let mut faults = Vec::new();

        for id in sector.actors.ids() {
            let Some(actor) = sector.actors.get(id) else {
                continue;
            };
            if actor.is_dead() {
                continue;
            }

            if let Some(fault) = self.take_turn(id, sector, random, schemes, &mut events) {
                faults.push(fault);
            } else if let Some(survival) = sector
                .actors
                .get_mut(id)
                .and_then(|a| a.person.module_safe_mut::<SurvivalModule>())
            {
                let tick = survival.update(random.as_survival());
                if tick.hazard_damage > 0 {
                    debug!(actor = %id, damage = tick.hazard_damage, died = tick.died, "survival hazard");
                }
            }

            self.reap_dead(sector, random.as_drop(), schemes, &mut events);
        }

        let exits = Self::collect_exits(sector);
        events.extend(
            exits
                .into_iter()
                .map(|(region, actors)| InteractionEvent::SectorExit { actors, region }),
        );

        sector.turn += 1;
        for observer in &mut self.observers {
            for event in &events {
                observer.on_event(event);
            }
            observer.on_turn_end(sector.turn);
        }

        TickReport {
            turn: sector.turn,
            events,
            faults,
        }
    }

    fn take_turn(
        &mut self,
        id: ActorId,
        sector: &mut Sector,
        random: &mut dyn RandomSource,
        schemes: &dyn SchemeOracle,
        events: &mut Vec<InteractionEvent>,
    ) -> Option<TaskFault> {
        let actor = sector.actors.get(id)?;
        let node = actor.node;
        let index = self.sources.iter().position(|source| source.handles(actor))?;
        let source = &mut self.sources[index];

        let task = source.current_task(id, sector, random)?;
        if task.is_complete() {
            return None;
        }
        let kind = task.kind();
        let mut ctx = TaskContext {
            sector: &mut *sector,
            random: &mut *random,
            schemes,
            events: &mut *events,
        };
        let error = task.execute(id, &mut ctx).err()?;

        let context = ErrorContext::new(sector.turn).with_actor(id).with_node(node);
        warn!(
            actor = %id,
            task = kind,
            code = error.error_code(),
            severity = error.severity().as_str(),
            %error,
            "task faulted"
        );
        source.on_task_fault(id, &error);
        Some(TaskFault {
            actor: id,
            task: kind,
            error,
            context,
        })
    }

    fn reap_dead(
        &mut self,
        sector: &mut Sector,
        random: &mut dyn DropRandomSource,
        schemes: &dyn SchemeOracle,
        events: &mut Vec<InteractionEvent>,
    ) {
        let dead: Vec<ActorId> = sector.actors.iter().filter(|a| a.is_dead()).map(|a| a.id).collect();
        for id in dead {
            let killer = Self::killer_of(id, events);
            let removed = sector.remove_actor(id);
            for source in &mut self.sources {
                source.on_actor_removed(id);
            }
            debug!(actor = %id, ?killer, "actor died");
            events.push(InteractionEvent::ActorDied { actor: id, killer });
            if let Some(corpse) = removed {
                Self::drop_loot(&corpse, sector, random, schemes, events);
            }

            if let Some(killer) = killer.and_then(|k| sector.actors.get_mut(k)) {
                progress_perk_jobs(killer, JobKind::Defeats, 1, schemes, events);
            }
        }
    }

    /// Rolls the dead monster's drop tables into a loot pile on its node.
    fn drop_loot(
        corpse: &Actor,
        sector: &mut Sector,
        random: &mut dyn DropRandomSource,
        schemes: &dyn SchemeOracle,
        events: &mut Vec<InteractionEvent>,
    ) {
        let Some(monster) = schemes.monster(corpse.person.sid()) else {
            return;
        };
        if monster.drop_tables.is_empty() {
            return;
        }
        let props = DropResolver::new(schemes).resolve(&monster.drop_tables, random);
        if props.is_empty() {
            return;
        }
        let sids: Vec<String> = props.iter().map(|prop| prop.sid().to_owned()).collect();
        match sector.add_container(corpse.node, props, false) {
            Ok(container) => {
                debug!(actor = %corpse.id, %container, props = sids.len(), "loot dropped");
                events.push(InteractionEvent::LootDropped {
                    actor: corpse.id,
                    container,
                    node: corpse.node,
                    props: sids,
                });
            }
            Err(err) => warn!(actor = %corpse.id, %err, "loot pile not placed"),
        }
    }

    /// Attacker whose act finished `victim` during this tick, if any.
    fn killer_of(victim: ActorId, events: &[InteractionEvent]) -> Option<ActorId> {
        events.iter().rev().find_map(|event| match event {
            InteractionEvent::ActUsed(outcome) if outcome.target == victim && outcome.target_died => {
                Some(outcome.attacker)
            }
            _ => None,
        })
    }

    fn collect_exits(sector: &Sector) -> BTreeMap<RegionId, Vec<ActorId>> {
        let mut exits: BTreeMap<RegionId, Vec<ActorId>> = BTreeMap::new();
        for actor in sector.actors.humans() {
            if let Some(region) = sector.exit_at(actor.node) {
                exits.entry(region).or_default().push(actor.id);
            }
        }
        exits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TacticsConfig;
    use crate::ids::Player;
    use crate::map::SectorMap;
    use crate::person::Person;
    use crate::scheme::SchemeRegistry;
    use crate::sector::MapRegion;
    use crate::source::{BotTaskSource, HumanTaskSource, Intention};
    use crate::spatial::{HexGraph, OffsetCoords};
    use crate::survival::SurvivalStatType;
    use crate::test_support::{FixedRandom, fighter};
    use std::sync::{Arc, Mutex};

    fn sector(size: u32) -> Sector {
        Sector::new(SectorMap::new(HexGraph::square(size)), TacticsConfig::new())
    }

    fn at(sector: &Sector, x: i32, y: i32) -> crate::ids::NodeId {
        sector.map.graph().node_at(OffsetCoords::new(x, y)).unwrap()
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl InteractionObserver for Recorder {
        fn on_event(&mut self, event: &InteractionEvent) {
            self.0.lock().unwrap().push(format!("{event:?}"));
        }

        fn on_turn_end(&mut self, turn: u64) {
            self.0.lock().unwrap().push(format!("end {turn}"));
        }
    }

    /// Source that hands out a fixed failing move for its actor.
    struct Blocked(Option<crate::task::ActorTask>, usize);

    impl ActorTaskSource for Blocked {
        fn handles(&self, _actor: &crate::actor::Actor) -> bool {
            true
        }

        fn current_task(
            &mut self,
            _actor: ActorId,
            _sector: &Sector,
            _random: &mut dyn RandomSource,
        ) -> Option<&mut crate::task::ActorTask> {
            self.0.as_mut()
        }

        fn on_task_fault(&mut self, _actor: ActorId, _error: &TaskError) {
            self.1 += 1;
        }
    }

    #[test]
    fn tick_without_sources_only_advances_the_turn() {
        let mut sector = sector(4);
        let (a, b) = (at(&sector, 0, 0), at(&sector, 3, 3));
        sector.add_actor(Player::Human, fighter("human", 10), a, None).unwrap();
        sector.add_actor(Player::Bot, fighter("rat", 3), b, None).unwrap();
        let mut game = GameLoop::new();

        let report = game.update(&mut sector, &mut FixedRandom::mean(), &SchemeRegistry::new());

        assert_eq!(report.turn, 1);
        assert!(report.events.is_empty());
        assert!(report.faults.is_empty());
        assert_eq!(sector.actors.len(), 2);
    }

    #[test]
    fn fault_is_reported_and_skips_survival() {
        let mut sector = sector(4);
        let (a, b) = (at(&sector, 0, 0), at(&sector, 1, 0));
        let person = Person::new("human")
            .with_module(SurvivalModule::human(10, &TacticsConfig::new()))
            .unwrap();
        let walker = sector.add_actor(Player::Human, person, a, None).unwrap();
        sector.add_actor(Player::Bot, fighter("rat", 3), b, None).unwrap();
        let task = crate::task::ActorTask::Move(crate::task::MoveTask::from_path(a, b, vec![b]));
        let mut game = GameLoop::new();
        game.add_source(Box::new(Blocked(Some(task), 0)));

        let report = game.update(&mut sector, &mut FixedRandom::mean(), &SchemeRegistry::new());

        let [fault, ..] = report.faults.as_slice() else {
            panic!("expected a fault");
        };
        assert_eq!(fault.actor, walker);
        assert_eq!(fault.task, "move");
        assert_eq!(fault.error, TaskError::PathBlocked(b));
        assert_eq!(fault.context.node, Some(a));
        let satiety = sector
            .actors
            .get(walker)
            .unwrap()
            .person
            .module::<SurvivalModule>()
            .unwrap()
            .stat(SurvivalStatType::Satiety)
            .unwrap()
            .value();
        assert_eq!(satiety, 50);
    }

    #[test]
    fn killed_actor_is_reaped_with_killer_credit() {
        let mut sector = sector(4);
        let (a, b) = (at(&sector, 0, 0), at(&sector, 1, 0));
        let human = sector.add_actor(Player::Human, fighter("human", 10), a, None).unwrap();
        let rat = sector.add_actor(Player::Bot, fighter("rat", 2), b, None).unwrap();
        let mut humans = HumanTaskSource::new();
        humans.push_intention(human, Intention::Attack(rat));
        let mut game = GameLoop::new();
        game.add_source(Box::new(humans));
        game.add_source(Box::new(BotTaskSource::default()));

        let report = game.update(&mut sector, &mut FixedRandom::mean(), &SchemeRegistry::new());

        assert!(sector.actors.get(rat).is_none());
        assert_eq!(sector.map.occupant(b), None);
        assert!(report.events.contains(&InteractionEvent::ActorDied {
            actor: rat,
            killer: Some(human)
        }));
        assert_eq!(report.deaths().collect::<Vec<_>>(), vec![rat]);
    }

    #[test]
    fn dead_monster_leaves_a_loot_pile() {
        use crate::inventory::Prop;
        use crate::scheme::{DropTableRecord, DropTableScheme, MonsterScheme, PropScheme, ResourceScheme};

        let mut schemes = SchemeRegistry::new();
        schemes.insert_prop(PropScheme {
            sid: "food-pack".into(),
            equip: None,
            resource: Some(ResourceScheme {
                resource_type: "food".into(),
            }),
            usage: None,
        });
        schemes.insert_drop_table(DropTableScheme {
            sid: "vermin".into(),
            rolls: 1,
            records: vec![DropTableRecord {
                prop: Some("food-pack".into()),
                weight: 1,
                min_count: 1,
                max_count: 2,
            }],
        });
        schemes.insert_monster(MonsterScheme {
            sid: "rat".into(),
            hp: 2,
            acts: Vec::new(),
            armors: Vec::new(),
            drop_tables: vec!["vermin".into()],
        });
        let mut sector = sector(4);
        let (a, b) = (at(&sector, 0, 0), at(&sector, 1, 0));
        let human = sector.add_actor(Player::Human, fighter("human", 10), a, None).unwrap();
        let rat = sector.add_actor(Player::Bot, fighter("rat", 2), b, None).unwrap();
        let mut humans = HumanTaskSource::new();
        humans.push_intention(human, Intention::Attack(rat));
        let mut game = GameLoop::new();
        game.add_source(Box::new(humans));

        let report = game.update(&mut sector, &mut FixedRandom::mean(), &schemes);

        let died = report
            .events
            .iter()
            .position(|e| matches!(e, InteractionEvent::ActorDied { actor, .. } if *actor == rat))
            .expect("rat died");
        let Some(InteractionEvent::LootDropped { actor, container, node, props }) = report.events.get(died + 1) else {
            panic!("expected loot right after the death, got {:?}", report.events);
        };
        assert_eq!((*actor, *node), (rat, b));
        assert_eq!(props, &vec!["food-pack".to_string()]);
        let pile = sector.containers.get(*container).unwrap();
        assert!(!pile.is_map_block);
        assert!(matches!(pile.props.as_slice(), [Prop::Resource(food)] if food.count == 2));
        assert!(sector.map.is_passable(b));
    }

    #[test]
    fn monster_without_drop_tables_leaves_nothing() {
        let mut sector = sector(4);
        let (a, b) = (at(&sector, 0, 0), at(&sector, 1, 0));
        let human = sector.add_actor(Player::Human, fighter("human", 10), a, None).unwrap();
        let rat = sector.add_actor(Player::Bot, fighter("rat", 2), b, None).unwrap();
        let mut humans = HumanTaskSource::new();
        humans.push_intention(human, Intention::Attack(rat));
        let mut game = GameLoop::new();
        game.add_source(Box::new(humans));

        let report = game.update(&mut sector, &mut FixedRandom::mean(), &SchemeRegistry::new());

        assert_eq!(report.deaths().collect::<Vec<_>>(), vec![rat]);
        assert!(!report.events.iter().any(|e| matches!(e, InteractionEvent::LootDropped { .. })));
        assert!(sector.containers.is_empty());
    }

    #[test]
    fn humans_on_exit_nodes_leave_the_sector() {
        let mut sector = sector(4);
        let exit = at(&sector, 3, 3);
        sector.add_region(MapRegion {
            id: RegionId(7),
            nodes: vec![exit],
            is_out: true,
            exit_nodes: vec![exit],
            ..MapRegion::default()
        });
        let human = sector.add_actor(Player::Human, fighter("human", 10), exit, None).unwrap();
        let recorder = Recorder::default();
        let mut game = GameLoop::new();
        game.add_observer(Box::new(recorder.clone()));

        let report = game.update(&mut sector, &mut FixedRandom::mean(), &SchemeRegistry::new());

        let exits: Vec<_> = report.exits().map(|(r, a)| (r, a.to_vec())).collect();
        assert_eq!(exits, vec![(RegionId(7), vec![human])]);
        let log = recorder.0.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1], "end 1");
    }
}
