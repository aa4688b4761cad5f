use super::{TaskContext, TaskError, TaskExecution, progress_perk_jobs};
use crate::combat::{OffenceType, TacticalAct, select_best_act, use_act};
use crate::events::InteractionEvent;
use crate::evolution::JobKind;
use crate::ids::ActorId;
use crate::sector::Sector;

/// Uses the attacker's best act on a target once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackTask {
    target: ActorId,
    complete: bool,
}

impl AttackTask {
    pub fn new(target: ActorId) -> Self {
        Self { target, complete: false }
    }

    pub fn target(&self) -> ActorId {
        self.target
    }

    fn best_act(actor: ActorId, sector: &Sector) -> Option<TacticalAct> {
        let person = &sector.actors.get(actor)?.person;
        let acts = person.acts();
        select_best_act(&acts, person.inventory()).cloned()
    }
}

impl TaskExecution for AttackTask {
    fn can_execute(&self, actor: ActorId, sector: &Sector) -> bool {
        if self.complete {
            return false;
        }
        let (Some(attacker), Some(target)) = (sector.actors.get(actor), sector.actors.get(self.target)) else {
            return false;
        };
        if target.is_dead() {
            return false;
        }
        Self::best_act(actor, sector).is_some_and(|act| {
            act.check_distance(&sector.map, attacker.node, target.node)
                && sector.map.target_is_on_line(attacker.node, target.node)
        })
    }

    fn execute(&mut self, actor: ActorId, ctx: &mut TaskContext<'_>) -> Result<(), TaskError> {
        self.complete = true;

        let act = Self::best_act(actor, ctx.sector).ok_or(TaskError::NoUsableAct)?;
        let Sector { map, actors, config, .. } = &mut *ctx.sector;
        let (attacker, target) = actors
            .pair_mut(actor, self.target)
            .ok_or(TaskError::TargetMissing(self.target))?;

        let outcome = use_act(map, attacker, target, &act, config, ctx.random.as_tactical())?;

        let landed = outcome.landed_hits();
        let job = match act.stats().offence.map(|o| o.offence_type) {
            _ if act.stats().is_melee => Some(JobKind::MeleeHits),
            Some(OffenceType::Ballistic) => Some(JobKind::BallisticHits),
            _ => None,
        };
        ctx.events.push(InteractionEvent::ActUsed(outcome));
        if let Some(job) = job
            && landed > 0
        {
            progress_perk_jobs(attacker, job, landed, ctx.schemes, ctx.events);
        }
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TacticsConfig;
    use crate::ids::Player;
    use crate::map::SectorMap;
    use crate::scheme::SchemeRegistry;
    use crate::spatial::{HexGraph, OffsetCoords};
    use crate::survival::SurvivalModule;
    use crate::test_support::{FixedRandom, fighter};

    fn duel() -> (Sector, ActorId, ActorId) {
        let mut sector = Sector::new(SectorMap::new(HexGraph::square(4)), TacticsConfig::new());
        let node = |sector: &Sector, x, y| sector.map.graph().node_at(OffsetCoords::new(x, y)).unwrap();
        let (a, b) = (node(&sector, 0, 0), node(&sector, 1, 0));
        let human = sector.add_actor(Player::Human, fighter("human", 10), a, None).unwrap();
        let rat = sector.add_actor(Player::Bot, fighter("rat", 3), b, None).unwrap();
        (sector, human, rat)
    }

    #[test]
    fn attack_emits_act_used_and_completes() {
        let (mut sector, human, rat) = duel();
        let schemes = SchemeRegistry::new();
        let mut random = FixedRandom::mean();
        let mut events = Vec::new();
        let mut task = AttackTask::new(rat);
        assert!(task.can_execute(human, &sector));

        let mut ctx = TaskContext {
            sector: &mut sector,
            random: &mut random,
            schemes: &schemes,
            events: &mut events,
        };
        task.execute(human, &mut ctx).unwrap();

        assert!(task.is_complete());
        let [InteractionEvent::ActUsed(outcome)] = events.as_slice() else {
            panic!("expected a single ActUsed event, got {events:?}");
        };
        assert_eq!(outcome.act_sid, "punch");
        assert_eq!(outcome.target_node, sector.actors.get(rat).unwrap().node);
        assert_eq!(
            sector.actors.get(rat).unwrap().person.module::<SurvivalModule>().unwrap().health(),
            1
        );
    }

    #[test]
    fn missing_target_faults_and_completes() {
        let (mut sector, human, rat) = duel();
        sector.remove_actor(rat);
        let schemes = SchemeRegistry::new();
        let mut random = FixedRandom::mean();
        let mut events = Vec::new();
        let mut task = AttackTask::new(rat);

        let mut ctx = TaskContext {
            sector: &mut sector,
            random: &mut random,
            schemes: &schemes,
            events: &mut events,
        };

        assert_eq!(task.execute(human, &mut ctx), Err(TaskError::TargetMissing(rat)));
        assert!(task.is_complete());
        assert!(events.is_empty());
    }

    #[test]
    fn cannot_execute_across_a_wall() {
        let (mut sector, human, rat) = duel();
        let (a, b) = (sector.actors.get(human).unwrap().node, sector.actors.get(rat).unwrap().node);
        sector.map.graph_mut().remove_edge(a, b);

        assert!(!AttackTask::new(rat).can_execute(human, &sector));
    }
}
