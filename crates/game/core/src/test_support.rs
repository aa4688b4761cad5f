//! Shared fixtures for unit tests.

use crate::actor::Actor;
use crate::combat::{CombatActModule, TacticalActScheme, TacticalActStats};
use crate::ids::{ActorId, NodeId, Player};
use crate::person::Person;
use crate::random::{DecisionSource, DropRandomSource, Roll, SurvivalRandomSource, TacticalActRandomSource};
use crate::survival::SurvivalModule;

/// Deterministic source: rolls land on the middle of their range unless
/// overridden.
#[derive(Clone, Debug)]
pub struct FixedRandom {
    pub to_hit: Option<u32>,
    pub efficient: Option<u32>,
    pub armor_save: u32,
    pub idle_duration: Option<u32>,
    pub hazard_damage: u32,
    /// Weight point for drop tables; clamped to the table total.
    pub drop_weight: u32,
}

impl FixedRandom {
    pub fn mean() -> Self {
        Self {
            to_hit: None,
            efficient: None,
            armor_save: 1,
            idle_duration: None,
            hazard_damage: 1,
            drop_weight: 1,
        }
    }

    pub fn missing() -> Self {
        Self {
            to_hit: Some(1),
            ..Self::mean()
        }
    }
}

impl TacticalActRandomSource for FixedRandom {
    fn roll_to_hit(&mut self, roll: &Roll) -> u32 {
        self.to_hit.unwrap_or_else(|| roll.mean())
    }

    fn roll_efficient(&mut self, roll: &Roll) -> u32 {
        self.efficient.unwrap_or_else(|| roll.mean())
    }

    fn roll_armor_save(&mut self) -> u32 {
        self.armor_save
    }
}

impl DecisionSource for FixedRandom {
    fn select_idle_duration(&mut self, min: u32, _max: u32) -> u32 {
        self.idle_duration.unwrap_or(min)
    }

    fn select_roaming_node(&mut self, candidates: &[NodeId]) -> Option<NodeId> {
        candidates.first().copied()
    }
}

impl SurvivalRandomSource for FixedRandom {
    fn roll_max_hazard_damage(&mut self) -> u32 {
        self.hazard_damage
    }
}

impl DropRandomSource for FixedRandom {
    fn roll_weight(&mut self, total: u32) -> u32 {
        self.drop_weight.clamp(1, total.max(1))
    }

    fn roll_count(&mut self, _min: u32, max: u32) -> u32 {
        max
    }
}

pub fn punch() -> TacticalActScheme {
    TacticalActScheme::new("punch", TacticalActStats::melee_damage(Roll::new(3, 1)))
}

/// A person with health and a bare-handed act.
pub fn fighter(sid: &str, hp: i32) -> Person {
    Person::new(sid)
        .with_module(SurvivalModule::with_health(hp))
        .and_then(|person| person.with_module(CombatActModule::with_default(punch())))
        .expect("fresh person accepts both modules")
}

pub fn actor(id: u32, player: Player, person: Person, node: NodeId) -> Actor {
    Actor {
        id: ActorId(id),
        player,
        person,
        node,
        archetype: None,
    }
}
