//! Random sources consumed by combat, bot decisions, survival and loot.
//!
//! Every resolver receives its random source explicitly, so tests can swap in
//! fixed sources and sessions replay exactly from a seed.

mod dice;
mod roll;

pub use dice::{Dice, PcgDice};
pub use roll::{Roll, RollModifiers};

use crate::ids::NodeId;

/// Rolls used while resolving a tactical act.
pub trait TacticalActRandomSource {
    fn roll_to_hit(&mut self, roll: &Roll) -> u32;
    fn roll_efficient(&mut self, roll: &Roll) -> u32;
    /// Single d6 armor save.
    fn roll_armor_save(&mut self) -> u32;
}

/// Choices made by bot logic.
pub trait DecisionSource {
    /// Idle duration in turns, `min..=max`.
    fn select_idle_duration(&mut self, min: u32, max: u32) -> u32;
    fn select_roaming_node(&mut self, candidates: &[NodeId]) -> Option<NodeId>;
}

pub trait SurvivalRandomSource {
    /// Damage dealt each turn by a hazard effect at its worst level.
    fn roll_max_hazard_damage(&mut self) -> u32;
}

/// Rolls used while resolving drop tables.
pub trait DropRandomSource {
    /// Point on a cumulative weight scale, `1..=total`.
    fn roll_weight(&mut self, total: u32) -> u32;
    /// Stack size, `min..=max`.
    fn roll_count(&mut self, min: u32, max: u32) -> u32;
}

/// Everything the core needs from randomness.
pub trait RandomSource: TacticalActRandomSource + DecisionSource + SurvivalRandomSource + DropRandomSource {
    fn as_tactical(&mut self) -> &mut dyn TacticalActRandomSource;
    fn as_decision(&mut self) -> &mut dyn DecisionSource;
    fn as_survival(&mut self) -> &mut dyn SurvivalRandomSource;
    fn as_drop(&mut self) -> &mut dyn DropRandomSource;
}

impl<T> RandomSource for T
where
    T: TacticalActRandomSource + DecisionSource + SurvivalRandomSource + DropRandomSource,
{
    fn as_tactical(&mut self) -> &mut dyn TacticalActRandomSource {
        self
    }

    fn as_decision(&mut self) -> &mut dyn DecisionSource {
        self
    }

    fn as_survival(&mut self) -> &mut dyn SurvivalRandomSource {
        self
    }

    fn as_drop(&mut self) -> &mut dyn DropRandomSource {
        self
    }
}

/// Default source: sums of real die rolls from a [`Dice`].
#[derive(Clone, Debug)]
pub struct DiceRandomSource<D: Dice = PcgDice> {
    dice: D,
}

impl DiceRandomSource<PcgDice> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(PcgDice::from_seed(seed))
    }
}

impl<D: Dice> DiceRandomSource<D> {
    pub fn new(dice: D) -> Self {
        Self { dice }
    }

    fn roll_sum(&mut self, roll: &Roll) -> u32 {
        (0..roll.count).map(|_| self.dice.roll(roll.dice)).sum()
    }
}

impl<D: Dice> TacticalActRandomSource for DiceRandomSource<D> {
    fn roll_to_hit(&mut self, roll: &Roll) -> u32 {
        self.roll_sum(roll)
    }

    fn roll_efficient(&mut self, roll: &Roll) -> u32 {
        self.roll_sum(roll)
    }

    fn roll_armor_save(&mut self) -> u32 {
        self.dice.roll(6)
    }
}

impl<D: Dice> DecisionSource for DiceRandomSource<D> {
    fn select_idle_duration(&mut self, min: u32, max: u32) -> u32 {
        self.dice.range(min, max)
    }

    fn select_roaming_node(&mut self, candidates: &[NodeId]) -> Option<NodeId> {
        if candidates.is_empty() {
            return None;
        }
        let index = self.dice.range(0, candidates.len() as u32 - 1) as usize;
        candidates.get(index).copied()
    }
}

impl<D: Dice> SurvivalRandomSource for DiceRandomSource<D> {
    fn roll_max_hazard_damage(&mut self) -> u32 {
        self.dice.roll(3)
    }
}

impl<D: Dice> DropRandomSource for DiceRandomSource<D> {
    fn roll_weight(&mut self, total: u32) -> u32 {
        self.dice.roll(total)
    }

    fn roll_count(&mut self, min: u32, max: u32) -> u32 {
        self.dice.range(min, max)
    }
}
