//! Hazard effects raised by survival stats.

use arrayvec::ArrayVec;
use tracing::warn;

use super::stat::{HazardLevel, KeyPoint, SurvivalStat, SurvivalStatType};
use crate::config::TacticsConfig;
use crate::random::SurvivalRandomSource;

/// Penalty (or periodic damage) caused by a survival stat in a hazard zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurvivalHazardEffect {
    pub stat_type: SurvivalStatType,
    pub level: HazardLevel,
    /// Health lost each turn; only rolled for [`HazardLevel::Max`].
    pub periodic_damage: u32,
}

impl SurvivalHazardEffect {
    pub fn new(
        stat_type: SurvivalStatType,
        level: HazardLevel,
        random: &mut dyn SurvivalRandomSource,
    ) -> Self {
        let periodic_damage = match level {
            HazardLevel::Max => random.roll_max_hazard_damage(),
            HazardLevel::Lesser | HazardLevel::Strong => 0,
        };
        Self {
            stat_type,
            level,
            periodic_damage,
        }
    }

    pub fn efficiency_penalty(&self) -> i32 {
        match self.level {
            HazardLevel::Lesser => 1,
            HazardLevel::Strong => 2,
            HazardLevel::Max => 3,
        }
    }

    pub fn to_hit_penalty(&self) -> i32 {
        match self.level {
            HazardLevel::Lesser => 0,
            HazardLevel::Strong | HazardLevel::Max => 1,
        }
    }
}

/// Active effects of one person. Holds at most one hazard effect per stat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectCollection {
    items: ArrayVec<SurvivalHazardEffect, { TacticsConfig::MAX_EFFECTS }>,
}

impl EffectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an effect, replacing any effect of the same stat type.
    pub fn add(&mut self, effect: SurvivalHazardEffect) {
        self.remove(effect.stat_type);
        if let Err(err) = self.items.try_push(effect) {
            warn!(stat = ?err.element().stat_type, "effect list full, effect dropped");
        }
    }

    pub fn remove(&mut self, stat_type: SurvivalStatType) -> Option<SurvivalHazardEffect> {
        let index = self.items.iter().position(|e| e.stat_type == stat_type)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, stat_type: SurvivalStatType) -> Option<&SurvivalHazardEffect> {
        self.items.iter().find(|e| e.stat_type == stat_type)
    }

    pub fn items(&self) -> &[SurvivalHazardEffect] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn efficiency_penalty(&self) -> i32 {
        self.items.iter().map(SurvivalHazardEffect::efficiency_penalty).sum()
    }

    pub fn to_hit_penalty(&self) -> i32 {
        self.items.iter().map(SurvivalHazardEffect::to_hit_penalty).sum()
    }

    pub fn periodic_damage(&self) -> u32 {
        self.items.iter().map(|e| e.periodic_damage).sum()
    }
}

/// What [`update_survival_effect`] did to the collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectChange {
    Unchanged,
    Added(HazardLevel),
    Replaced { from: HazardLevel, to: HazardLevel },
    Removed(HazardLevel),
}

/// Reconciles the hazard effect of `stat` after its value crossed key points.
///
/// The level is taken from the stat's current value, so the effect always
/// matches the worst threshold still reached regardless of which key points
/// were crossed on the way.
pub fn update_survival_effect(
    effects: &mut EffectCollection,
    stat: &SurvivalStat,
    crossed: &[KeyPoint],
    random: &mut dyn SurvivalRandomSource,
) -> EffectChange {
    if crossed.is_empty() {
        return EffectChange::Unchanged;
    }

    let stat_type = stat.stat_type();
    let current = effects.get(stat_type).map(|e| e.level);

    match (current, stat.current_level()) {
        (None, None) => EffectChange::Unchanged,
        (Some(from), None) => {
            effects.remove(stat_type);
            EffectChange::Removed(from)
        }
        (Some(from), Some(to)) if from == to => EffectChange::Unchanged,
        (current, Some(to)) => {
            effects.add(SurvivalHazardEffect::new(stat_type, to, random));
            match current {
                Some(from) => EffectChange::Replaced { from, to },
                None => EffectChange::Added(to),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedHazard(u32);

    impl SurvivalRandomSource for FixedHazard {
        fn roll_max_hazard_damage(&mut self) -> u32 {
            self.0
        }
    }

    fn effects_with(level: HazardLevel) -> EffectCollection {
        let mut effects = EffectCollection::new();
        effects.add(SurvivalHazardEffect::new(
            SurvivalStatType::Satiety,
            level,
            &mut FixedHazard(6),
        ));
        effects
    }

    #[test]
    fn add_keeps_one_effect_per_stat() {
        let mut effects = effects_with(HazardLevel::Lesser);
        let mut random = FixedHazard(6);
        effects.add(SurvivalHazardEffect::new(SurvivalStatType::Satiety, HazardLevel::Max, &mut random));
        effects.add(SurvivalHazardEffect::new(SurvivalStatType::Hydration, HazardLevel::Lesser, &mut random));

        assert_eq!(effects.len(), 2);
        assert_eq!(effects.get(SurvivalStatType::Satiety).unwrap().level, HazardLevel::Max);
        assert_eq!(effects.periodic_damage(), 6);
    }

    #[test]
    fn recovered_stat_removes_effect() {
        let mut effects = effects_with(HazardLevel::Lesser);
        let lesser = KeyPoint::new(HazardLevel::Lesser, 0);
        let stat = SurvivalStat::new(SurvivalStatType::Satiety, 1, -100, 100).with_key_points([lesser]);

        let change = update_survival_effect(&mut effects, &stat, &[lesser], &mut FixedHazard(6));

        assert_eq!(change, EffectChange::Removed(HazardLevel::Lesser));
        assert!(effects.is_empty());
    }

    #[test]
    fn recovering_past_deeper_point_keeps_lesser_effect() {
        let mut effects = effects_with(HazardLevel::Lesser);
        let key_points = [
            KeyPoint::new(HazardLevel::Lesser, 0),
            KeyPoint::new(HazardLevel::Strong, -10),
        ];
        let stat = SurvivalStat::new(SurvivalStatType::Satiety, -5, -100, 100).with_key_points(key_points);

        update_survival_effect(&mut effects, &stat, &key_points[1..], &mut FixedHazard(6));

        assert_eq!(effects.len(), 1);
        assert_eq!(effects.get(SurvivalStatType::Satiety).unwrap().level, HazardLevel::Lesser);
    }

    #[test]
    fn effect_follows_value_not_crossed_point() {
        let mut effects = effects_with(HazardLevel::Strong);
        let key_points = [
            KeyPoint::new(HazardLevel::Lesser, 5),
            KeyPoint::new(HazardLevel::Strong, 0),
            KeyPoint::new(HazardLevel::Max, -10),
        ];
        let stat = SurvivalStat::new(SurvivalStatType::Satiety, -5, -100, 100).with_key_points(key_points);

        update_survival_effect(&mut effects, &stat, &key_points[2..], &mut FixedHazard(6));

        assert_eq!(effects.get(SurvivalStatType::Satiety).unwrap().level, HazardLevel::Strong);
    }

    #[test]
    fn escalation_replaces_instead_of_stacking() {
        let mut effects = effects_with(HazardLevel::Lesser);
        let key_points = [
            KeyPoint::new(HazardLevel::Lesser, 0),
            KeyPoint::new(HazardLevel::Strong, -25),
            KeyPoint::new(HazardLevel::Max, -50),
        ];
        let mut stat = SurvivalStat::new(SurvivalStatType::Satiety, -10, -100, 100).with_key_points(key_points);
        let crossed = stat.set_value(-60);

        let change = update_survival_effect(&mut effects, &stat, &crossed, &mut FixedHazard(6));

        assert_eq!(
            change,
            EffectChange::Replaced {
                from: HazardLevel::Lesser,
                to: HazardLevel::Max
            }
        );
        assert_eq!(effects.len(), 1);
        let effect = effects.get(SurvivalStatType::Satiety).unwrap();
        assert_eq!(effect.level, HazardLevel::Max);
        assert_eq!(effect.periodic_damage, 6);
    }

    #[test]
    fn first_threshold_adds_effect() {
        let mut effects = EffectCollection::new();
        let lesser = KeyPoint::new(HazardLevel::Lesser, 0);
        let mut stat = SurvivalStat::new(SurvivalStatType::Hydration, 3, -100, 100).with_key_points([lesser]);
        let crossed = stat.set_value(-1);

        let change = update_survival_effect(&mut effects, &stat, &crossed, &mut FixedHazard(1));

        assert_eq!(change, EffectChange::Added(HazardLevel::Lesser));
        assert_eq!(effects.efficiency_penalty(), 1);
        assert_eq!(effects.to_hit_penalty(), 0);
    }

    #[test]
    fn nothing_crossed_is_a_no_op() {
        let mut effects = effects_with(HazardLevel::Strong);
        let stat = SurvivalStat::new(SurvivalStatType::Satiety, 50, -100, 100);
        let change = update_survival_effect(&mut effects, &stat, &[], &mut FixedHazard(1));
        assert_eq!(change, EffectChange::Unchanged);
        assert_eq!(effects.len(), 1);
    }
}
