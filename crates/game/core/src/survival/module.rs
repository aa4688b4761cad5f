use super::effects::{EffectChange, EffectCollection, update_survival_effect};
use super::stat::{HazardLevel, KeyPoint, SurvivalStat, SurvivalStatType};
use crate::config::TacticsConfig;
use crate::random::SurvivalRandomSource;

/// Survival stats, their hazard effects, and death.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurvivalModule {
    stats: Vec<SurvivalStat>,
    effects: EffectCollection,
    dead: bool,
}

/// What happened to a person during one survival tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurvivalTick {
    pub effect_changes: Vec<(SurvivalStatType, EffectChange)>,
    pub hazard_damage: u32,
    pub died: bool,
}

impl SurvivalModule {
    pub const HUNGER_KEY_POINTS: [KeyPoint; 3] = [
        KeyPoint::new(HazardLevel::Lesser, 0),
        KeyPoint::new(HazardLevel::Strong, -25),
        KeyPoint::new(HazardLevel::Max, -50),
    ];

    pub fn new(stats: impl IntoIterator<Item = SurvivalStat>) -> Self {
        Self {
            stats: stats.into_iter().collect(),
            effects: EffectCollection::new(),
            dead: false,
        }
    }

    /// Health only; monsters do not starve.
    pub fn with_health(hp: i32) -> Self {
        Self::new([SurvivalStat::new(SurvivalStatType::Health, hp, 0, hp)])
    }

    /// Health, satiety and hydration with the standard hunger thresholds.
    pub fn human(hp: i32, config: &TacticsConfig) -> Self {
        Self::new([
            SurvivalStat::new(SurvivalStatType::Health, hp, 0, hp),
            SurvivalStat::new(SurvivalStatType::Satiety, 50, -100, 100)
                .with_rate(config.satiety_rate)
                .with_key_points(Self::HUNGER_KEY_POINTS),
            SurvivalStat::new(SurvivalStatType::Hydration, 50, -100, 100)
                .with_rate(config.hydration_rate)
                .with_key_points(Self::HUNGER_KEY_POINTS),
        ])
    }

    pub fn stat(&self, stat_type: SurvivalStatType) -> Option<&SurvivalStat> {
        self.stats.iter().find(|s| s.stat_type() == stat_type)
    }

    pub fn stats(&self) -> &[SurvivalStat] {
        &self.stats
    }

    pub fn effects(&self) -> &EffectCollection {
        &self.effects
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn health(&self) -> i32 {
        self.stat(SurvivalStatType::Health).map_or(0, SurvivalStat::value)
    }

    /// Reduces health; marks the person dead when it reaches its minimum.
    pub fn take_damage(&mut self, amount: u32) {
        let delta = -(amount.min(i32::MAX as u32) as i32);
        self.change_stat(SurvivalStatType::Health, delta);
    }

    /// Restores health up to its maximum. Health carries no hazard thresholds.
    pub fn heal(&mut self, amount: u32) {
        let delta = amount.min(i32::MAX as u32) as i32;
        self.change_stat(SurvivalStatType::Health, delta);
    }

    /// Adds `value` to a stat and reconciles its hazard effect.
    ///
    /// Returns the effect change, or `None` if the person lacks the stat.
    pub fn restore_stat(
        &mut self,
        stat_type: SurvivalStatType,
        value: i32,
        random: &mut dyn SurvivalRandomSource,
    ) -> Option<EffectChange> {
        let index = self.stats.iter().position(|s| s.stat_type() == stat_type)?;
        let crossed = self.stats[index].change_value(value);
        let change = update_survival_effect(&mut self.effects, &self.stats[index], &crossed, random);
        self.refresh_death();
        Some(change)
    }

    /// Advances one turn: applies stat rates, reconciles effects, applies
    /// hazard damage.
    pub fn update(&mut self, random: &mut dyn SurvivalRandomSource) -> SurvivalTick {
        let mut tick = SurvivalTick::default();
        if self.dead {
            return tick;
        }

        for stat in &mut self.stats {
            if stat.rate() == 0 {
                continue;
            }
            let crossed = stat.change_value(-stat.rate());
            let change = update_survival_effect(&mut self.effects, stat, &crossed, random);
            if change != EffectChange::Unchanged {
                tick.effect_changes.push((stat.stat_type(), change));
            }
        }

        tick.hazard_damage = self.effects.periodic_damage();
        if tick.hazard_damage > 0 {
            self.take_damage(tick.hazard_damage);
        }
        tick.died = self.dead;
        tick
    }

    fn change_stat(&mut self, stat_type: SurvivalStatType, delta: i32) {
        if let Some(stat) = self.stats.iter_mut().find(|s| s.stat_type() == stat_type) {
            stat.change_value(delta);
        }
        self.refresh_death();
    }

    fn refresh_death(&mut self) {
        if self
            .stat(SurvivalStatType::Health)
            .is_some_and(SurvivalStat::is_at_min)
        {
            self.dead = true;
        }
    }
}

crate::person::person_module!(SurvivalModule, crate::person::ModuleKey::Survival);
