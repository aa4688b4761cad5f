//! Tactical act resolution.
//!
//! Using an act runs three gates (range, line of sight, living target),
//! consumes the act's resource, then resolves each hit independently:
//!
//! ```text
//! to_hit:     roll_to_hit(to_hit_roll) >= clamp(to_hit_base - to_hit_bonus, 2, 6)
//! efficiency: max(roll_efficient(efficient) + buff + efficiency_bonus, 1)
//! armor save: ap_rank <= rank && roll_armor_save() >= clamp(6 - (rank - ap_rank), 2, 6)
//!             absorbs min(absorption, efficiency)
//! ```
//!
//! Bonuses combine perk rules with survival hazard penalties
//! (see [`Person::roll_bonuses`](crate::person::Person::roll_bonuses)).

use tracing::debug;

use super::act::{ActEffect, Offence, TacticalAct, TacticalActStats};
use super::error::CombatError;
use crate::actor::Actor;
use crate::config::TacticsConfig;
use crate::equipment::ArmorScheme;
use crate::evolution::RollBonuses;
use crate::ids::{ActorId, NodeId};
use crate::inventory::{InventoryError, InventoryModule};
use crate::map::SectorMap;
use crate::random::TacticalActRandomSource;
use crate::survival::SurvivalModule;

const MIN_THRESHOLD: i32 = 2;
const MAX_THRESHOLD: i32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorSave {
    pub roll: u32,
    pub threshold: u32,
    /// Points absorbed; zero when the save failed.
    pub absorbed: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitOutcome {
    Miss { roll: u32 },
    Damage { amount: u32, armor_save: Option<ArmorSave> },
    Heal { amount: u32 },
}

impl HitOutcome {
    pub fn landed(&self) -> bool {
        !matches!(self, HitOutcome::Miss { .. })
    }
}

/// Result of one act usage, as reported to observers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActUsageOutcome {
    pub act_sid: String,
    pub attacker: ActorId,
    pub target: ActorId,
    pub target_node: NodeId,
    pub stats: TacticalActStats,
    pub hits: Vec<HitOutcome>,
    pub target_died: bool,
}

impl ActUsageOutcome {
    pub fn landed_hits(&self) -> u32 {
        self.hits.iter().filter(|hit| hit.landed()).count() as u32
    }

    pub fn total_damage(&self) -> u32 {
        self.hits
            .iter()
            .map(|hit| match hit {
                HitOutcome::Damage { amount, .. } => *amount,
                _ => 0,
            })
            .sum()
    }
}

/// Uses `act` from `attacker` on `target`.
///
/// Fails without side effects when a gate rejects the usage or the attacker
/// cannot pay the act's resource cost.
pub fn use_act(
    map: &SectorMap,
    attacker: &mut Actor,
    target: &mut Actor,
    act: &TacticalAct,
    config: &TacticsConfig,
    random: &mut dyn TacticalActRandomSource,
) -> Result<ActUsageOutcome, CombatError> {
    let range = act.stats().range;
    let distance = map.distance_between(attacker.node, target.node);
    if !range.contains(distance) {
        return Err(CombatError::OutOfRange {
            distance,
            min: range.min,
            max: range.max,
        });
    }
    if !map.target_is_on_line(attacker.node, target.node) {
        return Err(CombatError::NoLineOfSight {
            from: attacker.node,
            to: target.node,
        });
    }
    if target.is_dead() {
        return Err(CombatError::TargetDead(target.id));
    }

    pay_resource(attacker, act)?;

    let bonuses = attacker.person.roll_bonuses();
    let armors = target.person.armors();
    let stats = act.stats();
    let mut hits = Vec::with_capacity(stats.hit_count as usize);

    for _ in 0..stats.hit_count {
        let hit = resolve_hit(act, bonuses, &armors, config, random);
        apply_hit(target, hit);
        hits.push(hit);
        if target.is_dead() {
            break;
        }
    }

    let outcome = ActUsageOutcome {
        act_sid: act.sid().to_owned(),
        attacker: attacker.id,
        target: target.id,
        target_node: target.node,
        stats: stats.clone(),
        hits,
        target_died: target.is_dead(),
    };
    debug!(
        act = %outcome.act_sid,
        attacker = %outcome.attacker,
        defender = %outcome.target,
        landed = outcome.landed_hits(),
        damage = outcome.total_damage(),
        died = outcome.target_died,
        "act used"
    );
    Ok(outcome)
}

fn pay_resource(attacker: &mut Actor, act: &TacticalAct) -> Result<(), CombatError> {
    let Some(constraints) = act.constraints() else {
        return Ok(());
    };
    match attacker.person.module_safe_mut::<InventoryModule>() {
        Some(inventory) => {
            inventory.consume_resource(&constraints.prop_resource_type, constraints.prop_resource_count)?;
            Ok(())
        }
        None => Err(InventoryError::NotEnoughResource {
            resource_type: constraints.prop_resource_type.clone(),
            required: constraints.prop_resource_count,
            available: 0,
        }
        .into()),
    }
}

fn resolve_hit(
    act: &TacticalAct,
    bonuses: RollBonuses,
    armors: &[ArmorScheme],
    config: &TacticsConfig,
    random: &mut dyn TacticalActRandomSource,
) -> HitOutcome {
    let stats = act.stats();

    if stats.effect == ActEffect::Damage {
        let threshold = (config.to_hit_base - bonuses.to_hit).clamp(MIN_THRESHOLD, MAX_THRESHOLD);
        let roll = random.roll_to_hit(&act.to_hit);
        if i64::from(roll) < i64::from(threshold) {
            return HitOutcome::Miss { roll };
        }
    }

    let rolled = random.roll_efficient(&act.efficient) as i64;
    let efficiency = (rolled + i64::from(act.efficient.buff()) + i64::from(bonuses.efficiency)).max(1) as u32;

    match stats.effect {
        ActEffect::Heal => HitOutcome::Heal { amount: efficiency },
        ActEffect::Damage => {
            let armor_save = stats
                .offence
                .and_then(|offence| roll_armor_save(offence, armors, efficiency, random));
            let absorbed = armor_save.map_or(0, |save| save.absorbed);
            HitOutcome::Damage {
                amount: efficiency - absorbed,
                armor_save,
            }
        }
    }
}

/// Best armor against the offence's impact, by rank then absorption.
fn best_armor(offence: Offence, armors: &[ArmorScheme]) -> Option<&ArmorScheme> {
    armors
        .iter()
        .filter(|armor| armor.impact == offence.impact)
        .max_by_key(|armor| (armor.rank, armor.absorption))
}

fn roll_armor_save(
    offence: Offence,
    armors: &[ArmorScheme],
    damage: u32,
    random: &mut dyn TacticalActRandomSource,
) -> Option<ArmorSave> {
    let armor = best_armor(offence, armors)?;
    if offence.ap_rank > armor.rank {
        return None;
    }
    let threshold = (MAX_THRESHOLD - (armor.rank - offence.ap_rank) as i32).clamp(MIN_THRESHOLD, MAX_THRESHOLD) as u32;
    let roll = random.roll_armor_save();
    let absorbed = if roll >= threshold { armor.absorption.min(damage) } else { 0 };
    Some(ArmorSave {
        roll,
        threshold,
        absorbed,
    })
}

fn apply_hit(target: &mut Actor, hit: HitOutcome) {
    let Some(survival) = target.person.module_safe_mut::<SurvivalModule>() else {
        return;
    };
    match hit {
        HitOutcome::Damage { amount, .. } => survival.take_damage(amount),
        HitOutcome::Heal { amount } => survival.heal(amount),
        HitOutcome::Miss { .. } => {}
    }
}
