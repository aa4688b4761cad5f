//! Builds persons from schemes and hands out starting props.

use tactics_core::combat::{CombatActModule, CombatStatsModule};
use tactics_core::equipment::{Equipment, EquipmentModule};
use tactics_core::evolution::{EvolutionError, EvolutionModule, Perk};
use tactics_core::inventory::{InventoryModule, Prop, Resource};
use tactics_core::{Person, PersonError, SchemeError, SchemeOracle, SurvivalModule, TacticsConfig};
use tracing::{debug, warn};

use crate::loaders::StartingKit;

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error(transparent)]
    Scheme(#[from] SchemeError),

    #[error(transparent)]
    Person(#[from] PersonError),

    #[error(transparent)]
    Evolution(#[from] EvolutionError),
}

/// Creates fully equipped persons for human players and monsters.
pub struct PersonFactory<'a> {
    schemes: &'a dyn SchemeOracle,
    config: &'a TacticsConfig,
}

impl<'a> PersonFactory<'a> {
    pub fn new(schemes: &'a dyn SchemeOracle, config: &'a TacticsConfig) -> Self {
        Self { schemes, config }
    }

    /// A human person: survival with hunger and thirst, empty equipment
    /// slots, an inventory, bare-hand fallback act, and perks.
    pub fn create_human(&self, sid: &str) -> Result<Person, FactoryError> {
        let scheme = self.schemes.require_person(sid)?;
        let default_act = self.schemes.require_act(&scheme.default_act)?.clone();

        let mut evolution = EvolutionModule::new(self.schemes)?;
        evolution.add_built_in_perks(scheme.built_in_perks.iter().map(Perk::built_in));

        let person = Person::new(sid)
            .with_module(SurvivalModule::human(scheme.hp, self.config))?
            .with_module(EquipmentModule::new(scheme.slots.iter().copied()))?
            .with_module(InventoryModule::new())?
            .with_module(CombatActModule::with_default(default_act))?
            .with_module(evolution)?;
        debug!(sid, "human person created");
        Ok(person)
    }

    /// A monster person: health, innate acts and innate armor.
    pub fn create_monster(&self, sid: &str) -> Result<Person, FactoryError> {
        let scheme = self.schemes.require_monster(sid)?;
        let acts = scheme
            .acts
            .iter()
            .map(|act| self.schemes.require_act(act).cloned())
            .collect::<Result<Vec<_>, _>>()?;

        let person = Person::new(sid)
            .with_module(SurvivalModule::with_health(scheme.hp))?
            .with_module(CombatActModule::new(acts, None))?
            .with_module(CombatStatsModule::new(scheme.armors.clone()))?;
        debug!(sid, "monster person created");
        Ok(person)
    }

    /// A human person carrying a starting kit.
    pub fn create_equipped_human(&self, sid: &str, kit: &StartingKit) -> Result<Person, FactoryError> {
        let mut person = self.create_human(sid)?;
        apply_kit(&mut person, kit, self.schemes);
        Ok(person)
    }
}

/// Equips a prop into the first free matching slot, or stores it in the
/// inventory when every slot is taken.
///
/// Missing or unusable content is logged and skipped; returns whether the
/// prop was granted.
pub fn grant_equipment(person: &mut Person, sid: &str, schemes: &dyn SchemeOracle) -> bool {
    let equipment = match schemes.require_prop(sid).and_then(|prop| Equipment::from_scheme(prop, schemes)) {
        Ok(equipment) => equipment,
        Err(err) => {
            warn!(person = person.sid(), prop = sid, %err, "equipment skipped");
            return false;
        }
    };

    let leftover = match person.module_safe_mut::<EquipmentModule>() {
        Some(slots) => match slots.equip_free(equipment.clone()) {
            Ok(_) => return true,
            Err(_) => equipment,
        },
        None => equipment,
    };
    match person.module_safe_mut::<InventoryModule>() {
        Some(inventory) => {
            inventory.add(Prop::Equipment(leftover));
            true
        }
        None => {
            warn!(person = person.sid(), prop = sid, "no slot or inventory for equipment");
            false
        }
    }
}

/// Adds `count` units of a resource prop to the inventory.
///
/// Missing content or a missing inventory is logged and skipped.
pub fn grant_resource(person: &mut Person, sid: &str, count: u32, schemes: &dyn SchemeOracle) -> bool {
    let scheme = match schemes.require_prop(sid) {
        Ok(scheme) => scheme,
        Err(err) => {
            warn!(person = person.sid(), prop = sid, %err, "resource skipped");
            return false;
        }
    };
    let person_sid = person.sid().to_owned();
    let Some(inventory) = person.module_safe_mut::<InventoryModule>() else {
        warn!(person = %person_sid, prop = sid, "person has no inventory");
        return false;
    };
    inventory.add(Prop::Resource(Resource::from_scheme(scheme, count)));
    true
}

/// Grants every item of a kit; returns how many entries were granted.
pub fn apply_kit(person: &mut Person, kit: &StartingKit, schemes: &dyn SchemeOracle) -> usize {
    let equipped = kit
        .equipment
        .iter()
        .filter(|sid| grant_equipment(person, sid, schemes))
        .count();
    let stocked = kit
        .resources
        .iter()
        .filter(|(sid, count)| grant_resource(person, sid, *count, schemes))
        .count();
    equipped + stocked
}
