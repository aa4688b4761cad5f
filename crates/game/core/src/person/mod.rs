//! Persons as capability registries.
//!
//! A [`Person`] owns a set of modules keyed by [`ModuleKey`]: survival,
//! evolution, equipment, inventory, combat stats and combat acts. Human
//! persons carry all of them; monsters typically lack evolution and
//! inventory. Callers either require a module ([`Person::module`]) or look
//! for it ([`Person::module_safe`]).

mod error;

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

pub use error::PersonError;

use crate::combat::{CombatActModule, CombatStatsModule, TacticalAct};
use crate::equipment::EquipmentModule;
use crate::evolution::{EvolutionModule, RollBonuses};
use crate::inventory::InventoryModule;
use crate::survival::SurvivalModule;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModuleKey {
    Survival,
    Evolution,
    Equipment,
    Inventory,
    CombatStats,
    CombatActs,
}

/// A capability a person may carry.
pub trait PersonModule: Any + fmt::Debug + Send {
    fn key(&self) -> ModuleKey;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Modules with a statically known key, usable with the typed accessors.
pub trait KeyedModule: PersonModule + Sized {
    const KEY: ModuleKey;
}

/// Implements [`PersonModule`] and [`KeyedModule`] for a module type.
macro_rules! person_module {
    ($module:ty, $key:expr) => {
        impl $crate::person::PersonModule for $module {
            fn key(&self) -> $crate::person::ModuleKey {
                $key
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }

        impl $crate::person::KeyedModule for $module {
            const KEY: $crate::person::ModuleKey = $key;
        }
    };
}
pub(crate) use person_module;

#[derive(Debug, Default)]
pub struct Person {
    sid: String,
    modules: BTreeMap<ModuleKey, Box<dyn PersonModule>>,
}

impl Person {
    pub fn new(sid: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            modules: BTreeMap::new(),
        }
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// Registers a module. Each key may be registered once.
    pub fn add_module<M: PersonModule>(&mut self, module: M) -> Result<(), PersonError> {
        let key = module.key();
        if self.modules.contains_key(&key) {
            return Err(PersonError::DuplicateModule(key));
        }
        self.modules.insert(key, Box::new(module));
        Ok(())
    }

    /// Builder form of [`Person::add_module`].
    pub fn with_module<M: PersonModule>(mut self, module: M) -> Result<Self, PersonError> {
        self.add_module(module)?;
        Ok(self)
    }

    pub fn has_module(&self, key: ModuleKey) -> bool {
        self.modules.contains_key(&key)
    }

    /// Typed accessor; fails if the person lacks the capability.
    pub fn module<M: KeyedModule>(&self) -> Result<&M, PersonError> {
        self.module_safe::<M>().ok_or(PersonError::MissingModule(M::KEY))
    }

    pub fn module_mut<M: KeyedModule>(&mut self) -> Result<&mut M, PersonError> {
        self.module_safe_mut::<M>().ok_or(PersonError::MissingModule(M::KEY))
    }

    /// Optional accessor; `None` if the person lacks the capability.
    pub fn module_safe<M: KeyedModule>(&self) -> Option<&M> {
        self.modules.get(&M::KEY)?.as_any().downcast_ref::<M>()
    }

    pub fn module_safe_mut<M: KeyedModule>(&mut self) -> Option<&mut M> {
        self.modules.get_mut(&M::KEY)?.as_any_mut().downcast_mut::<M>()
    }

    pub fn is_dead(&self) -> bool {
        self.module_safe::<SurvivalModule>()
            .is_some_and(SurvivalModule::is_dead)
    }

    /// Acts available right now: equipment acts first, then innate acts.
    pub fn acts(&self) -> Vec<TacticalAct> {
        self.module_safe::<CombatActModule>()
            .map(|module| module.calc_acts(self.module_safe::<EquipmentModule>()))
            .unwrap_or_default()
    }

    pub fn inventory(&self) -> Option<&InventoryModule> {
        self.module_safe::<InventoryModule>()
    }

    /// Perk bonuses minus survival hazard penalties.
    pub fn roll_bonuses(&self) -> RollBonuses {
        let mut bonuses = self
            .module_safe::<EvolutionModule>()
            .map(EvolutionModule::roll_bonuses)
            .unwrap_or_default();
        if let Some(survival) = self.module_safe::<SurvivalModule>() {
            bonuses.to_hit -= survival.effects().to_hit_penalty();
            bonuses.efficiency -= survival.effects().efficiency_penalty();
        }
        bonuses
    }

    /// Armor from worn equipment followed by innate defences.
    pub fn armors(&self) -> Vec<crate::equipment::ArmorScheme> {
        let mut armors: Vec<_> = self
            .module_safe::<EquipmentModule>()
            .map(|equipment| equipment.armors().cloned().collect())
            .unwrap_or_default();
        if let Some(stats) = self.module_safe::<CombatStatsModule>() {
            armors.extend(stats.armors().iter().cloned());
        }
        armors
    }
}
