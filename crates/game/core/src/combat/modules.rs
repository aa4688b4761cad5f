use super::act::{TacticalAct, TacticalActScheme};
use crate::equipment::{ArmorScheme, EquipmentModule};

/// Acts a person can perform without equipment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CombatActModule {
    /// Natural acts (claws, bites); always available.
    innate: Vec<TacticalActScheme>,
    /// Fallback when nothing else grants an act (bare hands).
    default_act: Option<TacticalActScheme>,
}

impl CombatActModule {
    pub fn new(innate: Vec<TacticalActScheme>, default_act: Option<TacticalActScheme>) -> Self {
        Self { innate, default_act }
    }

    pub fn with_default(default_act: TacticalActScheme) -> Self {
        Self::new(Vec::new(), Some(default_act))
    }

    /// Equipment acts in slot order, then innate acts; the default act only
    /// when the list would otherwise be empty.
    pub fn calc_acts(&self, equipment: Option<&EquipmentModule>) -> Vec<TacticalAct> {
        let mut acts: Vec<TacticalAct> = equipment
            .into_iter()
            .flat_map(|equipment| equipment.iter())
            .flat_map(|item| {
                item.acts
                    .iter()
                    .map(|scheme| TacticalAct::new(scheme.clone(), Some(item.sid.clone())))
            })
            .collect();

        acts.extend(self.innate.iter().map(|scheme| TacticalAct::new(scheme.clone(), None)));

        if acts.is_empty()
            && let Some(default_act) = &self.default_act
        {
            acts.push(TacticalAct::new(default_act.clone(), None));
        }
        acts
    }
}

crate::person::person_module!(CombatActModule, crate::person::ModuleKey::CombatActs);

/// Innate defences (hide, chitin).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CombatStatsModule {
    armors: Vec<ArmorScheme>,
}

impl CombatStatsModule {
    pub fn new(armors: Vec<ArmorScheme>) -> Self {
        Self { armors }
    }

    pub fn armors(&self) -> &[ArmorScheme] {
        &self.armors
    }
}

crate::person::person_module!(CombatStatsModule, crate::person::ModuleKey::CombatStats);
