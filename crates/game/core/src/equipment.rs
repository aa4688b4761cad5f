//! Worn equipment: weapons grant acts, armor grants saves.

use crate::combat::{ImpactType, TacticalActScheme};
use crate::error::{ErrorSeverity, GameError};
use crate::scheme::{PropScheme, SchemeError, SchemeOracle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotKind {
    Hand,
    Body,
    Head,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorScheme {
    pub impact: ImpactType,
    pub rank: u32,
    pub absorption: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipScheme {
    pub slot: SlotKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub acts: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armors: Vec<ArmorScheme>,
}

/// An equippable prop with its act schemes resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Equipment {
    pub sid: String,
    pub slot: SlotKind,
    pub acts: Vec<TacticalActScheme>,
    pub armors: Vec<ArmorScheme>,
}

impl Equipment {
    pub fn from_scheme(prop: &PropScheme, schemes: &dyn SchemeOracle) -> Result<Self, SchemeError> {
        let equip = prop.equip.as_ref().ok_or_else(|| SchemeError::NotEquipment(prop.sid.clone()))?;
        let acts = equip
            .acts
            .iter()
            .map(|sid| schemes.require_act(sid).cloned())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sid: prop.sid.clone(),
            slot: equip.slot,
            acts,
            armors: equip.armors.clone(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EquipmentError {
    #[error("slot {index} does not exist")]
    SlotOutOfRange { index: usize },

    #[error("slot {index} takes {expected}, got {actual}")]
    SlotMismatch {
        index: usize,
        expected: SlotKind,
        actual: SlotKind,
    },

    #[error("no free {0} slot")]
    NoFreeSlot(SlotKind),
}

impl GameError for EquipmentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SlotOutOfRange { .. } => "EQUIPMENT_SLOT_OUT_OF_RANGE",
            Self::SlotMismatch { .. } => "EQUIPMENT_SLOT_MISMATCH",
            Self::NoFreeSlot(_) => "EQUIPMENT_NO_FREE_SLOT",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EquipmentModule {
    slots: Vec<SlotKind>,
    items: Vec<Option<Equipment>>,
}

impl EquipmentModule {
    pub fn new(slots: impl IntoIterator<Item = SlotKind>) -> Self {
        let slots: Vec<_> = slots.into_iter().collect();
        let items = vec![None; slots.len()];
        Self { slots, items }
    }

    pub fn slots(&self) -> &[SlotKind] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Equipment> {
        self.items.get(index)?.as_ref()
    }

    /// Puts equipment into a slot and returns what was there before.
    pub fn equip(&mut self, index: usize, equipment: Equipment) -> Result<Option<Equipment>, EquipmentError> {
        let expected = *self
            .slots
            .get(index)
            .ok_or(EquipmentError::SlotOutOfRange { index })?;
        if expected != equipment.slot {
            return Err(EquipmentError::SlotMismatch {
                index,
                expected,
                actual: equipment.slot,
            });
        }
        Ok(self.items[index].replace(equipment))
    }

    /// Equips into the first free slot of the matching kind.
    pub fn equip_free(&mut self, equipment: Equipment) -> Result<usize, EquipmentError> {
        let index = self
            .slots
            .iter()
            .zip(&self.items)
            .position(|(slot, item)| *slot == equipment.slot && item.is_none())
            .ok_or(EquipmentError::NoFreeSlot(equipment.slot))?;
        self.items[index] = Some(equipment);
        Ok(index)
    }

    pub fn unequip(&mut self, index: usize) -> Option<Equipment> {
        self.items.get_mut(index)?.take()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Equipment> {
        self.items.iter().flatten()
    }

    pub fn armors(&self) -> impl Iterator<Item = &ArmorScheme> {
        self.iter().flat_map(|equipment| equipment.armors.iter())
    }
}

crate::person::person_module!(EquipmentModule, crate::person::ModuleKey::Equipment);

#[cfg(test)]
mod tests {
    use super::*;

    fn sword() -> Equipment {
        Equipment {
            sid: "short-sword".into(),
            slot: SlotKind::Hand,
            acts: Vec::new(),
            armors: Vec::new(),
        }
    }

    fn armor() -> Equipment {
        Equipment {
            sid: "steel-armor".into(),
            slot: SlotKind::Body,
            acts: Vec::new(),
            armors: vec![ArmorScheme {
                impact: ImpactType::Kinetic,
                rank: 3,
                absorption: 2,
            }],
        }
    }

    #[test]
    fn equip_checks_slot_kind() {
        let mut module = EquipmentModule::new([SlotKind::Hand, SlotKind::Body]);

        assert_eq!(module.equip(0, sword()), Ok(None));
        assert!(matches!(
            module.equip(0, armor()),
            Err(EquipmentError::SlotMismatch { .. })
        ));
        assert!(matches!(
            module.equip(5, sword()),
            Err(EquipmentError::SlotOutOfRange { index: 5 })
        ));
    }

    #[test]
    fn equip_free_fills_matching_slots_in_order() {
        let mut module = EquipmentModule::new([SlotKind::Hand, SlotKind::Hand, SlotKind::Body]);

        assert_eq!(module.equip_free(sword()), Ok(0));
        assert_eq!(module.equip_free(sword()), Ok(1));
        assert_eq!(module.equip_free(sword()), Err(EquipmentError::NoFreeSlot(SlotKind::Hand)));
        assert_eq!(module.equip_free(armor()), Ok(2));

        assert_eq!(module.armors().count(), 1);
        assert_eq!(module.unequip(2).map(|e| e.sid), Some("steel-armor".to_string()));
        assert_eq!(module.armors().count(), 0);
    }
}
