//! Static content schemes and the read-only lookup contract.
//!
//! Schemes are immutable descriptions keyed by symbolic id (sid). The core
//! never loads them itself; a [`SchemeOracle`] implementation (usually a
//! [`SchemeRegistry`] filled by the content crate) is passed in where needed.

use std::collections::BTreeMap;

use crate::combat::TacticalActScheme;
use crate::equipment::{ArmorScheme, EquipScheme, SlotKind};
use crate::error::{ErrorSeverity, GameError};
use crate::evolution::PerkScheme;
use crate::survival::SurvivalStatType;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceScheme {
    pub resource_type: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatRestore {
    pub stat: SurvivalStatType,
    pub value: i32,
}

/// Effect of consuming a prop on oneself (eating, drinking, bandaging).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsageScheme {
    pub restore: Vec<StatRestore>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropScheme {
    pub sid: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equip: Option<EquipScheme>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource: Option<ResourceScheme>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub usage: Option<UsageScheme>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonScheme {
    pub sid: String,
    pub hp: i32,
    /// Act used when no weapon grants one (bare hands).
    pub default_act: String,
    pub slots: Vec<SlotKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub built_in_perks: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterScheme {
    pub sid: String,
    pub hp: i32,
    pub acts: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armors: Vec<ArmorScheme>,
    /// Tables rolled into a loot pile when the monster dies.
    #[cfg_attr(feature = "serde", serde(default))]
    pub drop_tables: Vec<String>,
}

/// One weighted outcome of a drop table. A record without a prop drops
/// nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropTableRecord {
    #[cfg_attr(feature = "serde", serde(default))]
    pub prop: Option<String>,
    pub weight: u32,
    pub min_count: u32,
    pub max_count: u32,
}

/// Weighted loot table; each roll picks one record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropTableScheme {
    pub sid: String,
    pub rolls: u32,
    pub records: Vec<DropTableRecord>,
}

impl DropTableScheme {
    pub fn total_weight(&self) -> u32 {
        self.records.iter().map(|record| record.weight).sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum SchemeKind {
    Act,
    Prop,
    Perk,
    Person,
    Monster,
    DropTable,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemeError {
    #[error("{kind} scheme {sid} not found")]
    Missing { kind: SchemeKind, sid: String },

    #[error("prop scheme {0} is not equipment")]
    NotEquipment(String),
}

impl SchemeError {
    pub fn missing(kind: SchemeKind, sid: &str) -> Self {
        Self::Missing {
            kind,
            sid: sid.to_owned(),
        }
    }
}

impl GameError for SchemeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "SCHEME_MISSING",
            Self::NotEquipment(_) => "SCHEME_NOT_EQUIPMENT",
        }
    }
}

/// Read-only scheme lookup by sid.
pub trait SchemeOracle {
    fn act(&self, sid: &str) -> Option<&TacticalActScheme>;
    fn prop(&self, sid: &str) -> Option<&PropScheme>;
    fn perk(&self, sid: &str) -> Option<&PerkScheme>;
    /// All perk schemes in a stable order.
    fn perks(&self) -> Vec<&PerkScheme>;
    fn person(&self, sid: &str) -> Option<&PersonScheme>;
    fn monster(&self, sid: &str) -> Option<&MonsterScheme>;
    fn drop_table(&self, sid: &str) -> Option<&DropTableScheme>;

    fn require_act(&self, sid: &str) -> Result<&TacticalActScheme, SchemeError> {
        self.act(sid).ok_or_else(|| SchemeError::missing(SchemeKind::Act, sid))
    }

    fn require_prop(&self, sid: &str) -> Result<&PropScheme, SchemeError> {
        self.prop(sid).ok_or_else(|| SchemeError::missing(SchemeKind::Prop, sid))
    }

    fn require_person(&self, sid: &str) -> Result<&PersonScheme, SchemeError> {
        self.person(sid).ok_or_else(|| SchemeError::missing(SchemeKind::Person, sid))
    }

    fn require_monster(&self, sid: &str) -> Result<&MonsterScheme, SchemeError> {
        self.monster(sid).ok_or_else(|| SchemeError::missing(SchemeKind::Monster, sid))
    }

    fn require_drop_table(&self, sid: &str) -> Result<&DropTableScheme, SchemeError> {
        self.drop_table(sid)
            .ok_or_else(|| SchemeError::missing(SchemeKind::DropTable, sid))
    }
}

/// In-memory scheme store, ordered by sid.
#[derive(Clone, Debug, Default)]
pub struct SchemeRegistry {
    acts: BTreeMap<String, TacticalActScheme>,
    props: BTreeMap<String, PropScheme>,
    perks: BTreeMap<String, PerkScheme>,
    persons: BTreeMap<String, PersonScheme>,
    monsters: BTreeMap<String, MonsterScheme>,
    drop_tables: BTreeMap<String, DropTableScheme>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_act(&mut self, scheme: TacticalActScheme) {
        self.acts.insert(scheme.sid.clone(), scheme);
    }

    pub fn insert_prop(&mut self, scheme: PropScheme) {
        self.props.insert(scheme.sid.clone(), scheme);
    }

    pub fn insert_perk(&mut self, scheme: PerkScheme) {
        self.perks.insert(scheme.sid.clone(), scheme);
    }

    pub fn insert_person(&mut self, scheme: PersonScheme) {
        self.persons.insert(scheme.sid.clone(), scheme);
    }

    pub fn insert_monster(&mut self, scheme: MonsterScheme) {
        self.monsters.insert(scheme.sid.clone(), scheme);
    }

    pub fn insert_drop_table(&mut self, scheme: DropTableScheme) {
        self.drop_tables.insert(scheme.sid.clone(), scheme);
    }

    pub fn act_count(&self) -> usize {
        self.acts.len()
    }

    pub fn prop_count(&self) -> usize {
        self.props.len()
    }

    pub fn monster_sids(&self) -> impl Iterator<Item = &str> {
        self.monsters.keys().map(String::as_str)
    }

    pub fn person_sids(&self) -> impl Iterator<Item = &str> {
        self.persons.keys().map(String::as_str)
    }

    pub fn drop_table_sids(&self) -> impl Iterator<Item = &str> {
        self.drop_tables.keys().map(String::as_str)
    }
}

impl SchemeOracle for SchemeRegistry {
    fn act(&self, sid: &str) -> Option<&TacticalActScheme> {
        self.acts.get(sid)
    }

    fn prop(&self, sid: &str) -> Option<&PropScheme> {
        self.props.get(sid)
    }

    fn perk(&self, sid: &str) -> Option<&PerkScheme> {
        self.perks.get(sid)
    }

    fn perks(&self) -> Vec<&PerkScheme> {
        self.perks.values().collect()
    }

    fn person(&self, sid: &str) -> Option<&PersonScheme> {
        self.persons.get(sid)
    }

    fn monster(&self, sid: &str) -> Option<&MonsterScheme> {
        self.monsters.get(sid)
    }

    fn drop_table(&self, sid: &str) -> Option<&DropTableScheme> {
        self.drop_tables.get(sid)
    }
}
