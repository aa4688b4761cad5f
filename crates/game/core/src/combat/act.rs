//! Tactical act schemes and instantiated acts.

use crate::ids::NodeId;
use crate::map::SectorMap;
use crate::random::Roll;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActEffect {
    Damage,
    Heal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OffenceType {
    Tactical,
    Ballistic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImpactType {
    Kinetic,
    Acid,
    Psy,
}

/// How an act penetrates armor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offence {
    pub offence_type: OffenceType,
    pub impact: ImpactType,
    pub ap_rank: u32,
}

/// Inclusive hex distance band in which an act can be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActRange {
    pub min: u32,
    pub max: u32,
}

impl ActRange {
    pub const MELEE: ActRange = ActRange::new(1, 1);

    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub const fn contains(&self, distance: u32) -> bool {
        self.min <= distance && distance <= self.max
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TacticalActStats {
    pub effect: ActEffect,
    pub efficient: Roll,
    #[cfg_attr(feature = "serde", serde(default))]
    pub offence: Option<Offence>,
    pub range: ActRange,
    #[cfg_attr(feature = "serde", serde(default = "default_hit_count"))]
    pub hit_count: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_melee: bool,
}

fn default_hit_count() -> u32 {
    1
}

impl TacticalActStats {
    pub fn melee_damage(efficient: Roll) -> Self {
        Self {
            effect: ActEffect::Damage,
            efficient,
            offence: Some(Offence {
                offence_type: OffenceType::Tactical,
                impact: ImpactType::Kinetic,
                ap_rank: 1,
            }),
            range: ActRange::MELEE,
            hit_count: default_hit_count(),
            is_melee: true,
        }
    }
}

/// Resource the act consumes on every use (arrows, bolts, charges).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActConstraints {
    pub prop_resource_type: String,
    pub prop_resource_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TacticalActScheme {
    pub sid: String,
    pub stats: TacticalActStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Option<ActConstraints>,
    #[cfg_attr(feature = "serde", serde(default = "default_to_hit"))]
    pub to_hit: Roll,
}

fn default_to_hit() -> Roll {
    Roll::D6
}

impl TacticalActScheme {
    pub fn new(sid: impl Into<String>, stats: TacticalActStats) -> Self {
        Self {
            sid: sid.into(),
            stats,
            constraints: None,
            to_hit: default_to_hit(),
        }
    }

    pub fn with_constraints(mut self, resource_type: impl Into<String>, count: u32) -> Self {
        self.constraints = Some(ActConstraints {
            prop_resource_type: resource_type.into(),
            prop_resource_count: count,
        });
        self
    }
}

/// An act available to a person right now, possibly granted by equipment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TacticalAct {
    pub scheme: TacticalActScheme,
    pub to_hit: Roll,
    pub efficient: Roll,
    /// Sid of the equipment granting this act, if any.
    pub equipment: Option<String>,
}

impl TacticalAct {
    pub fn new(scheme: TacticalActScheme, equipment: Option<String>) -> Self {
        Self {
            to_hit: scheme.to_hit,
            efficient: scheme.stats.efficient,
            scheme,
            equipment,
        }
    }

    pub fn sid(&self) -> &str {
        &self.scheme.sid
    }

    pub fn stats(&self) -> &TacticalActStats {
        &self.scheme.stats
    }

    pub fn constraints(&self) -> Option<&ActConstraints> {
        self.scheme.constraints.as_ref()
    }

    /// True if the hex distance between the nodes lies within the act's range.
    pub fn check_distance(&self, map: &SectorMap, from: NodeId, to: NodeId) -> bool {
        self.scheme.stats.range.contains(map.distance_between(from, to))
    }
}
