//! Tactical acts and their resolution.
//!
//! Acts come from equipment, innate abilities, or a person's default act
//! ([`CombatActModule::calc_acts`]). Bots pick one with [`select_best_act`]
//! and every usage goes through [`use_act`], which draws all randomness from
//! an injected [`TacticalActRandomSource`](crate::random::TacticalActRandomSource).

mod act;
mod error;
mod modules;
mod resolver;
mod select;

pub use act::{
    ActConstraints, ActEffect, ActRange, ImpactType, Offence, OffenceType, TacticalAct, TacticalActScheme,
    TacticalActStats,
};
pub use error::CombatError;
pub use modules::{CombatActModule, CombatStatsModule};
pub use resolver::{ActUsageOutcome, ArmorSave, HitOutcome, use_act};
pub use select::{constraints_satisfied, select_best_act};
