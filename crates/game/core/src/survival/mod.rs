//! Survival stats, hazard key points, and the effect lifecycle.

mod effects;
mod module;
mod stat;

pub use effects::{EffectChange, EffectCollection, SurvivalHazardEffect, update_survival_effect};
pub use module::{SurvivalModule, SurvivalTick};
pub use stat::{HazardLevel, KeyPoint, SurvivalStat, SurvivalStatType};
