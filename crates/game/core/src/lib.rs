//! Deterministic tactical rules for hex-grid sectors.
//!
//! `tactics-core` owns the canonical rules (hex geometry, occupancy, combat,
//! survival, evolution, loot, bot logic) and the turn scheduler that drives
//! them.
//! It performs no I/O: randomness and content arrive through the
//! [`RandomSource`] and [`SchemeOracle`] traits, and every state change made
//! during a tick is reported as an [`InteractionEvent`].
pub mod actor;
pub mod bot;
pub mod combat;
pub mod config;
pub mod container;
pub mod equipment;
pub mod error;
pub mod events;
pub mod evolution;
pub mod ids;
pub mod inventory;
pub mod loot;
pub mod map;
pub mod person;
pub mod random;
pub mod scheduler;
pub mod scheme;
pub mod scoring;
pub mod sector;
pub mod source;
pub mod spatial;
pub mod survival;
pub mod task;

#[cfg(test)]
mod test_support;

pub use actor::{Actor, ActorManager};
pub use bot::{
    ArchetypeStrategyFactory, BotLogic, BotState, PatrolContext, PatrolRouteStrategy, PatrolStrategy,
    RoamingStrategy, StrategyFactory,
};
pub use combat::{
    ActUsageOutcome, CombatActModule, CombatError, CombatStatsModule, HitOutcome, TacticalAct,
    TacticalActScheme, TacticalActStats, select_best_act, use_act,
};
pub use config::TacticsConfig;
pub use container::{ContainerManager, PropContainer};
pub use equipment::{Equipment, EquipmentError, EquipmentModule};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use events::{InteractionEvent, InteractionObserver};
pub use evolution::{EvolutionError, EvolutionModule, JobKind, Perk, PerkLevel};
pub use ids::{ActorId, ContainerId, NodeId, Player, RegionId};
pub use inventory::{InventoryError, InventoryModule, Prop, Resource};
pub use loot::DropResolver;
pub use map::{MapError, PathFindingContext, PathFlags, SectorMap};
pub use person::{ModuleKey, Person, PersonError, PersonModule};
pub use random::{
    DecisionSource, Dice, DiceRandomSource, DropRandomSource, PcgDice, RandomSource, Roll, SurvivalRandomSource,
    TacticalActRandomSource,
};
pub use scheduler::{GameLoop, TaskFault, TickReport};
pub use scheme::{SchemeError, SchemeOracle, SchemeRegistry};
pub use scoring::{DetailedLifetime, ScoreManager};
pub use sector::{MapRegion, Sector};
pub use source::{ActorTaskSource, BotTaskSource, HumanTaskSource, Intention};
pub use spatial::{CubeCoords, HexGraph, OffsetCoords};
pub use survival::{SurvivalModule, SurvivalStat, SurvivalStatType};
pub use task::{ActorTask, TaskError, TaskExecution};
