//! Data-driven content definitions and loaders.
//!
//! This crate houses static game content and provides loaders for RON/TOML data files:
//! - Tactical act, prop, perk, person and monster schemes (RON)
//! - Starting kits (RON)
//! - Tactical tunables (TOML)
//!
//! The shipped data under `data/` is embedded at compile time; a different
//! content set can be loaded from any directory with the same layout.
//! [`PersonFactory`] turns schemes into ready-to-place persons.

pub mod loaders;
pub mod person;

pub use loaders::{ConfigLoader, ContentFactory, LoadResult, SchemeCatalog, StartingKit};
pub use person::{FactoryError, PersonFactory, apply_kit, grant_equipment, grant_resource};
