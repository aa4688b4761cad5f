//! Content loaders for reading game data from files.
//!
//! RON catalogs become a [`SchemeCatalog`]; the TOML tunables become a
//! [`tactics_core::TacticsConfig`].

pub mod catalog;
pub mod config;
pub mod factory;

pub use catalog::{SchemeCatalog, StartingKit};
pub use config::ConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
