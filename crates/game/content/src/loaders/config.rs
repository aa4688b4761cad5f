//! Tactics configuration loader.

use std::path::Path;

use anyhow::Context;
use tactics_core::TacticsConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`TacticsConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Built-in tunables shipped with the crate.
    pub const EMBEDDED: &'static str = include_str!("../../data/config.toml");

    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their default values.
    pub fn load(path: &Path) -> LoadResult<TacticsConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<TacticsConfig> {
        let config: TacticsConfig = toml::from_str(content).context("Failed to parse config TOML")?;
        Self::validate(&config)?;
        Ok(config)
    }

    pub fn embedded() -> LoadResult<TacticsConfig> {
        Self::parse(Self::EMBEDDED)
    }

    fn validate(config: &TacticsConfig) -> LoadResult<()> {
        anyhow::ensure!(
            config.idle_duration_min <= config.idle_duration_max,
            "idle_duration_min ({}) exceeds idle_duration_max ({})",
            config.idle_duration_min,
            config.idle_duration_max
        );
        anyhow::ensure!(
            (1..=6).contains(&config.to_hit_base),
            "to_hit_base must be a d6 face, got {}",
            config.to_hit_base
        );
        Ok(())
    }
}
