//! Session configuration loaded from the environment.

use std::path::PathBuf;
use std::str::FromStr;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Seed for the dice and for scenario placement.
    pub seed: u64,
    pub map_size: u32,
    /// Ticks an autoplay run may take before it gives up.
    pub iteration_limit: u64,
    /// Catalog directory; the embedded catalog is used when unset.
    pub content_dir: Option<PathBuf>,
    pub kit: String,
    pub monster_count: usize,
    /// Let bot logic drive the human player.
    pub autopilot: bool,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_MAP_SIZE: u32 = 12;
    pub const DEFAULT_ITERATION_LIMIT: u64 = 40_000;
    pub const DEFAULT_KIT: &'static str = "survivor";
    pub const DEFAULT_MONSTER_COUNT: usize = 6;

    pub const SEED_ENV: &'static str = "TACTICS_SEED";
    pub const MAP_SIZE_ENV: &'static str = "TACTICS_MAP_SIZE";
    pub const ITERATION_LIMIT_ENV: &'static str = "TACTICS_ITERATION_LIMIT";
    pub const CONTENT_DIR_ENV: &'static str = "TACTICS_CONTENT_DIR";
    pub const KIT_ENV: &'static str = "TACTICS_KIT";
    pub const MONSTERS_ENV: &'static str = "TACTICS_MONSTERS";
    pub const AUTOPILOT_ENV: &'static str = "TACTICS_AUTOPILOT";
    pub const EVENT_CAPACITY_ENV: &'static str = "TACTICS_EVENT_CAPACITY";

    /// Reads overrides from the process environment. A missing seed is drawn
    /// at random.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit variable lookup.
    /// Values that fail to parse fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            seed: parse(read(Self::SEED_ENV)).unwrap_or_else(rand::random),
            map_size: parse(read(Self::MAP_SIZE_ENV)).unwrap_or(defaults.map_size),
            iteration_limit: parse(read(Self::ITERATION_LIMIT_ENV)).unwrap_or(defaults.iteration_limit),
            content_dir: read(Self::CONTENT_DIR_ENV).map(PathBuf::from),
            kit: read(Self::KIT_ENV).unwrap_or(defaults.kit),
            monster_count: parse(read(Self::MONSTERS_ENV)).unwrap_or(defaults.monster_count),
            autopilot: parse(read(Self::AUTOPILOT_ENV)).unwrap_or(defaults.autopilot),
            event_buffer_size: parse(read(Self::EVENT_CAPACITY_ENV)).unwrap_or(defaults.event_buffer_size),
            command_buffer_size: defaults.command_buffer_size,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            map_size: Self::DEFAULT_MAP_SIZE,
            iteration_limit: Self::DEFAULT_ITERATION_LIMIT,
            content_dir: None,
            kit: Self::DEFAULT_KIT.to_owned(),
            monster_count: Self::DEFAULT_MONSTER_COUNT,
            autopilot: true,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

fn parse<T: FromStr>(value: Option<String>) -> Option<T> {
    value?.trim().parse().ok()
}
