//! Content factory for loading a whole data directory.

use std::path::{Path, PathBuf};

use tactics_core::TacticsConfig;

use crate::loaders::{ConfigLoader, LoadResult, SchemeCatalog};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── acts.ron
/// ├── props.ron
/// ├── perks.ron
/// ├── persons.ron
/// ├── monsters.ron
/// ├── drops.ron
/// └── kits.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load tunables from `config.toml`.
    pub fn load_config(&self) -> LoadResult<TacticsConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load every scheme catalog file.
    pub fn load_catalog(&self) -> LoadResult<SchemeCatalog> {
        SchemeCatalog::load_dir(&self.data_dir)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
