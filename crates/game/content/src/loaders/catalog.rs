//! Scheme catalog loader.
//!
//! A catalog directory holds one RON list per scheme kind plus the starting
//! kits:
//!
//! ```text
//! data_dir/
//! ├── acts.ron
//! ├── props.ron
//! ├── perks.ron
//! ├── persons.ron
//! ├── monsters.ron
//! ├── drops.ron
//! └── kits.ron
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, ensure};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tactics_core::combat::TacticalActScheme;
use tactics_core::evolution::PerkScheme;
use tactics_core::scheme::{DropTableScheme, MonsterScheme, PersonScheme, PropScheme};
use tactics_core::{SchemeOracle, SchemeRegistry};

use crate::loaders::{LoadResult, read_file};

/// Equipment and resources handed to a freshly created person.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingKit {
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub resources: Vec<(String, u32)>,
}

/// All schemes of one content set, plus its starting kits.
#[derive(Clone, Debug, Default)]
pub struct SchemeCatalog {
    registry: SchemeRegistry,
    kits: BTreeMap<String, StartingKit>,
}

struct Sources<'a> {
    acts: &'a str,
    props: &'a str,
    perks: &'a str,
    persons: &'a str,
    monsters: &'a str,
    drops: &'a str,
    kits: &'a str,
}

impl SchemeCatalog {
    /// Catalog compiled into the crate from `data/`.
    pub fn embedded() -> LoadResult<Self> {
        Self::from_sources(Sources {
            acts: include_str!("../../data/acts.ron"),
            props: include_str!("../../data/props.ron"),
            perks: include_str!("../../data/perks.ron"),
            persons: include_str!("../../data/persons.ron"),
            monsters: include_str!("../../data/monsters.ron"),
            drops: include_str!("../../data/drops.ron"),
            kits: include_str!("../../data/kits.ron"),
        })
        .context("embedded catalog")
    }

    /// Load a catalog from a data directory.
    pub fn load_dir(dir: &Path) -> LoadResult<Self> {
        let read = |name: &str| read_file(&dir.join(name));
        let (acts, props, perks) = (read("acts.ron")?, read("props.ron")?, read("perks.ron")?);
        let (persons, monsters, kits) = (read("persons.ron")?, read("monsters.ron")?, read("kits.ron")?);
        let drops = read("drops.ron")?;

        Self::from_sources(Sources {
            acts: &acts,
            props: &props,
            perks: &perks,
            persons: &persons,
            monsters: &monsters,
            drops: &drops,
            kits: &kits,
        })
        .with_context(|| format!("catalog in {}", dir.display()))
    }

    fn from_sources(sources: Sources<'_>) -> LoadResult<Self> {
        let mut registry = SchemeRegistry::new();
        for scheme in parse_list::<TacticalActScheme>(sources.acts, "acts")? {
            registry.insert_act(scheme);
        }
        for scheme in parse_list::<PropScheme>(sources.props, "props")? {
            registry.insert_prop(scheme);
        }
        for scheme in parse_list::<PerkScheme>(sources.perks, "perks")? {
            registry.insert_perk(scheme);
        }
        for scheme in parse_list::<PersonScheme>(sources.persons, "persons")? {
            registry.insert_person(scheme);
        }
        for scheme in parse_list::<MonsterScheme>(sources.monsters, "monsters")? {
            registry.insert_monster(scheme);
        }
        for scheme in parse_list::<DropTableScheme>(sources.drops, "drops")? {
            registry.insert_drop_table(scheme);
        }
        let kits: BTreeMap<String, StartingKit> =
            ron::from_str(sources.kits).context("Failed to parse kits RON")?;

        let catalog = Self { registry, kits };
        catalog.check_references()?;
        Ok(catalog)
    }

    /// Every sid a scheme refers to must exist in the catalog.
    fn check_references(&self) -> LoadResult<()> {
        let registry = &self.registry;
        for person in self.persons() {
            ensure!(
                registry.act(&person.default_act).is_some(),
                "person {} uses unknown act {}",
                person.sid,
                person.default_act
            );
            for perk in &person.built_in_perks {
                ensure!(registry.perk(perk).is_some(), "person {} has unknown perk {perk}", person.sid);
            }
        }
        for sid in registry.monster_sids() {
            let monster = registry.require_monster(sid)?;
            for act in &monster.acts {
                ensure!(registry.act(act).is_some(), "monster {sid} uses unknown act {act}");
            }
            for table in &monster.drop_tables {
                ensure!(registry.drop_table(table).is_some(), "monster {sid} drops from unknown table {table}");
            }
        }
        for sid in registry.drop_table_sids() {
            let table = registry.require_drop_table(sid)?;
            for prop in table.records.iter().filter_map(|record| record.prop.as_ref()) {
                ensure!(registry.prop(prop).is_some(), "drop table {sid} lists unknown prop {prop}");
            }
            for record in &table.records {
                ensure!(
                    record.min_count <= record.max_count,
                    "drop table {sid} has a count range {}..{}",
                    record.min_count,
                    record.max_count
                );
            }
        }
        for (name, kit) in &self.kits {
            for sid in kit.equipment.iter().chain(kit.resources.iter().map(|(sid, _)| sid)) {
                ensure!(registry.prop(sid).is_some(), "kit {name} lists unknown prop {sid}");
            }
        }
        Ok(())
    }

    fn persons(&self) -> impl Iterator<Item = &PersonScheme> {
        self.registry.person_sids().filter_map(|sid| self.registry.person(sid))
    }

    pub fn registry(&self) -> &SchemeRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> SchemeRegistry {
        self.registry
    }

    pub fn kit(&self, name: &str) -> Option<&StartingKit> {
        self.kits.get(name)
    }

    pub fn kit_names(&self) -> impl Iterator<Item = &str> {
        self.kits.keys().map(String::as_str)
    }
}

fn parse_list<T: DeserializeOwned>(content: &str, what: &str) -> LoadResult<Vec<T>> {
    ron::from_str(content).with_context(|| format!("Failed to parse {what} RON"))
}
