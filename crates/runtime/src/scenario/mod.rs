//! Scenario system for sector setup.
//!
//! A scenario decides how large the map is, who stands where and what lies
//! around. Placement is seeded, so the same scenario and seed always build
//! the same sector:
//! - a start region in the top-left corner holding the human player,
//! - an out region in the bottom-right corner with a single exit node,
//! - the wilds in between with monsters, one patrol route and supply caches.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tactics_content::{FactoryError, PersonFactory, SchemeCatalog};
use tactics_core::{
    ActorId, ArchetypeStrategyFactory, DiceRandomSource, DropResolver, HexGraph, MapError, MapRegion, NodeId,
    OffsetCoords, Player, Prop, RegionId, Resource, SchemeOracle, Sector, SectorMap, TacticsConfig,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;

pub const START_REGION: RegionId = RegionId(0);
pub const EXIT_REGION: RegionId = RegionId(1);
pub const WILDS_REGION: RegionId = RegionId(2);

/// Side length of the start and exit corners.
const CORNER: i32 = 3;
/// Monsters never spawn closer than this to the player.
const SPAWN_CLEARANCE: u32 = 3;
/// Drop table rolled for each cache.
const SUPPLY_TABLE: &str = "supply-cache";
/// Picked from when the catalog ships no supply table.
const SUPPLIES: [&str; 3] = ["food-pack", "water-bottle", "med-kit"];

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("map size {size} is below the minimum of {min}")]
    MapTooSmall { size: u32, min: u32 },

    #[error("starting kit {0} not found")]
    UnknownKit(String),

    #[error("catalog has no monsters to place")]
    NoMonsters,

    #[error("no free node left for {0}")]
    NoFreeNode(&'static str),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Factory(#[from] FactoryError),
}

/// A built sector and the actor the session scores.
#[derive(Debug)]
pub struct ScenarioSetup {
    pub sector: Sector,
    pub player: ActorId,
}

/// Sector setup parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub map_size: u32,
    pub person: String,
    pub kit: String,
    pub monster_count: usize,
    pub seed: u64,
}

impl Scenario {
    pub const MIN_MAP_SIZE: u32 = 6;
    pub const HUMAN_PERSON: &'static str = "human-person";

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            map_size: config.map_size,
            person: Self::HUMAN_PERSON.to_owned(),
            kit: config.kit.clone(),
            monster_count: config.monster_count,
            seed: config.seed,
        }
    }

    pub fn build(&self, catalog: &SchemeCatalog, tactics: &TacticsConfig) -> Result<ScenarioSetup, ScenarioError> {
        if self.map_size < Self::MIN_MAP_SIZE {
            return Err(ScenarioError::MapTooSmall {
                size: self.map_size,
                min: Self::MIN_MAP_SIZE,
            });
        }
        let kit = catalog
            .kit(&self.kit)
            .ok_or_else(|| ScenarioError::UnknownKit(self.kit.clone()))?;
        let schemes = catalog.registry();
        let factory = PersonFactory::new(schemes, tactics);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut sector = Sector::new(SectorMap::new(HexGraph::square(self.map_size)), tactics.clone());
        let wilds = self.add_regions(&mut sector);

        let start = sector.start_nodes().next().ok_or(ScenarioError::NoFreeNode("the player"))?;
        let person = factory.create_equipped_human(&self.person, kit)?;
        let player = sector.add_actor(Player::Human, person, start, None)?;
        let mut taken: HashSet<NodeId> = HashSet::from([start]);

        // Caches go down first so blocking crates never land on a patrol route.
        for _ in 0..(self.map_size / 4).max(1) {
            let Some(node) = free_node(&sector, &wilds, &taken, start, &mut rng) else {
                break;
            };
            taken.insert(node);
            let props = supply_cache(schemes, &mut rng);
            sector.add_container(node, props, rng.gen_bool(0.5))?;
        }

        let monsters: Vec<&str> = schemes.monster_sids().collect();
        if self.monster_count > 0 && monsters.is_empty() {
            return Err(ScenarioError::NoMonsters);
        }
        for index in 0..self.monster_count {
            let sid = monsters[rng.gen_range(0..monsters.len())];
            let node = free_node(&sector, &wilds, &taken, start, &mut rng).ok_or(ScenarioError::NoFreeNode("a monster"))?;
            taken.insert(node);

            let archetype = if index % 3 == 2 {
                ArchetypeStrategyFactory::SENTRY.to_owned()
            } else {
                sid.to_owned()
            };
            let id = sector.add_actor(Player::Bot, factory.create_monster(sid)?, node, Some(archetype))?;
            if index == 1 {
                let open: Vec<NodeId> = wilds.iter().copied().filter(|&n| sector.map.is_passable(n)).collect();
                let mut route = vec![node];
                route.extend(open.choose_multiple(&mut rng, 2).copied());
                sector.patrol_routes.insert(id, route);
            }
            debug!(actor = %id, sid, %node, "monster placed");
        }

        info!(
            size = self.map_size,
            seed = self.seed,
            actors = sector.actors.len(),
            containers = sector.containers.len(),
            "scenario built"
        );
        Ok(ScenarioSetup { sector, player })
    }

    /// Adds the three regions and returns the wild nodes.
    fn add_regions(&self, sector: &mut Sector) -> Vec<NodeId> {
        let far = self.map_size as i32 - CORNER;
        let (mut start, mut exit, mut wilds) = (Vec::new(), Vec::new(), Vec::new());
        for node in sector.map.graph().nodes() {
            let OffsetCoords { x, y } = node.coords;
            if x < CORNER && y < CORNER {
                start.push(node.id);
            } else if x >= far && y >= far {
                exit.push(node.id);
            } else {
                wilds.push(node.id);
            }
        }

        let last = self.map_size as i32 - 1;
        let exit_nodes = sector.map.graph().node_at(OffsetCoords::new(last, last)).into_iter().collect();
        sector.add_region(MapRegion {
            id: START_REGION,
            nodes: start,
            is_start: true,
            ..MapRegion::default()
        });
        sector.add_region(MapRegion {
            id: EXIT_REGION,
            nodes: exit,
            is_out: true,
            exit_nodes,
            ..MapRegion::default()
        });
        sector.add_region(MapRegion {
            id: WILDS_REGION,
            nodes: wilds.clone(),
            ..MapRegion::default()
        });
        wilds
    }
}

fn free_node(sector: &Sector, wilds: &[NodeId], taken: &HashSet<NodeId>, start: NodeId, rng: &mut StdRng) -> Option<NodeId> {
    let candidates: Vec<NodeId> = wilds
        .iter()
        .copied()
        .filter(|&node| {
            !taken.contains(&node)
                && sector.map.is_passable(node)
                && sector.map.occupant(node).is_none()
                && sector.map.distance_between(start, node) >= SPAWN_CLEARANCE
        })
        .collect();
    candidates.choose(rng).copied()
}

fn supply_cache(schemes: &dyn SchemeOracle, rng: &mut StdRng) -> Vec<Prop> {
    if schemes.drop_table(SUPPLY_TABLE).is_some() {
        let mut dice = DiceRandomSource::seeded(rng.r#gen());
        let props = DropResolver::new(schemes).resolve(&[SUPPLY_TABLE.to_owned()], &mut dice);
        if !props.is_empty() {
            return props;
        }
    }
    SUPPLIES
        .choose_multiple(rng, 2)
        .filter_map(|&sid| match schemes.require_prop(sid) {
            Ok(scheme) => Some(Prop::Resource(Resource::from_scheme(scheme, rng.gen_range(1..=2)))),
            Err(err) => {
                warn!(prop = sid, %err, "supply skipped");
                None
            }
        })
        .collect()
}
