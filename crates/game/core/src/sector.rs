//! A sector: the map, everything placed on it, and its regions.

use std::collections::BTreeMap;

use tracing::debug;

use crate::actor::{Actor, ActorManager};
use crate::config::TacticsConfig;
use crate::container::ContainerManager;
use crate::ids::{ActorId, ContainerId, NodeId, Player, RegionId};
use crate::inventory::Prop;
use crate::map::{MapError, SectorMap};
use crate::person::Person;

/// A named part of the map. Start regions spawn the party; out regions let
/// it leave through their exit nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapRegion {
    pub id: RegionId,
    pub nodes: Vec<NodeId>,
    pub is_start: bool,
    pub is_out: bool,
    pub exit_nodes: Vec<NodeId>,
}

impl MapRegion {
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }
}

#[derive(Debug)]
pub struct Sector {
    pub map: SectorMap,
    pub actors: ActorManager,
    pub containers: ContainerManager,
    pub regions: Vec<MapRegion>,
    /// Ordered patrol points for bots with a fixed route.
    pub patrol_routes: BTreeMap<ActorId, Vec<NodeId>>,
    pub config: TacticsConfig,
    pub turn: u64,
}

impl Sector {
    pub fn new(map: SectorMap, config: TacticsConfig) -> Self {
        Self {
            map,
            actors: ActorManager::new(),
            containers: ContainerManager::new(),
            regions: Vec::new(),
            patrol_routes: BTreeMap::new(),
            config,
            turn: 0,
        }
    }

    /// Places a new actor and holds its node.
    pub fn add_actor(
        &mut self,
        player: Player,
        person: Person,
        node: NodeId,
        archetype: Option<String>,
    ) -> Result<ActorId, MapError> {
        self.map.graph().require(node)?;
        if !self.map.is_passable(node) {
            return Err(MapError::Impassable(node));
        }
        if let Some(holder) = self.map.occupant(node) {
            return Err(MapError::NodeAlreadyHeld { node, holder });
        }
        let id = self.actors.spawn(player, person, node, archetype);
        self.map.hold_node(node, id)?;
        Ok(id)
    }

    /// Removes an actor and frees its node.
    pub fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.actors.remove(id)?;
        // The node may already be free if occupancy was edited directly.
        if let Err(err) = self.map.release_node(actor.node, id) {
            debug!(actor = %id, %err, "removed actor did not hold its node");
        }
        self.patrol_routes.remove(&id);
        Some(actor)
    }

    /// Moves an actor one step, keeping occupancy and the actor's node in sync.
    pub fn move_actor(&mut self, id: ActorId, to: NodeId) -> Result<NodeId, MapError> {
        let from = self
            .actors
            .get(id)
            .map(|actor| actor.node)
            .ok_or(MapError::ActorNotFound(id))?;
        if from == to {
            return Ok(from);
        }
        if !self.map.is_position_available_for(to, id) {
            return match self.map.occupant(to) {
                Some(holder) => Err(MapError::NodeAlreadyHeld { node: to, holder }),
                None => Err(MapError::Impassable(to)),
            };
        }
        self.map.release_node(from, id)?;
        self.map.hold_node(to, id)?;
        if let Some(actor) = self.actors.get_mut(id) {
            actor.node = to;
        }
        Ok(from)
    }

    pub fn add_container(&mut self, node: NodeId, props: Vec<Prop>, is_map_block: bool) -> Result<ContainerId, MapError> {
        self.map.graph().require(node)?;
        if is_map_block {
            self.map.add_static_block(node)?;
        }
        Ok(self.containers.add(node, props, is_map_block))
    }

    pub fn add_region(&mut self, region: MapRegion) {
        self.regions.push(region);
    }

    pub fn region(&self, id: RegionId) -> Option<&MapRegion> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn region_of(&self, node: NodeId) -> Option<&MapRegion> {
        self.regions.iter().find(|r| r.contains(node))
    }

    /// The out region whose exit nodes include `node`.
    pub fn exit_at(&self, node: NodeId) -> Option<RegionId> {
        self.regions
            .iter()
            .find(|r| r.is_out && r.exit_nodes.contains(&node))
            .map(|r| r.id)
    }

    pub fn start_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.regions
            .iter()
            .filter(|r| r.is_start)
            .flat_map(|r| r.nodes.iter().copied())
    }

    /// Nodes a roaming actor may choose from: its region, or the whole map.
    pub fn roaming_nodes(&self, actor: ActorId) -> Vec<NodeId> {
        let Some(node) = self.actors.get(actor).map(|a| a.node) else {
            return Vec::new();
        };
        let candidates: Vec<NodeId> = match self.region_of(node) {
            Some(region) => region.nodes.clone(),
            None => self.map.graph().nodes().map(|n| n.id).collect(),
        };
        candidates
            .into_iter()
            .filter(|&n| n != node && self.map.is_position_available_for(n, actor))
            .collect()
    }
}
