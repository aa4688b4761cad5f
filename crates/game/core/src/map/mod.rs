//! Sector map: hex graph plus node occupancy.
//!
//! The map is the single authority on which actor stands on which node.
//! At most one actor holds a node at a time; map-blocking static objects
//! (closed chests, rubble) make a node unavailable to everyone.

mod error;
mod pathfinding;

use std::collections::{HashMap, HashSet};

pub use error::MapError;
pub use pathfinding::{PathFindingContext, PathFlags, find_path};

use crate::ids::{ActorId, NodeId};
use crate::spatial::{HexGraph, target_is_on_line};

#[derive(Clone, Debug, Default)]
pub struct SectorMap {
    graph: HexGraph,
    occupancy: HashMap<NodeId, ActorId>,
    static_blocks: HashSet<NodeId>,
}

impl SectorMap {
    pub fn new(graph: HexGraph) -> Self {
        Self {
            graph,
            occupancy: HashMap::new(),
            static_blocks: HashSet::new(),
        }
    }

    pub fn graph(&self) -> &HexGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut HexGraph {
        &mut self.graph
    }

    /// Terrain passability, ignoring actors.
    pub fn is_passable(&self, node: NodeId) -> bool {
        self.graph.is_passable(node) && !self.static_blocks.contains(&node)
    }

    /// True if `actor` may stand on `node`: passable and free or already its own.
    pub fn is_position_available_for(&self, node: NodeId, actor: ActorId) -> bool {
        if !self.is_passable(node) {
            return false;
        }
        match self.occupancy.get(&node) {
            None => true,
            Some(holder) => *holder == actor,
        }
    }

    pub fn occupant(&self, node: NodeId) -> Option<ActorId> {
        self.occupancy.get(&node).copied()
    }

    pub fn hold_node(&mut self, node: NodeId, actor: ActorId) -> Result<(), MapError> {
        self.graph.require(node)?;
        if let Some(&holder) = self.occupancy.get(&node) {
            return Err(MapError::NodeAlreadyHeld { node, holder });
        }
        self.occupancy.insert(node, actor);
        Ok(())
    }

    pub fn release_node(&mut self, node: NodeId, actor: ActorId) -> Result<(), MapError> {
        match self.occupancy.get(&node) {
            Some(&holder) if holder == actor => {
                self.occupancy.remove(&node);
                Ok(())
            }
            _ => Err(MapError::NodeNotHeld { node, actor }),
        }
    }

    pub fn add_static_block(&mut self, node: NodeId) -> Result<(), MapError> {
        self.graph.require(node)?;
        self.static_blocks.insert(node);
        Ok(())
    }

    pub fn remove_static_block(&mut self, node: NodeId) -> bool {
        self.static_blocks.remove(&node)
    }

    /// Hex distance; unknown nodes are treated as infinitely far.
    pub fn distance_between(&self, a: NodeId, b: NodeId) -> u32 {
        self.graph.distance(a, b).unwrap_or(u32::MAX)
    }

    pub fn target_is_on_line(&self, a: NodeId, b: NodeId) -> bool {
        target_is_on_line(&self.graph, a, b)
    }

    pub fn find_path(&self, start: NodeId, finish: NodeId, context: &PathFindingContext) -> Vec<NodeId> {
        find_path(self, start, finish, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::OffsetCoords;

    fn map_with_node() -> (SectorMap, NodeId) {
        let map = SectorMap::new(HexGraph::square(2));
        let node = map.graph().node_at(OffsetCoords::new(0, 0)).unwrap();
        (map, node)
    }

    #[test]
    fn hold_makes_node_unavailable_to_others_only() {
        let (mut map, node) = map_with_node();
        let (owner, other) = (ActorId(1), ActorId(2));

        map.hold_node(node, owner).unwrap();

        assert!(map.is_position_available_for(node, owner));
        assert!(!map.is_position_available_for(node, other));
    }

    #[test]
    fn release_restores_availability() {
        let (mut map, node) = map_with_node();
        let (owner, other) = (ActorId(1), ActorId(2));

        map.hold_node(node, owner).unwrap();
        map.release_node(node, owner).unwrap();

        assert!(map.is_position_available_for(node, other));
        assert_eq!(map.occupant(node), None);
    }

    #[test]
    fn double_hold_is_rejected() {
        let (mut map, node) = map_with_node();
        map.hold_node(node, ActorId(1)).unwrap();

        let err = map.hold_node(node, ActorId(2)).unwrap_err();
        assert_eq!(
            err,
            MapError::NodeAlreadyHeld {
                node,
                holder: ActorId(1)
            }
        );
    }

    #[test]
    fn release_by_non_holder_is_rejected() {
        let (mut map, node) = map_with_node();
        map.hold_node(node, ActorId(1)).unwrap();

        assert!(map.release_node(node, ActorId(2)).is_err());
        assert!(map.release_node(map.graph().node_at(OffsetCoords::new(1, 1)).unwrap(), ActorId(1)).is_err());
        assert_eq!(map.occupant(node), Some(ActorId(1)));
    }

    #[test]
    fn static_block_makes_node_unavailable() {
        let (mut map, node) = map_with_node();
        map.add_static_block(node).unwrap();
        assert!(!map.is_position_available_for(node, ActorId(1)));

        assert!(map.remove_static_block(node));
        assert!(map.is_position_available_for(node, ActorId(1)));
    }
}
