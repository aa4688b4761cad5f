//! Hex node graph with removable edges.
//!
//! Nodes are created once and addressed by [`NodeId`]. Two nodes can only be
//! joined when they are hex-adjacent; removing an edge models a wall that
//! blocks both movement and line of sight between the two hexes.

use std::collections::{HashMap, HashSet};

use arrayvec::ArrayVec;

use super::coords::{CubeCoords, OffsetCoords};
use crate::config::TacticsConfig;
use crate::ids::NodeId;
use crate::map::MapError;

/// A single hex cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HexNode {
    pub id: NodeId,
    pub coords: OffsetCoords,
    pub cube: CubeCoords,
    pub passable: bool,
}

/// Unordered node pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Edge(NodeId, NodeId);

impl Edge {
    fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

pub type Neighbors = ArrayVec<NodeId, { TacticsConfig::MAX_NEIGHBORS }>;

#[derive(Clone, Debug, Default)]
pub struct HexGraph {
    nodes: Vec<HexNode>,
    index: HashMap<OffsetCoords, NodeId>,
    edges: HashSet<Edge>,
}

impl HexGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filled `size × size` map with every adjacent pair connected.
    pub fn square(size: u32) -> Self {
        let mut graph = Self::new();
        let size = size as i32;
        for y in 0..size {
            for x in 0..size {
                graph.add_node(OffsetCoords::new(x, y));
            }
        }
        graph.connect_adjacent();
        graph
    }

    /// Adds a passable node, or returns the existing one at the same coordinates.
    pub fn add_node(&mut self, coords: OffsetCoords) -> NodeId {
        if let Some(&id) = self.index.get(&coords) {
            return id;
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(HexNode {
            id,
            coords,
            cube: coords.to_cube(),
            passable: true,
        });
        self.index.insert(coords, id);
        id
    }

    /// Joins every pair of hex-adjacent nodes.
    pub fn connect_adjacent(&mut self) {
        let mut pending = Vec::new();
        for node in &self.nodes {
            for cube in node.cube.neighbors() {
                if let Some(&other) = self.index.get(&cube.to_offset()) {
                    pending.push(Edge::new(node.id, other));
                }
            }
        }
        self.edges.extend(pending);
    }

    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), MapError> {
        let (node_a, node_b) = (self.require(a)?, self.require(b)?);
        if node_a.cube.distance_to(node_b.cube) != 1 {
            return Err(MapError::NotAdjacent { a, b });
        }
        self.edges.insert(Edge::new(a, b));
        Ok(())
    }

    /// Removes the edge between two nodes. Returns whether an edge existed.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        self.edges.remove(&Edge::new(a, b))
    }

    /// Removes the edge between the nodes at two offset coordinates.
    pub fn remove_edge_by_coords(&mut self, a: OffsetCoords, b: OffsetCoords) -> bool {
        match (self.node_at(a), self.node_at(b)) {
            (Some(a), Some(b)) => self.remove_edge(a, b),
            _ => false,
        }
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edges.contains(&Edge::new(a, b))
    }

    pub fn node(&self, id: NodeId) -> Option<&HexNode> {
        self.nodes.get(id.index())
    }

    pub fn require(&self, id: NodeId) -> Result<&HexNode, MapError> {
        self.node(id).ok_or(MapError::UnknownNode(id))
    }

    pub fn node_at(&self, coords: OffsetCoords) -> Option<NodeId> {
        self.index.get(&coords).copied()
    }

    pub fn node_at_cube(&self, cube: CubeCoords) -> Option<NodeId> {
        self.node_at(cube.to_offset())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &HexNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_passable(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|node| node.passable)
    }

    pub fn set_passable(&mut self, id: NodeId, passable: bool) -> Result<(), MapError> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(MapError::UnknownNode(id))?;
        node.passable = passable;
        Ok(())
    }

    /// Nodes reachable in one step, in fixed direction order.
    pub fn neighbors(&self, id: NodeId) -> Neighbors {
        let mut result = Neighbors::new();
        let Some(node) = self.node(id) else {
            return result;
        };
        for cube in node.cube.neighbors() {
            if let Some(other) = self.node_at_cube(cube)
                && self.has_edge(id, other)
            {
                result.push(other);
            }
        }
        result
    }

    /// Hex distance between two nodes; `None` if either is unknown.
    pub fn distance(&self, a: NodeId, b: NodeId) -> Option<u32> {
        Some(self.node(a)?.cube.distance_to(self.node(b)?.cube))
    }
}
