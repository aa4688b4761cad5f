//! A* pathfinding over the sector graph.
//!
//! Every step costs 1; the heuristic is the hex distance, which never
//! overestimates on a hex grid, so returned paths are shortest.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use bitflags::bitflags;

use super::SectorMap;
use crate::ids::{ActorId, NodeId};

bitflags! {
    /// Relaxations applied while expanding nodes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PathFlags: u8 {
        /// The finish node may be occupied by another actor (pursuit).
        const ALLOW_OCCUPIED_TARGET = 1 << 0;
    }
}

/// Who is walking and which relaxations apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathFindingContext {
    pub actor: Option<ActorId>,
    pub flags: PathFlags,
}

impl PathFindingContext {
    pub const fn for_actor(actor: ActorId) -> Self {
        Self {
            actor: Some(actor),
            flags: PathFlags::empty(),
        }
    }

    pub const fn with_flags(mut self, flags: PathFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Node in the A* open set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PathNode {
    node: NodeId,
    f_cost: u32,
    h_cost: u32,
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; ties prefer closer-to-goal, then lower id.
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a path from `start` to `finish`.
///
/// The result excludes `start` and includes `finish`. It is empty when
/// `start == finish` or when no path exists.
pub fn find_path(
    map: &SectorMap,
    start: NodeId,
    finish: NodeId,
    context: &PathFindingContext,
) -> Vec<NodeId> {
    let graph = map.graph();
    if start == finish || graph.node(start).is_none() || graph.node(finish).is_none() {
        return Vec::new();
    }

    let heuristic = |node: NodeId| graph.distance(node, finish).unwrap_or(u32::MAX);

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();
    let mut g_scores: HashMap<NodeId, u32> = HashMap::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        node: start,
        f_cost: heuristic(start),
        h_cost: heuristic(start),
    });

    while let Some(current) = open_set.pop() {
        if current.node == finish {
            return reconstruct_path(&came_from, start, finish);
        }

        let current_g = g_scores.get(&current.node).copied().unwrap_or(u32::MAX);
        if current.f_cost > current_g.saturating_add(current.h_cost) {
            // Stale heap entry.
            continue;
        }

        for neighbor in graph.neighbors(current.node) {
            if !is_walkable(map, neighbor, finish, context) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);
            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.node);
                g_scores.insert(neighbor, tentative_g);

                let h_cost = heuristic(neighbor);
                open_set.push(PathNode {
                    node: neighbor,
                    f_cost: tentative_g + h_cost,
                    h_cost,
                });
            }
        }
    }

    Vec::new()
}

fn is_walkable(map: &SectorMap, node: NodeId, finish: NodeId, context: &PathFindingContext) -> bool {
    if !map.is_passable(node) {
        return false;
    }
    if node == finish && context.flags.contains(PathFlags::ALLOW_OCCUPIED_TARGET) {
        return true;
    }
    match (map.occupant(node), context.actor) {
        (None, _) => true,
        (Some(holder), Some(actor)) => holder == actor,
        (Some(_), None) => false,
    }
}

/// Walks `came_from` back from `finish`, dropping `start`.
fn reconstruct_path(came_from: &HashMap<NodeId, NodeId>, start: NodeId, finish: NodeId) -> Vec<NodeId> {
    let mut path = vec![finish];
    let mut current = finish;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
