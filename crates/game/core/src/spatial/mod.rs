//! Hex spatial model: coordinates, node graph, and line of sight.

mod coords;
mod graph;
mod line;

pub use coords::{CubeCoords, OffsetCoords};
pub use graph::{HexGraph, HexNode, Neighbors};
pub use line::target_is_on_line;
