use super::graph::HexGraph;
use crate::ids::NodeId;

/// Returns true when nothing blocks the straight line between two nodes.
///
/// The line is sampled hex by hex. Each step must follow an existing edge and
/// every node strictly between the endpoints must be passable. The walk always
/// starts from the endpoint with the smaller offset coordinates, so the result
/// does not depend on argument order.
pub fn target_is_on_line(graph: &HexGraph, from: NodeId, to: NodeId) -> bool {
    let (Some(a), Some(b)) = (graph.node(from), graph.node(to)) else {
        return false;
    };
    if from == to {
        return true;
    }

    let (start, finish) = if a.coords <= b.coords { (a, b) } else { (b, a) };
    let line = start.cube.line_to(finish.cube);

    let mut previous = start.id;
    for (step, cube) in line.iter().enumerate().skip(1) {
        let Some(current) = graph.node_at_cube(*cube) else {
            return false;
        };
        if !graph.has_edge(previous, current) {
            return false;
        }
        let is_endpoint = step == line.len() - 1;
        if !is_endpoint && !graph.is_passable(current) {
            return false;
        }
        previous = current;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::OffsetCoords;

    fn node(graph: &HexGraph, x: i32, y: i32) -> NodeId {
        graph.node_at(OffsetCoords::new(x, y)).unwrap()
    }

    #[test]
    fn open_field_is_visible() {
        let graph = HexGraph::square(8);
        assert!(target_is_on_line(&graph, node(&graph, 0, 0), node(&graph, 6, 5)));
    }

    #[test]
    fn impassable_node_blocks_line() {
        let mut graph = HexGraph::square(5);
        let blocker = node(&graph, 2, 0);
        graph.set_passable(blocker, false).unwrap();

        assert!(!target_is_on_line(&graph, node(&graph, 0, 0), node(&graph, 4, 0)));
        assert!(!target_is_on_line(&graph, node(&graph, 4, 0), node(&graph, 0, 0)));
    }

    #[test]
    fn wall_blocks_line_between_neighbors() {
        let mut graph = HexGraph::square(3);
        let (a, b) = (node(&graph, 0, 0), node(&graph, 1, 0));
        assert!(target_is_on_line(&graph, a, b));

        graph.remove_edge(a, b);
        assert!(!target_is_on_line(&graph, a, b));
        assert!(!target_is_on_line(&graph, b, a));
    }

    #[test]
    fn hole_in_map_blocks_line() {
        let mut graph = HexGraph::new();
        let a = graph.add_node(OffsetCoords::new(0, 0));
        graph.add_node(OffsetCoords::new(2, 0));
        let c = graph.add_node(OffsetCoords::new(3, 0));
        graph.connect_adjacent();

        assert!(!target_is_on_line(&graph, a, c));
    }

    #[test]
    fn same_node_is_visible() {
        let graph = HexGraph::square(2);
        let a = node(&graph, 1, 1);
        assert!(target_is_on_line(&graph, a, a));
    }
}
