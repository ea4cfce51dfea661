use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet};
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use super::state::State;
use crate::model::Waypoint;
use crate::routing::AugmentedGraph;

/// Shortest path found by [`dijkstra_path`]
#[derive(Debug, Clone, PartialEq)]
pub struct TracedPath {
    pub waypoints: Vec<Waypoint>,
    pub cost: f64,
}

/// Single-source Dijkstra from `start` that stops as soon as `target` is settled.
///
/// Returns `None` when the frontier runs dry before reaching `target`.
/// Among equally short frontier entries the smallest waypoint is settled
/// first, so the returned path is stable between runs.
pub fn dijkstra_path(
    graph: &AugmentedGraph,
    start: NodeIndex,
    target: NodeIndex,
) -> Option<TracedPath> {
    let g = &graph.graph;
    let estimated_nodes = g.node_count();
    let mut distances: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut visited: HashSet<NodeIndex> = HashSet::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4 + 1);

    heap.push(State {
        cost: 0.0,
        node: start,
        waypoint: g[start],
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node, .. }) = heap.pop() {
        if !visited.insert(node) {
            continue;
        }
        if node == target {
            let waypoints = trace_back(graph, &predecessors, start, target);
            return Some(TracedPath { waypoints, cost });
        }

        for edge in g.edges(node) {
            let next = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };
            if visited.contains(&next) {
                continue;
            }

            let next_cost = cost + *edge.weight();
            let improved = distances.get(&next).is_none_or(|&best| next_cost < best);
            if improved {
                distances.insert(next, next_cost);
                predecessors.insert(next, node);
                heap.push(State {
                    cost: next_cost,
                    node: next,
                    waypoint: g[next],
                });
            }
        }
    }

    None
}

/// Follows predecessors from `target` back to `start`
fn trace_back(
    graph: &AugmentedGraph,
    predecessors: &HashMap<NodeIndex, NodeIndex>,
    start: NodeIndex,
    target: NodeIndex,
) -> Vec<Waypoint> {
    let mut node_path = vec![target];
    let mut current = target;
    while current != start {
        match predecessors.get(&current) {
            Some(&prev) => {
                node_path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    node_path.reverse();

    node_path.into_iter().map(|idx| graph.graph[idx]).collect()
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;
    use crate::model::{Floorplan, NodeId};
    use crate::routing::augment;

    fn ladder() -> (Floorplan, Vec<NodeId>) {
        // a -- b -- c
        // |         |
        // d ------- e
        let mut plan = Floorplan::new();
        let ids: Vec<NodeId> = [
            (0.0, 0.0),
            (50.0, 0.0),
            (100.0, 0.0),
            (0.0, 10.0),
            (100.0, 10.0),
        ]
        .into_iter()
        .map(|(x, y)| plan.add_node(Point::new(x, y)).id)
        .collect();
        for (s, e) in [(0, 1), (1, 2), (0, 3), (3, 4), (4, 2)] {
            plan.add_segment(ids[s], ids[e]).unwrap();
        }
        (plan, ids)
    }

    #[test]
    fn finds_cheapest_route() {
        let (plan, ids) = ladder();
        let graph = augment(&plan, &[]);
        let start = graph.vertex(Waypoint::Node(ids[0])).unwrap();
        let target = graph.vertex(Waypoint::Node(ids[2])).unwrap();

        let path = dijkstra_path(&graph, start, target).unwrap();
        assert!((path.cost - 100.0).abs() < 1e-9);
        assert_eq!(
            path.waypoints,
            [ids[0], ids[1], ids[2]].map(Waypoint::Node).to_vec()
        );
    }

    #[test]
    fn disconnected_target_is_unreachable() {
        let (mut plan, ids) = ladder();
        let island = plan.add_node(Point::new(500.0, 500.0)).id;
        let graph = augment(&plan, &[]);

        let start = graph.vertex(Waypoint::Node(ids[0])).unwrap();
        let target = graph.vertex(Waypoint::Node(island)).unwrap();
        assert!(dijkstra_path(&graph, start, target).is_none());
    }

    #[test]
    fn equal_cost_routes_prefer_smaller_ids() {
        // Diamond with two routes of identical length
        let mut plan = Floorplan::new();
        let top = plan.add_node(Point::new(0.0, 0.0)).id;
        let left = plan.add_node(Point::new(-10.0, 10.0)).id;
        let right = plan.add_node(Point::new(10.0, 10.0)).id;
        let bottom = plan.add_node(Point::new(0.0, 20.0)).id;
        plan.add_segment(top, right).unwrap();
        plan.add_segment(right, bottom).unwrap();
        plan.add_segment(top, left).unwrap();
        plan.add_segment(left, bottom).unwrap();

        let graph = augment(&plan, &[]);
        let start = graph.vertex(Waypoint::Node(top)).unwrap();
        let target = graph.vertex(Waypoint::Node(bottom)).unwrap();

        for _ in 0..5 {
            let path = dijkstra_path(&graph, start, target).unwrap();
            assert_eq!(
                path.waypoints,
                [top, left, bottom].map(Waypoint::Node).to_vec()
            );
        }
    }
}
