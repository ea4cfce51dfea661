use hashbrown::HashMap;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::geometry;
use crate::model::{Floorplan, Waypoint};

/// Temporary edge that exists for a single query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtraEdge {
    pub from: Waypoint,
    pub to: Waypoint,
    pub weight: f64,
}

/// Floorplan graph plus query-scoped edges.
///
/// Every node and POI is a vertex; every segment is an edge weighted by its
/// pixel length. POIs only get edges through [`ExtraEdge`]s.
#[derive(Debug, Clone)]
pub struct AugmentedGraph {
    pub graph: UnGraph<Waypoint, f64>,
    index: HashMap<Waypoint, NodeIndex>,
}

impl AugmentedGraph {
    pub fn vertex(&self, waypoint: Waypoint) -> Option<NodeIndex> {
        self.index.get(&waypoint).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Builds a transient routing graph; the floorplan itself is never touched.
///
/// Extra edges referring to waypoints absent from the floorplan are skipped.
pub fn augment(floorplan: &Floorplan, extra_edges: &[ExtraEdge]) -> AugmentedGraph {
    let vertex_count = floorplan.node_count() + floorplan.pois().count();
    let mut graph = UnGraph::with_capacity(
        vertex_count,
        floorplan.segment_count() + extra_edges.len(),
    );
    let mut index = HashMap::with_capacity(vertex_count);

    let waypoints = floorplan
        .nodes()
        .map(|n| Waypoint::Node(n.id))
        .chain(floorplan.pois().map(|p| Waypoint::Poi(p.id)));
    for waypoint in waypoints {
        index.insert(waypoint, graph.add_node(waypoint));
    }

    for segment in floorplan.segments() {
        let endpoints = (
            index.get(&Waypoint::Node(segment.start)),
            index.get(&Waypoint::Node(segment.end)),
        );
        if let (Some(&a), Some(&b)) = endpoints {
            let weight = floorplan
                .segment_endpoints(segment)
                .map_or(segment.length, |(pa, pb)| geometry::distance(pa, pb));
            graph.add_edge(a, b, weight);
        }
    }

    for edge in extra_edges {
        match (index.get(&edge.from), index.get(&edge.to)) {
            (Some(&a), Some(&b)) => {
                graph.add_edge(a, b, edge.weight);
            }
            _ => log::warn!(
                "Skipping temporary edge {} - {}: unknown waypoint",
                edge.from,
                edge.to
            ),
        }
    }

    AugmentedGraph { graph, index }
}
