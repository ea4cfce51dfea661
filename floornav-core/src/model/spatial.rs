use geo::Point;
use rstar::{RTree, primitives::GeomWithData};

use super::NodeId;

/// R-tree over node positions for nearest-node lookups
pub struct SpatialIndex {
    tree: RTree<GeomWithData<[f64; 2], NodeId>>,
}

impl SpatialIndex {
    pub fn build<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, Point<f64>)>,
    {
        let points: Vec<GeomWithData<[f64; 2], NodeId>> = nodes
            .into_iter()
            .map(|(id, p)| GeomWithData::new([p.x(), p.y()], id))
            .collect();

        Self {
            tree: RTree::bulk_load(points),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest node and its distance; equidistant candidates resolve to the smallest id
    pub fn nearest(&self, point: Point<f64>) -> Option<(NodeId, f64)> {
        let query = [point.x(), point.y()];
        let mut candidates = self.tree.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best_d2) = candidates.next()?;

        let mut best = first.data;
        for (candidate, d2) in candidates {
            if d2 > best_d2 {
                break;
            }
            best = best.min(candidate.data);
        }

        Some((best, best_d2.sqrt()))
    }

    /// Nodes within `radius` of `point`, closest first
    pub fn within(&self, point: Point<f64>, radius: f64) -> Vec<(NodeId, f64)> {
        let mut hits: Vec<(NodeId, f64)> = self
            .tree
            .locate_within_distance([point.x(), point.y()], radius * radius)
            .map(|hit| {
                let [x, y] = *hit.geom();
                (hit.data, (x - point.x()).hypot(y - point.y()))
            })
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits
    }
}
