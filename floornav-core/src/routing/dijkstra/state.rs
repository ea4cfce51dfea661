use std::cmp::Ordering;

use petgraph::graph::NodeIndex;

use crate::model::Waypoint;

/// Heap entry of the search frontier
#[derive(Copy, Clone, Debug)]
pub(super) struct State {
    pub(super) cost: f64,
    pub(super) node: NodeIndex,
    pub(super) waypoint: Waypoint,
}

// Min-heap by cost, equal costs pop the smallest waypoint first
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.waypoint.cmp(&self.waypoint))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

#[cfg(test)]
mod tests {
    use std::collections::BinaryHeap;

    use super::*;
    use crate::model::{NodeId, PoiId};

    #[test]
    fn heap_pops_cheapest_then_smallest_waypoint() {
        let mut heap = BinaryHeap::new();
        for (cost, waypoint) in [
            (5.0, Waypoint::Node(NodeId(1))),
            (2.0, Waypoint::Poi(PoiId(4))),
            (2.0, Waypoint::Node(NodeId(9))),
            (2.0, Waypoint::Node(NodeId(3))),
        ] {
            heap.push(State {
                cost,
                node: NodeIndex::new(0),
                waypoint,
            });
        }

        let order: Vec<Waypoint> = std::iter::from_fn(|| heap.pop().map(|s| s.waypoint)).collect();
        assert_eq!(
            order,
            vec![
                Waypoint::Node(NodeId(3)),
                Waypoint::Node(NodeId(9)),
                Waypoint::Poi(PoiId(4)),
                Waypoint::Node(NodeId(1)),
            ]
        );
    }
}
