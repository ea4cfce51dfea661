//! Detection of pathways that cross without a shared node.
//!
//! Two segments drawn across each other look connected on screen but are not
//! joined in the graph, so routing silently ignores the junction. The scan
//! reports every such crossing as a candidate location for a missing node.
//! It is advisory only and never edits the graph.

use geo::{Line, Point};
use itertools::Itertools;
use serde::Serialize;

use crate::geometry::{is_near_existing_node, segment_intersection};
use crate::model::{Floorplan, SegmentId};

/// Point where two unconnected segments cross
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crossing {
    pub point: Point<f64>,
    /// Crossing pair, lower id first
    pub segments: (SegmentId, SegmentId),
}

/// Exhaustive pairwise scan over all segments, O(S^2).
///
/// Pairs sharing an endpoint are skipped, as are crossings within
/// `node_proximity_px` of any existing node. Results come out ordered by
/// segment id pair.
pub fn find_crossings(floorplan: &Floorplan, node_proximity_px: f64) -> Vec<Crossing> {
    let lines: Vec<_> = floorplan
        .segments()
        .filter_map(|segment| {
            let (a, b) = floorplan.segment_endpoints(segment)?;
            Some((segment, Line::new(a.0, b.0)))
        })
        .collect();

    let node_positions: Vec<Point<f64>> = floorplan.nodes().map(|n| n.position).collect();

    let crossings: Vec<Crossing> = lines
        .iter()
        .tuple_combinations()
        .filter(|((a, _), (b, _))| !a.shares_endpoint(b))
        .filter_map(|((a, line_a), (b, line_b))| {
            let point = segment_intersection(*line_a, *line_b)?;
            if is_near_existing_node(point, node_positions.iter().copied(), node_proximity_px) {
                return None;
            }
            Some(Crossing {
                point,
                segments: (a.id.min(b.id), a.id.max(b.id)),
            })
        })
        .collect();

    log::trace!(
        "Crossing scan over {} segments found {} crossings",
        lines.len(),
        crossings.len()
    );
    crossings
}
