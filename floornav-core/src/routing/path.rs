use serde::Serialize;

use super::augmented::{ExtraEdge, augment};
use super::dijkstra::dijkstra_path;
use crate::Error;
use crate::model::{Floorplan, SpatialIndex, Waypoint};

/// Ordered waypoints of a route and its length
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub waypoints: Vec<Waypoint>,
    pub length_pixels: f64,
    /// `None` when the floorplan has no calibration
    pub length_meters: Option<f64>,
}

impl PathResult {
    pub fn is_calibrated(&self) -> bool {
        self.length_meters.is_some()
    }

    fn trivial(at: Waypoint, floorplan: &Floorplan) -> Self {
        Self::new(vec![at], 0.0, floorplan)
    }

    fn new(waypoints: Vec<Waypoint>, length_pixels: f64, floorplan: &Floorplan) -> Self {
        Self {
            waypoints,
            length_pixels,
            length_meters: floorplan
                .calibration()
                .map(|c| c.pixels_to_meters(length_pixels)),
        }
    }
}

/// Shortest walkable path between two nodes or POIs.
///
/// POI endpoints are linked to their nearest node for the duration of this
/// query only. Among several equally short paths the one settling smaller
/// ids first is returned.
///
/// # Errors
///
/// - [`Error::UnknownElement`] if an endpoint does not exist
/// - [`Error::IsolatedPoint`] if a POI endpoint has no node to attach to
/// - [`Error::Unreachable`] if the endpoints lie in different components
pub fn find_path(floorplan: &Floorplan, start: Waypoint, end: Waypoint) -> Result<PathResult, Error> {
    for waypoint in [start, end] {
        if !floorplan.contains_waypoint(waypoint) {
            return Err(match waypoint {
                Waypoint::Node(id) => Error::unknown("node", id),
                Waypoint::Poi(id) => Error::unknown("poi", id),
            });
        }
    }

    if start == end {
        return Ok(PathResult::trivial(start, floorplan));
    }

    let spatial = floorplan.spatial_index();
    let mut extra_edges = Vec::with_capacity(2);
    for waypoint in [start, end] {
        if let Some(edge) = attach_poi(floorplan, &spatial, waypoint)? {
            extra_edges.push(edge);
        }
    }

    let graph = augment(floorplan, &extra_edges);
    let unreachable = || Error::Unreachable {
        from: start,
        to: end,
    };
    let (Some(from), Some(to)) = (graph.vertex(start), graph.vertex(end)) else {
        return Err(unreachable());
    };

    let traced = dijkstra_path(&graph, from, to).ok_or_else(unreachable)?;
    log::debug!(
        "Path {start} -> {end}: {} waypoints, {:.1} px",
        traced.waypoints.len(),
        traced.cost
    );

    Ok(PathResult::new(traced.waypoints, traced.cost, floorplan))
}

/// Temporary link from a POI endpoint to its nearest node
fn attach_poi(
    floorplan: &Floorplan,
    spatial: &SpatialIndex,
    waypoint: Waypoint,
) -> Result<Option<ExtraEdge>, Error> {
    let Waypoint::Poi(id) = waypoint else {
        return Ok(None);
    };
    let position = floorplan
        .poi(id)
        .map(|p| p.position)
        .ok_or_else(|| Error::unknown("poi", id))?;

    let (node, distance) = spatial
        .nearest(position)
        .ok_or(Error::IsolatedPoint(waypoint))?;
    log::trace!("Attaching {waypoint} to {node} ({distance:.1} px)");

    Ok(Some(ExtraEdge {
        from: waypoint,
        to: Waypoint::Node(node),
        weight: distance,
    }))
}
