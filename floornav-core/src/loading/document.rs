use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::calibration::{Calibration, Georeference};
use crate::geometry::distance;
use crate::model::{Floorplan, Node, Poi, Segment, Zone};

/// Serialized form of a [`Floorplan`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorplanDocument {
    /// Id counter; raised on load if any element carries a larger id
    pub next_id: u64,
    pub nodes: Vec<Node>,
    pub segments: Vec<Segment>,
    pub pois: Vec<Poi>,
    pub zones: Vec<Zone>,
    pub calibration: Option<Calibration>,
    pub georeference: Option<Georeference>,
    /// Background image reference, opaque to the engine
    pub image: Option<String>,
}

impl Floorplan {
    /// Builds a floorplan from a document.
    ///
    /// Segments with a missing endpoint or identical endpoints, zones with
    /// fewer than three points and invalid calibrations are dropped with a
    /// warning. Segment lengths are always recomputed from node positions.
    pub fn from_document(document: FloorplanDocument) -> Self {
        let mut plan = Floorplan::new();
        let mut max_id = document.next_id;

        for node in document.nodes {
            let id = node.id;
            max_id = max_id.max(id.0);
            if plan.nodes.insert(id, node).is_some() {
                warn!("Duplicate {id} in document, keeping the last one");
            }
        }

        let mut dropped_segments = 0;
        for mut segment in document.segments {
            max_id = max_id.max(segment.id.0);
            let endpoints = plan
                .node(segment.start)
                .zip(plan.node(segment.end))
                .map(|(a, b)| (a.position, b.position));
            match endpoints {
                Some(_) if segment.start == segment.end => {
                    warn!("Dropping {}: connects {} to itself", segment.id, segment.start);
                    dropped_segments += 1;
                }
                Some((a, b)) => {
                    segment.length = distance(a, b);
                    plan.segments.insert(segment.id, segment);
                }
                None => {
                    warn!(
                        "Dropping {}: endpoint {} or {} does not exist",
                        segment.id, segment.start, segment.end
                    );
                    dropped_segments += 1;
                }
            }
        }

        for poi in document.pois {
            max_id = max_id.max(poi.id.0);
            plan.pois.insert(poi.id, poi);
        }

        for zone in document.zones {
            max_id = max_id.max(zone.id.0);
            if zone.points.len() < 3 {
                warn!("Dropping {}: only {} points", zone.id, zone.points.len());
                continue;
            }
            plan.zones.insert(zone.id, zone);
        }

        plan.calibration = document.calibration.and_then(|stored| {
            Calibration::from_points(stored.point_a, stored.point_b, stored.real_meters)
                .inspect_err(|e| warn!("Ignoring stored calibration: {e}"))
                .ok()
        });
        plan.georeference = document.georeference.and_then(|stored| {
            Georeference::new(stored.anchor_pixel, stored.anchor, stored.bearing_degrees)
                .inspect_err(|e| warn!("Ignoring stored georeference: {e}"))
                .ok()
        });
        plan.image = document.image;
        plan.reserve_ids_through(max_id);

        info!(
            "Loaded floorplan: {} nodes, {} segments ({} dropped), {} POIs, {} zones",
            plan.node_count(),
            plan.segment_count(),
            dropped_segments,
            plan.pois.len(),
            plan.zones.len()
        );
        plan
    }

    pub fn to_document(&self) -> FloorplanDocument {
        FloorplanDocument {
            next_id: self.last_id(),
            nodes: self.nodes().cloned().collect(),
            segments: self.segments().cloned().collect(),
            pois: self.pois().cloned().collect(),
            zones: self.zones().cloned().collect(),
            calibration: self.calibration.clone(),
            georeference: self.georeference.clone(),
            image: self.image.clone(),
        }
    }
}
