//! The mutable graph of a single floorplan

use std::collections::BTreeMap;

use geo::{Contains, Point};

use super::components::{Node, NodeId, Poi, PoiId, Segment, SegmentId, Waypoint, Zone, ZoneId};
use super::spatial::SpatialIndex;
use crate::calibration::{Calibration, Georeference, LatLng};
use crate::{Error, geometry};

/// Nodes, segments, POIs and zones of one floorplan plus its calibration.
///
/// Every mutation either fully applies or returns an error without touching
/// the graph. Collections are ordered by id, so iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Floorplan {
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    pub(crate) segments: BTreeMap<SegmentId, Segment>,
    pub(crate) pois: BTreeMap<PoiId, Poi>,
    pub(crate) zones: BTreeMap<ZoneId, Zone>,
    pub(crate) calibration: Option<Calibration>,
    pub(crate) georeference: Option<Georeference>,
    pub(crate) image: Option<String>,
    next_id: u64,
}

impl Floorplan {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Id counter value; every id handed out so far is <= this
    pub fn last_id(&self) -> u64 {
        self.next_id
    }

    pub(crate) fn reserve_ids_through(&mut self, id: u64) {
        self.next_id = self.next_id.max(id);
    }

    // Nodes

    pub fn add_node(&mut self, position: Point<f64>) -> &Node {
        let id = NodeId(self.fresh_id());
        log::debug!("Adding {id} at ({:.1}, {:.1})", position.x(), position.y());
        self.nodes.entry(id).or_insert(Node { id, position })
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Moves a node and refreshes the length of every incident segment
    pub fn move_node(&mut self, id: NodeId, position: Point<f64>) -> Result<(), Error> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| Error::unknown("node", id))?;
        node.position = position;

        let incident: Vec<SegmentId> = self
            .segments
            .values()
            .filter(|s| s.touches(id))
            .map(|s| s.id)
            .collect();
        for segment_id in incident {
            self.refresh_length(segment_id);
        }
        Ok(())
    }

    /// Removes a node together with every segment that references it.
    ///
    /// Returns the ids of the removed segments.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Vec<SegmentId>, Error> {
        self.nodes
            .remove(&id)
            .ok_or_else(|| Error::unknown("node", id))?;

        let incident: Vec<SegmentId> = self
            .segments
            .values()
            .filter(|s| s.touches(id))
            .map(|s| s.id)
            .collect();
        for segment_id in &incident {
            self.segments.remove(segment_id);
        }

        log::debug!("Removed {id} and {} incident segments", incident.len());
        Ok(incident)
    }

    // Segments

    pub fn add_segment(&mut self, start: NodeId, end: NodeId) -> Result<&Segment, Error> {
        let a = self.position_of(start)?;
        let b = self.position_of(end)?;
        if start == end {
            return Err(Error::SelfLoop(start));
        }

        let id = SegmentId(self.fresh_id());
        log::debug!("Connecting {start} and {end} with {id}");
        Ok(self.segments.entry(id).or_insert(Segment {
            id,
            start,
            end,
            length: geometry::distance(a, b),
        }))
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(&id)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn remove_segment(&mut self, id: SegmentId) -> Result<Segment, Error> {
        self.segments
            .remove(&id)
            .ok_or_else(|| Error::unknown("segment", id))
    }

    /// Pixel endpoints of a segment
    pub fn segment_endpoints(&self, segment: &Segment) -> Option<(Point<f64>, Point<f64>)> {
        Some((
            self.nodes.get(&segment.start)?.position,
            self.nodes.get(&segment.end)?.position,
        ))
    }

    fn position_of(&self, id: NodeId) -> Result<Point<f64>, Error> {
        self.nodes
            .get(&id)
            .map(|n| n.position)
            .ok_or(Error::InvalidEndpoint(id))
    }

    fn refresh_length(&mut self, id: SegmentId) {
        let Some(segment) = self.segments.get(&id) else {
            return;
        };
        if let Some((a, b)) = self.segment_endpoints(segment) {
            let length = geometry::distance(a, b);
            if let Some(segment) = self.segments.get_mut(&id) {
                segment.length = length;
            }
        }
    }

    // Points of interest

    pub fn add_poi(
        &mut self,
        position: Point<f64>,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> &Poi {
        let id = PoiId(self.fresh_id());
        let poi = Poi {
            id,
            position,
            name: name.into(),
            kind: kind.into(),
        };
        log::debug!("Adding {id} '{}' ({})", poi.name, poi.kind);
        self.pois.entry(id).or_insert(poi)
    }

    pub fn poi(&self, id: PoiId) -> Option<&Poi> {
        self.pois.get(&id)
    }

    pub fn pois(&self) -> impl Iterator<Item = &Poi> {
        self.pois.values()
    }

    pub fn move_poi(&mut self, id: PoiId, position: Point<f64>) -> Result<(), Error> {
        self.poi_mut(id)?.position = position;
        Ok(())
    }

    pub fn rename_poi(
        &mut self,
        id: PoiId,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<(), Error> {
        let poi = self.poi_mut(id)?;
        poi.name = name.into();
        poi.kind = kind.into();
        Ok(())
    }

    pub fn remove_poi(&mut self, id: PoiId) -> Result<Poi, Error> {
        self.pois
            .remove(&id)
            .ok_or_else(|| Error::unknown("poi", id))
    }

    fn poi_mut(&mut self, id: PoiId) -> Result<&mut Poi, Error> {
        self.pois
            .get_mut(&id)
            .ok_or_else(|| Error::unknown("poi", id))
    }

    // Zones

    pub fn add_zone(
        &mut self,
        name: impl Into<String>,
        category: impl Into<String>,
        points: Vec<Point<f64>>,
    ) -> Result<&Zone, Error> {
        if points.len() < 3 {
            return Err(Error::InvalidZone(points.len()));
        }

        let id = ZoneId(self.fresh_id());
        Ok(self.zones.entry(id).or_insert(Zone {
            id,
            name: name.into(),
            category: category.into(),
            points,
        }))
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    pub fn remove_zone(&mut self, id: ZoneId) -> Result<Zone, Error> {
        self.zones
            .remove(&id)
            .ok_or_else(|| Error::unknown("zone", id))
    }

    /// Zones whose polygon contains `point`, in id order
    pub fn zones_containing(&self, point: Point<f64>) -> Vec<&Zone> {
        self.zones
            .values()
            .filter(|zone| zone.polygon().contains(&point))
            .collect()
    }

    // Waypoints and spatial queries

    /// Pixel position of a node or POI
    pub fn waypoint_position(&self, waypoint: Waypoint) -> Option<Point<f64>> {
        match waypoint {
            Waypoint::Node(id) => self.nodes.get(&id).map(|n| n.position),
            Waypoint::Poi(id) => self.pois.get(&id).map(|p| p.position),
        }
    }

    pub fn contains_waypoint(&self, waypoint: Waypoint) -> bool {
        self.waypoint_position(waypoint).is_some()
    }

    pub fn spatial_index(&self) -> SpatialIndex {
        SpatialIndex::build(self.nodes.values().map(|n| (n.id, n.position)))
    }

    /// Nearest node with its pixel distance, smallest id on ties
    pub fn nearest_node(&self, point: Point<f64>) -> Option<(NodeId, f64)> {
        self.spatial_index().nearest(point)
    }

    pub fn is_near_existing_node(&self, point: Point<f64>, threshold_px: f64) -> bool {
        geometry::is_near_existing_node(point, self.nodes.values().map(|n| n.position), threshold_px)
    }

    // Calibration

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Derives and installs a new scale, replacing any previous one
    pub fn calibrate(
        &mut self,
        a: Point<f64>,
        b: Point<f64>,
        real_meters: f64,
    ) -> Result<&Calibration, Error> {
        let calibration = Calibration::from_points(a, b, real_meters)?;
        log::info!(
            "Floorplan calibrated at {:.5} m/px",
            calibration.meters_per_pixel
        );
        Ok(self.calibration.insert(calibration))
    }

    pub fn clear_calibration(&mut self) {
        self.calibration = None;
    }

    pub fn georeference(&self) -> Option<&Georeference> {
        self.georeference.as_ref()
    }

    /// Stores the anchor mapping verbatim, replacing any previous one
    pub fn set_georeference(
        &mut self,
        anchor_pixel: Point<f64>,
        anchor: LatLng,
        bearing_degrees: f64,
    ) -> Result<&Georeference, Error> {
        let georeference = Georeference::new(anchor_pixel, anchor, bearing_degrees)?;
        Ok(self.georeference.insert(georeference))
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn set_image(&mut self, image: Option<String>) {
        self.image = image;
    }
}
