use geo::Point;
use serde::Serialize;

use super::mode::{EditorMode, ModeKind, PathfindingState};
use crate::Error;
use crate::algo::intersections::{Crossing, find_crossings};
use crate::calibration::{Calibration, Georeference, LatLng};
use crate::config::EngineConfig;
use crate::geometry::{distance, point_segment_distance};
use crate::model::{Floorplan, NodeId, PoiId, SegmentId, Waypoint, ZoneId};
use crate::routing::{PathResult, find_path};

/// What a single click did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClickOutcome {
    /// Click had no effect in the current mode
    Ignored,
    NodeCreated { id: NodeId },
    SegmentStarted { first: NodeId },
    SegmentCancelled,
    SegmentCreated { id: SegmentId },
    /// Position stored, waiting for [`EditorController::submit_poi`]
    PoiPlaced { position: Point<f64> },
    ZonePointAdded { count: usize },
    CalibrationPointPicked { count: usize },
    AnchorPicked { position: Point<f64> },
    Deleted { element: DeletedElement },
    PathStartSelected { start: Waypoint },
    PathStartCleared,
    PathResolved { path: PathResult },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeletedElement {
    Node { id: NodeId, segments: Vec<SegmentId> },
    Segment { id: SegmentId },
    Poi { id: PoiId },
    Zone { id: ZoneId },
}

/// Owns the floorplan for an editing session and routes pointer input to
/// the mutation selected by the current mode.
#[derive(Debug, Clone)]
pub struct EditorController {
    floorplan: Floorplan,
    config: EngineConfig,
    mode: EditorMode,
    crossings: Vec<Crossing>,
}

impl EditorController {
    pub fn new(floorplan: Floorplan, config: EngineConfig) -> Self {
        let mut controller = Self {
            floorplan,
            config,
            mode: EditorMode::Idle,
            crossings: Vec::new(),
        };
        controller.rescan();
        controller
    }

    pub fn floorplan(&self) -> &Floorplan {
        &self.floorplan
    }

    pub fn into_floorplan(self) -> Floorplan {
        self.floorplan
    }

    /// Swaps in another floorplan and resets the current mode's draft
    pub fn replace_floorplan(&mut self, floorplan: Floorplan) {
        self.floorplan = floorplan;
        self.cancel_draft();
        self.rescan();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Advisory crossings from the latest scan
    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    /// Result of the last resolved pathfinding query
    pub fn path(&self) -> Option<&PathResult> {
        match &self.mode {
            EditorMode::Pathfinding(PathfindingState::Resolved { path, .. }) => path.as_ref(),
            _ => None,
        }
    }

    /// Switches mode, discarding every draft of the previous one
    pub fn set_mode(&mut self, kind: ModeKind) {
        log::debug!("Editor mode {:?} -> {kind:?}", self.mode.kind());
        self.mode = EditorMode::enter(kind);
    }

    /// Drops the draft of the current mode without leaving it
    pub fn cancel_draft(&mut self) {
        self.mode = EditorMode::enter(self.mode.kind());
    }

    /// Runs an arbitrary floorplan mutation, then re-derives crossings and
    /// the resolved path
    pub fn apply<T, F>(&mut self, mutation: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Floorplan) -> Result<T, Error>,
    {
        let result = mutation(&mut self.floorplan);
        self.rescan();
        result
    }

    fn rescan(&mut self) {
        self.crossings = find_crossings(&self.floorplan, self.config.node_proximity_px);

        if let EditorMode::Pathfinding(PathfindingState::Resolved { start, end, path }) =
            &mut self.mode
        {
            *path = find_path(&self.floorplan, *start, *end)
                .inspect_err(|e| log::debug!("Resolved path dropped: {e}"))
                .ok();
        }
    }

    /// Handles a click at `point` (pixel space, pan/zoom already removed)
    pub fn click(&mut self, point: Point<f64>) -> Result<ClickOutcome, Error> {
        let mode = std::mem::take(&mut self.mode);
        let (next, outcome) = self.dispatch_click(mode, point);
        self.mode = next;
        outcome
    }

    fn dispatch_click(
        &mut self,
        mode: EditorMode,
        point: Point<f64>,
    ) -> (EditorMode, Result<ClickOutcome, Error>) {
        match mode {
            EditorMode::PlacingNode => {
                let id = self.floorplan.add_node(point).id;
                self.rescan();
                (mode, Ok(ClickOutcome::NodeCreated { id }))
            }
            EditorMode::PlacingSegment { first } => self.segment_click(first, point),
            EditorMode::PlacingPoi { .. } => (
                EditorMode::PlacingPoi {
                    pending: Some(point),
                },
                Ok(ClickOutcome::PoiPlaced { position: point }),
            ),
            EditorMode::PlacingZone { mut points } => {
                points.push(point);
                let count = points.len();
                (
                    EditorMode::PlacingZone { points },
                    Ok(ClickOutcome::ZonePointAdded { count }),
                )
            }
            EditorMode::Calibrating { first, second } => {
                // A third click starts a fresh pair
                let (first, second) = match (first, second) {
                    (Some(a), None) => (Some(a), Some(point)),
                    _ => (Some(point), None),
                };
                let count = if second.is_some() { 2 } else { 1 };
                (
                    EditorMode::Calibrating { first, second },
                    Ok(ClickOutcome::CalibrationPointPicked { count }),
                )
            }
            EditorMode::Georeferencing { .. } => (
                EditorMode::Georeferencing {
                    anchor: Some(point),
                },
                Ok(ClickOutcome::AnchorPicked { position: point }),
            ),
            EditorMode::Deleting => {
                let outcome = self.delete_at(point);
                (mode, outcome)
            }
            EditorMode::Pathfinding(state) => self.pathfinding_click(state, point),
            EditorMode::Idle | EditorMode::Editing { .. } => (mode, Ok(ClickOutcome::Ignored)),
        }
    }

    fn segment_click(
        &mut self,
        first: Option<NodeId>,
        point: Point<f64>,
    ) -> (EditorMode, Result<ClickOutcome, Error>) {
        let Some(hit) = self.hit_node(point) else {
            return (
                EditorMode::PlacingSegment { first },
                Ok(ClickOutcome::Ignored),
            );
        };

        match first {
            None => (
                EditorMode::PlacingSegment { first: Some(hit) },
                Ok(ClickOutcome::SegmentStarted { first: hit }),
            ),
            Some(start) if start == hit => (
                EditorMode::PlacingSegment { first: None },
                Ok(ClickOutcome::SegmentCancelled),
            ),
            Some(start) => {
                let outcome = self
                    .floorplan
                    .add_segment(start, hit)
                    .map(|segment| ClickOutcome::SegmentCreated { id: segment.id });
                self.rescan();
                (EditorMode::PlacingSegment { first: None }, outcome)
            }
        }
    }

    fn pathfinding_click(
        &mut self,
        state: PathfindingState,
        point: Point<f64>,
    ) -> (EditorMode, Result<ClickOutcome, Error>) {
        let Some(hit) = self.hit_waypoint(point) else {
            return (EditorMode::Pathfinding(state), Ok(ClickOutcome::Ignored));
        };

        match state {
            PathfindingState::AwaitingEnd { start } if start == hit => (
                EditorMode::Pathfinding(PathfindingState::AwaitingStart),
                Ok(ClickOutcome::PathStartCleared),
            ),
            PathfindingState::AwaitingEnd { start } => {
                let result = find_path(&self.floorplan, start, hit);
                let path = result.as_ref().ok().cloned();
                let next = EditorMode::Pathfinding(PathfindingState::Resolved {
                    start,
                    end: hit,
                    path,
                });
                (next, result.map(|path| ClickOutcome::PathResolved { path }))
            }
            PathfindingState::AwaitingStart | PathfindingState::Resolved { .. } => (
                EditorMode::Pathfinding(PathfindingState::AwaitingEnd { start: hit }),
                Ok(ClickOutcome::PathStartSelected { start: hit }),
            ),
        }
    }

    /// Removes the POI under the pointer, else the node, else the nearest
    /// segment, else the most recently drawn zone containing the point
    fn delete_at(&mut self, point: Point<f64>) -> Result<ClickOutcome, Error> {
        let element = if let Some(id) = self.hit_poi(point) {
            self.floorplan.remove_poi(id)?;
            DeletedElement::Poi { id }
        } else if let Some(id) = self.hit_node(point) {
            let segments = self.floorplan.remove_node(id)?;
            DeletedElement::Node { id, segments }
        } else if let Some(id) = self.hit_segment(point) {
            self.floorplan.remove_segment(id)?;
            DeletedElement::Segment { id }
        } else if let Some(id) = self
            .floorplan
            .zones_containing(point)
            .last()
            .map(|zone| zone.id)
        {
            self.floorplan.remove_zone(id)?;
            DeletedElement::Zone { id }
        } else {
            return Ok(ClickOutcome::Ignored);
        };

        self.rescan();
        log::debug!("Deleted {element:?}");
        Ok(ClickOutcome::Deleted { element })
    }

    // Editing mode drag handling

    /// Grabs the node or POI under the pointer
    pub fn pointer_down(&mut self, point: Point<f64>) -> Option<Waypoint> {
        if !matches!(self.mode, EditorMode::Editing { .. }) {
            return None;
        }
        let hit = self.hit_waypoint(point);
        self.mode = EditorMode::Editing { dragging: hit };
        hit
    }

    pub fn pointer_move(&mut self, point: Point<f64>) -> Result<(), Error> {
        let EditorMode::Editing {
            dragging: Some(waypoint),
        } = self.mode
        else {
            return Ok(());
        };

        match waypoint {
            Waypoint::Node(id) => self.floorplan.move_node(id, point)?,
            Waypoint::Poi(id) => self.floorplan.move_poi(id, point)?,
        }
        self.rescan();
        Ok(())
    }

    pub fn pointer_up(&mut self) {
        if let EditorMode::Editing { dragging } = &mut self.mode {
            *dragging = None;
        }
    }

    // Dialog submissions

    /// Names the pending POI placement and creates it
    pub fn submit_poi(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<PoiId, Error> {
        let EditorMode::PlacingPoi {
            pending: Some(position),
        } = self.mode
        else {
            return Err(Error::NothingToSubmit("no POI placement pending"));
        };

        let id = self.floorplan.add_poi(position, name, kind).id;
        self.mode = EditorMode::PlacingPoi { pending: None };
        Ok(id)
    }

    /// Closes the drafted polygon into a zone
    pub fn finish_zone(
        &mut self,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<ZoneId, Error> {
        let EditorMode::PlacingZone { points } = &self.mode else {
            return Err(Error::NothingToSubmit("no zone being drawn"));
        };

        let id = self.floorplan.add_zone(name, category, points.clone())?.id;
        self.mode = EditorMode::PlacingZone { points: Vec::new() };
        Ok(id)
    }

    /// Applies the real distance between the two picked calibration points
    pub fn submit_calibration(&mut self, real_meters: f64) -> Result<&Calibration, Error> {
        let EditorMode::Calibrating {
            first: Some(a),
            second: Some(b),
        } = self.mode
        else {
            return Err(Error::NothingToSubmit("two calibration points are required"));
        };

        let calibration = self.floorplan.calibrate(a, b, real_meters)?;
        self.mode = EditorMode::enter(ModeKind::Calibrating);
        Ok(calibration)
    }

    /// Pins the picked anchor pixel to a GPS position
    pub fn submit_georeference(
        &mut self,
        anchor: LatLng,
        bearing_degrees: f64,
    ) -> Result<&Georeference, Error> {
        let EditorMode::Georeferencing {
            anchor: Some(pixel),
        } = self.mode
        else {
            return Err(Error::NothingToSubmit("no anchor point picked"));
        };

        let georeference = self.floorplan.set_georeference(pixel, anchor, bearing_degrees)?;
        self.mode = EditorMode::enter(ModeKind::Georeferencing);
        Ok(georeference)
    }

    // Hit testing

    fn hit_node(&self, point: Point<f64>) -> Option<NodeId> {
        self.floorplan
            .spatial_index()
            .within(point, self.config.hit_radius_px)
            .first()
            .map(|(id, _)| *id)
    }

    fn pois_within(&self, point: Point<f64>) -> impl Iterator<Item = (PoiId, f64)> + '_ {
        let radius = self.config.hit_radius_px;
        self.floorplan
            .pois()
            .map(move |poi| (poi.id, distance(point, poi.position)))
            .filter(move |(_, d)| *d <= radius)
    }

    fn hit_poi(&self, point: Point<f64>) -> Option<PoiId> {
        self.pois_within(point)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(id, _)| id)
    }

    /// Closest node or POI within the hit radius
    fn hit_waypoint(&self, point: Point<f64>) -> Option<Waypoint> {
        let nodes = self
            .floorplan
            .spatial_index()
            .within(point, self.config.hit_radius_px)
            .into_iter()
            .map(|(id, d)| (Waypoint::Node(id), d));
        let pois = self.pois_within(point).map(|(id, d)| (Waypoint::Poi(id), d));

        nodes
            .chain(pois)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(waypoint, _)| waypoint)
    }

    fn hit_segment(&self, point: Point<f64>) -> Option<SegmentId> {
        self.floorplan
            .segments()
            .filter_map(|segment| {
                let (a, b) = self.floorplan.segment_endpoints(segment)?;
                let d = point_segment_distance(point, a, b);
                (d <= self.config.hit_radius_px).then_some((segment.id, d))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> EditorController {
        EditorController::new(Floorplan::new(), EngineConfig::default())
    }

    fn place_nodes(editor: &mut EditorController, points: &[(f64, f64)]) -> Vec<NodeId> {
        editor.set_mode(ModeKind::PlacingNode);
        points
            .iter()
            .map(|&(x, y)| match editor.click(Point::new(x, y)).unwrap() {
                ClickOutcome::NodeCreated { id } => id,
                other => panic!("unexpected outcome {other:?}"),
            })
            .collect()
    }

    fn connect(editor: &mut EditorController, a: (f64, f64), b: (f64, f64)) -> SegmentId {
        editor.set_mode(ModeKind::PlacingSegment);
        editor.click(Point::new(a.0, a.1)).unwrap();
        match editor.click(Point::new(b.0, b.1)).unwrap() {
            ClickOutcome::SegmentCreated { id } => id,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn segment_mode_connects_two_clicked_nodes() {
        let mut editor = editor();
        let ids = place_nodes(&mut editor, &[(0.0, 0.0), (100.0, 0.0)]);

        editor.set_mode(ModeKind::PlacingSegment);
        assert_eq!(
            editor.click(Point::new(50.0, 50.0)).unwrap(),
            ClickOutcome::Ignored
        );
        assert_eq!(
            editor.click(Point::new(2.0, 1.0)).unwrap(),
            ClickOutcome::SegmentStarted { first: ids[0] }
        );
        assert_eq!(
            editor.mode(),
            &EditorMode::PlacingSegment {
                first: Some(ids[0])
            }
        );
        let created = editor.click(Point::new(99.0, -3.0)).unwrap();
        assert!(matches!(created, ClickOutcome::SegmentCreated { .. }));
        assert_eq!(editor.floorplan().segment_count(), 1);
    }

    #[test]
    fn clicking_first_endpoint_again_cancels_segment() {
        let mut editor = editor();
        place_nodes(&mut editor, &[(0.0, 0.0)]);
        editor.set_mode(ModeKind::PlacingSegment);
        editor.click(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(
            editor.click(Point::new(1.0, 1.0)).unwrap(),
            ClickOutcome::SegmentCancelled
        );
        assert_eq!(editor.floorplan().segment_count(), 0);
    }

    #[test]
    fn switching_modes_discards_drafts() {
        let mut editor = editor();
        place_nodes(&mut editor, &[(0.0, 0.0)]);
        editor.set_mode(ModeKind::PlacingSegment);
        editor.click(Point::new(0.0, 0.0)).unwrap();

        editor.set_mode(ModeKind::PlacingZone);
        editor.click(Point::new(0.0, 0.0)).unwrap();
        editor.set_mode(ModeKind::PlacingSegment);
        assert_eq!(editor.mode(), &EditorMode::PlacingSegment { first: None });

        editor.set_mode(ModeKind::PlacingZone);
        assert!(matches!(
            editor.finish_zone("Hall", "exhibit"),
            Err(Error::InvalidZone(0))
        ));
    }

    #[test]
    fn crossings_are_rescanned_after_every_mutation() {
        let mut editor = editor();
        place_nodes(
            &mut editor,
            &[(0.0, 0.0), (100.0, 100.0), (0.0, 100.0), (100.0, 0.0)],
        );
        connect(&mut editor, (0.0, 0.0), (100.0, 100.0));
        assert!(editor.crossings().is_empty());

        let second = connect(&mut editor, (0.0, 100.0), (100.0, 0.0));
        assert_eq!(editor.crossings().len(), 1);

        editor.apply(|plan| plan.remove_segment(second)).unwrap();
        assert!(editor.crossings().is_empty());
    }

    #[test]
    fn poi_needs_naming_before_it_exists() {
        let mut editor = editor();
        editor.set_mode(ModeKind::PlacingPoi);
        assert!(matches!(
            editor.submit_poi("Bar", "food"),
            Err(Error::NothingToSubmit(_))
        ));

        editor.click(Point::new(40.0, 40.0)).unwrap();
        assert_eq!(editor.floorplan().pois().count(), 0);
        let id = editor.submit_poi("Bar", "food").unwrap();
        assert_eq!(editor.floorplan().poi(id).unwrap().name, "Bar");
        assert_eq!(editor.mode(), &EditorMode::PlacingPoi { pending: None });
    }

    #[test]
    fn zone_drawing_commits_polygon() {
        let mut editor = editor();
        editor.set_mode(ModeKind::PlacingZone);
        for (x, y) in [(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)] {
            editor.click(Point::new(x, y)).unwrap();
        }
        let id = editor.finish_zone("Lobby", "common").unwrap();
        assert_eq!(editor.floorplan().zone(id).unwrap().points.len(), 3);
    }

    #[test]
    fn calibration_takes_two_points_and_a_distance() {
        let mut editor = editor();
        editor.set_mode(ModeKind::Calibrating);
        editor.click(Point::new(0.0, 0.0)).unwrap();
        assert!(editor.submit_calibration(10.0).is_err());

        assert_eq!(
            editor.click(Point::new(200.0, 0.0)).unwrap(),
            ClickOutcome::CalibrationPointPicked { count: 2 }
        );
        let scale = editor.submit_calibration(10.0).unwrap().meters_per_pixel;
        assert!((scale - 0.05).abs() < 1e-12);
    }

    #[test]
    fn georeference_is_stored_verbatim() {
        let mut editor = editor();
        editor.set_mode(ModeKind::Georeferencing);
        editor.click(Point::new(12.0, 34.0)).unwrap();
        let geo = editor
            .submit_georeference(LatLng::new(37.77, -122.42), 15.0)
            .unwrap();
        assert_eq!(geo.anchor_pixel, Point::new(12.0, 34.0));
        assert!((geo.bearing_degrees - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn drag_moves_node_and_updates_lengths() {
        let mut editor = editor();
        place_nodes(&mut editor, &[(0.0, 0.0), (100.0, 0.0)]);
        let segment = connect(&mut editor, (0.0, 0.0), (100.0, 0.0));

        editor.set_mode(ModeKind::Editing);
        assert!(editor.pointer_down(Point::new(101.0, 1.0)).is_some());
        editor.pointer_move(Point::new(100.0, 100.0)).unwrap();
        editor.pointer_up();
        editor.pointer_move(Point::new(500.0, 500.0)).unwrap();

        let length = editor.floorplan().segment(segment).unwrap().length;
        assert!((length - 100.0_f64.hypot(100.0)).abs() < 1e-9);
    }

    #[test]
    fn drag_moves_poi() {
        let mut editor = editor();
        let ids = place_nodes(&mut editor, &[(0.0, 0.0)]);
        let poi = editor
            .apply(|plan| Ok(plan.add_poi(Point::new(200.0, 0.0), "Cafe", "food").id))
            .unwrap();

        editor.set_mode(ModeKind::Editing);
        assert_eq!(
            editor.pointer_down(Point::new(203.0, 2.0)),
            Some(Waypoint::Poi(poi))
        );
        editor.pointer_move(Point::new(250.0, 40.0)).unwrap();
        editor.pointer_up();

        let moved = editor.floorplan().poi(poi).unwrap();
        assert_eq!(moved.position, Point::new(250.0, 40.0));
        assert_eq!(
            editor.floorplan().node(ids[0]).map(|n| n.position),
            Some(Point::new(0.0, 0.0))
        );
    }

    #[test]
    fn delete_mode_prefers_waypoints_then_segments() {
        let mut editor = editor();
        let ids = place_nodes(&mut editor, &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        connect(&mut editor, (0.0, 0.0), (100.0, 0.0));
        let bc = connect(&mut editor, (100.0, 0.0), (100.0, 100.0));

        editor.set_mode(ModeKind::Deleting);
        let outcome = editor.click(Point::new(102.0, 50.0)).unwrap();
        assert_eq!(
            outcome,
            ClickOutcome::Deleted {
                element: DeletedElement::Segment { id: bc }
            }
        );

        let outcome = editor.click(Point::new(1.0, 1.0)).unwrap();
        assert!(matches!(
            outcome,
            ClickOutcome::Deleted {
                element: DeletedElement::Node { id, ref segments }
            } if id == ids[0] && segments.len() == 1
        ));
        assert_eq!(editor.floorplan().segment_count(), 0);
    }

    #[test]
    fn delete_mode_removes_poi_before_node_underneath() {
        let mut editor = editor();
        let ids = place_nodes(&mut editor, &[(0.0, 0.0)]);
        let poi = editor
            .apply(|plan| Ok(plan.add_poi(Point::new(6.0, 0.0), "Info", "desk").id))
            .unwrap();

        editor.set_mode(ModeKind::Deleting);
        assert_eq!(
            editor.click(Point::new(1.0, 0.0)).unwrap(),
            ClickOutcome::Deleted {
                element: DeletedElement::Poi { id: poi }
            }
        );
        assert!(matches!(
            editor.click(Point::new(1.0, 0.0)).unwrap(),
            ClickOutcome::Deleted {
                element: DeletedElement::Node { id, .. }
            } if id == ids[0]
        ));
        assert_eq!(
            editor.click(Point::new(1.0, 0.0)).unwrap(),
            ClickOutcome::Ignored
        );
    }

    #[test]
    fn delete_mode_removes_most_recent_overlapping_zone() {
        let mut editor = editor();
        let square = |offset: f64| {
            vec![
                Point::new(offset, offset),
                Point::new(offset + 100.0, offset),
                Point::new(offset + 100.0, offset + 100.0),
                Point::new(offset, offset + 100.0),
            ]
        };
        let older = editor
            .apply(|plan| Ok(plan.add_zone("Hall", "exhibit", square(0.0))?.id))
            .unwrap();
        let newer = editor
            .apply(|plan| Ok(plan.add_zone("Booth", "stand", square(50.0))?.id))
            .unwrap();

        editor.set_mode(ModeKind::Deleting);
        let inside_both = Point::new(75.0, 75.0);
        assert_eq!(
            editor.click(inside_both).unwrap(),
            ClickOutcome::Deleted {
                element: DeletedElement::Zone { id: newer }
            }
        );
        assert_eq!(
            editor.click(inside_both).unwrap(),
            ClickOutcome::Deleted {
                element: DeletedElement::Zone { id: older }
            }
        );
        assert_eq!(editor.click(inside_both).unwrap(), ClickOutcome::Ignored);
        assert_eq!(editor.floorplan().zones().count(), 0);
    }

    #[test]
    fn resolved_path_follows_floorplan_edits() {
        let mut editor = editor();
        let ids = place_nodes(&mut editor, &[(0.0, 0.0), (200.0, 0.0)]);
        let segment = connect(&mut editor, (0.0, 0.0), (200.0, 0.0));

        editor.set_mode(ModeKind::Pathfinding);
        editor.click(Point::new(0.0, 0.0)).unwrap();
        editor.click(Point::new(200.0, 0.0)).unwrap();
        assert!(editor.path().unwrap().length_meters.is_none());

        editor.apply(|plan| plan.remove_segment(segment)).unwrap();
        assert!(editor.path().is_none());

        editor
            .apply(|plan| plan.add_segment(ids[0], ids[1]).map(|_| ()))
            .unwrap();
        editor
            .apply(|plan| {
                plan.calibrate(Point::new(0.0, 0.0), Point::new(200.0, 0.0), 10.0)
                    .map(|_| ())
            })
            .unwrap();
        let path = editor.path().unwrap();
        assert!((path.length_pixels - 200.0).abs() < 1e-9);
        assert!((path.length_meters.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn pathfinding_flow() {
        let mut editor = editor();
        let ids = place_nodes(&mut editor, &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        connect(&mut editor, (0.0, 0.0), (100.0, 0.0));
        connect(&mut editor, (100.0, 0.0), (100.0, 100.0));

        editor.set_mode(ModeKind::Pathfinding);
        editor.click(Point::new(0.0, 0.0)).unwrap();
        // Clicking the start again deselects it
        assert_eq!(
            editor.click(Point::new(0.0, 0.0)).unwrap(),
            ClickOutcome::PathStartCleared
        );
        assert_eq!(
            editor.mode(),
            &EditorMode::Pathfinding(PathfindingState::AwaitingStart)
        );

        editor.click(Point::new(0.0, 0.0)).unwrap();
        let ClickOutcome::PathResolved { path } = editor.click(Point::new(100.0, 100.0)).unwrap()
        else {
            panic!("expected a resolved path");
        };
        assert_eq!(
            path.waypoints,
            ids.iter().copied().map(Waypoint::Node).collect::<Vec<_>>()
        );
        assert!((path.length_pixels - 200.0).abs() < 1e-9);
        assert_eq!(editor.path(), Some(&path));

        editor.set_mode(ModeKind::Idle);
        assert!(editor.path().is_none());
    }

    #[test]
    fn failed_query_is_reported_and_resolves_empty() {
        let mut editor = editor();
        place_nodes(&mut editor, &[(0.0, 0.0), (300.0, 0.0)]);

        editor.set_mode(ModeKind::Pathfinding);
        editor.click(Point::new(0.0, 0.0)).unwrap();
        let err = editor.click(Point::new(300.0, 0.0)).unwrap_err();
        assert!(matches!(err, Error::Unreachable { .. }));
        assert!(matches!(
            editor.mode(),
            EditorMode::Pathfinding(PathfindingState::Resolved { path: None, .. })
        ));
    }
}
