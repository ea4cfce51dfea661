//! Indoor navigation engine for floorplan editing.
//!
//! Holds the waypoint graph drawn over a floorplan image, detects
//! unintended pathway crossings, answers shortest-path queries between
//! nodes and points of interest, and keeps the pixel to meters/GPS
//! calibration for a floorplan.

pub mod algo;
pub mod calibration;
pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use algo::intersections::{Crossing, find_crossings};
pub use calibration::{Calibration, Georeference, LatLng, compute_scale};
pub use config::EngineConfig;
pub use editor::{ClickOutcome, EditorController, EditorMode, ModeKind};
pub use error::Error;
pub use loading::{FloorplanDocument, load_floorplan, save_floorplan};
pub use model::{Floorplan, Node, NodeId, Poi, PoiId, Segment, SegmentId, Waypoint, Zone, ZoneId};
pub use routing::{AugmentedGraph, PathResult, augment, find_path};

/// Default radius in pixels within which a point counts as touching a node.
pub const NODE_PROXIMITY_PX: f64 = 10.0;

/// Slack in pixels applied to each bound check of a segment intersection.
pub const INTERSECTION_EPSILON_PX: f64 = 0.1;
