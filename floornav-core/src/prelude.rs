pub use crate::INTERSECTION_EPSILON_PX;
pub use crate::NODE_PROXIMITY_PX;

// Re-export key components
pub use crate::algo::intersections::{Crossing, find_crossings};
pub use crate::calibration::{Calibration, Georeference, LatLng, compute_scale};
pub use crate::config::EngineConfig;
pub use crate::editor::{ClickOutcome, EditorController, ModeKind};
pub use crate::loading::{FloorplanDocument, load_floorplan, save_floorplan};
pub use crate::routing::{PathResult, find_path};

// Graph model
pub use crate::model::{Floorplan, Node, Poi, Segment, Waypoint, Zone};
pub use crate::model::{NodeId, PoiId, SegmentId, ZoneId};

pub use crate::Error;
