//! Floorplan graph components - nodes, segments, points of interest and zones

use std::fmt;

use geo::{Coord, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

macro_rules! element_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " #{}"), self.0)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }
    };
}

element_id!(
    /// Identifier of a walkable waypoint
    NodeId,
    "node"
);
element_id!(
    /// Identifier of a walkable edge
    SegmentId,
    "segment"
);
element_id!(
    /// Identifier of a point of interest
    PoiId,
    "poi"
);
element_id!(ZoneId, "zone");

/// Waypoint on the walkable graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Pixel position on the floorplan image
    pub position: Point<f64>,
}

/// Undirected walkable edge between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub start: NodeId,
    pub end: NodeId,
    /// Pixel distance between the endpoints, kept in sync by [`super::Floorplan`]
    #[serde(default)]
    pub length: f64,
}

impl Segment {
    pub fn touches(&self, node: NodeId) -> bool {
        self.start == node || self.end == node
    }

    pub fn shares_endpoint(&self, other: &Segment) -> bool {
        self.touches(other.start) || self.touches(other.end)
    }
}

/// Named location that floats outside the persisted segment graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: PoiId,
    pub position: Point<f64>,
    pub name: String,
    /// Category tag, e.g. "booth", "restroom", "entrance"
    pub kind: String,
}

/// Labeled polygon sharing the floorplan pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub category: String,
    pub points: Vec<Point<f64>>,
}

impl Zone {
    pub fn polygon(&self) -> Polygon<f64> {
        let ring: Vec<Coord<f64>> = self.points.iter().map(|p| p.0).collect();
        Polygon::new(LineString::new(ring), vec![])
    }
}

/// Endpoint of a pathfinding query.
///
/// Ordering puts nodes before POIs, then ascending id; every tie-break in
/// the engine relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Waypoint {
    Node(NodeId),
    Poi(PoiId),
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waypoint::Node(id) => id.fmt(f),
            Waypoint::Poi(id) => id.fmt(f),
        }
    }
}

impl From<NodeId> for Waypoint {
    fn from(id: NodeId) -> Self {
        Waypoint::Node(id)
    }
}

impl From<PoiId> for Waypoint {
    fn from(id: PoiId) -> Self {
        Waypoint::Poi(id)
    }
}
