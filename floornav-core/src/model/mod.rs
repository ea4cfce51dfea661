//! Data model of the walkable floorplan graph
//!
//! Nodes and segments form the persisted graph; POIs float outside of it
//! until a pathfinding query attaches them. Zones share the pixel space but
//! take no part in routing.

pub mod components;
pub mod floorplan;
pub mod spatial;

pub use components::{Node, NodeId, Poi, PoiId, Segment, SegmentId, Waypoint, Zone, ZoneId};
pub use floorplan::Floorplan;
pub use spatial::SpatialIndex;
