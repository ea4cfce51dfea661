//! Shortest walkable paths between nodes and points of interest

mod augmented;
pub mod dijkstra;
mod path;
mod to_geojson;

pub use augmented::{AugmentedGraph, ExtraEdge, augment};
pub use path::{PathResult, find_path};
