//! Tunable thresholds of the engine

use serde::{Deserialize, Serialize};

use crate::NODE_PROXIMITY_PX;

/// Engine settings shared by the editor controller and the crossing scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pointer hit-test radius in pixels
    pub hit_radius_px: f64,
    /// A crossing closer than this to a node is treated as that node
    pub node_proximity_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hit_radius_px: NODE_PROXIMITY_PX,
            node_proximity_px: NODE_PROXIMITY_PX,
        }
    }
}
