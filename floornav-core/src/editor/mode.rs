use geo::Point;
use serde::{Deserialize, Serialize};

use crate::model::{NodeId, Waypoint};
use crate::routing::PathResult;

/// Mode selector without any draft data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Idle,
    PlacingNode,
    PlacingSegment,
    PlacingPoi,
    PlacingZone,
    Calibrating,
    Georeferencing,
    Editing,
    Deleting,
    Pathfinding,
}

/// Active interaction mode together with its in-progress input
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorMode {
    #[default]
    Idle,
    PlacingNode,
    /// `first` is set while awaiting the second endpoint
    PlacingSegment { first: Option<NodeId> },
    /// Position picked, waiting for the naming dialog
    PlacingPoi { pending: Option<Point<f64>> },
    PlacingZone { points: Vec<Point<f64>> },
    Calibrating {
        first: Option<Point<f64>>,
        second: Option<Point<f64>>,
    },
    Georeferencing { anchor: Option<Point<f64>> },
    Editing { dragging: Option<Waypoint> },
    Deleting,
    Pathfinding(PathfindingState),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathfindingState {
    AwaitingStart,
    AwaitingEnd {
        start: Waypoint,
    },
    /// `path` is `None` when the query failed
    Resolved {
        start: Waypoint,
        end: Waypoint,
        path: Option<PathResult>,
    },
}

impl EditorMode {
    /// Fresh state for `kind` with every draft empty
    pub fn enter(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Idle => EditorMode::Idle,
            ModeKind::PlacingNode => EditorMode::PlacingNode,
            ModeKind::PlacingSegment => EditorMode::PlacingSegment { first: None },
            ModeKind::PlacingPoi => EditorMode::PlacingPoi { pending: None },
            ModeKind::PlacingZone => EditorMode::PlacingZone { points: Vec::new() },
            ModeKind::Calibrating => EditorMode::Calibrating {
                first: None,
                second: None,
            },
            ModeKind::Georeferencing => EditorMode::Georeferencing { anchor: None },
            ModeKind::Editing => EditorMode::Editing { dragging: None },
            ModeKind::Deleting => EditorMode::Deleting,
            ModeKind::Pathfinding => EditorMode::Pathfinding(PathfindingState::AwaitingStart),
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            EditorMode::Idle => ModeKind::Idle,
            EditorMode::PlacingNode => ModeKind::PlacingNode,
            EditorMode::PlacingSegment { .. } => ModeKind::PlacingSegment,
            EditorMode::PlacingPoi { .. } => ModeKind::PlacingPoi,
            EditorMode::PlacingZone { .. } => ModeKind::PlacingZone,
            EditorMode::Calibrating { .. } => ModeKind::Calibrating,
            EditorMode::Georeferencing { .. } => ModeKind::Georeferencing,
            EditorMode::Editing { .. } => ModeKind::Editing,
            EditorMode::Deleting => ModeKind::Deleting,
            EditorMode::Pathfinding(_) => ModeKind::Pathfinding,
        }
    }
}
