use thiserror::Error;

use crate::model::{NodeId, Waypoint};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Segment endpoint {0} does not exist")]
    InvalidEndpoint(NodeId),
    #[error("Segment would connect {0} to itself")]
    SelfLoop(NodeId),
    #[error("{0} cannot be attached to the graph: floorplan has no nodes")]
    IsolatedPoint(Waypoint),
    #[error("No path between {from} and {to}")]
    Unreachable { from: Waypoint, to: Waypoint },
    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),
    #[error("Invalid georeference: {0}")]
    InvalidGeoreference(String),
    #[error("Floorplan is not georeferenced and calibrated")]
    NotGeoreferenced,
    #[error("Unknown {kind} {id}")]
    UnknownElement { kind: &'static str, id: u64 },
    #[error("Nothing to submit: {0}")]
    NothingToSubmit(&'static str),
    #[error("Zone needs at least 3 points, got {0}")]
    InvalidZone(usize),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn unknown(kind: &'static str, id: impl Into<u64>) -> Self {
        Error::UnknownElement {
            kind,
            id: id.into(),
        }
    }
}
