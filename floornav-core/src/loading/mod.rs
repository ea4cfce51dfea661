//! Persistence of floorplans as JSON documents, with validation on load.

mod document;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub use document::FloorplanDocument;
use log::info;

use crate::{Error, Floorplan};

/// Reads and validates a floorplan document from `path`
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not a valid document.
/// Inconsistent elements inside a well-formed document are dropped with a
/// warning instead.
pub fn load_floorplan(path: impl AsRef<Path>) -> Result<Floorplan, Error> {
    let path = path.as_ref();
    info!("Loading floorplan: {}", path.display());

    let reader = BufReader::new(File::open(path)?);
    let document: FloorplanDocument = serde_json::from_reader(reader)?;
    Ok(Floorplan::from_document(document))
}

/// Writes `floorplan` to `path`, replacing any previous file
pub fn save_floorplan(floorplan: &Floorplan, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &floorplan.to_document())?;
    info!("Saved floorplan to {}", path.display());
    Ok(())
}
