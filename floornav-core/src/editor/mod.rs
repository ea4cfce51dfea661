//! Pointer-driven editing session over one floorplan
//!
//! A single [`EditorController`] owns the floorplan and an explicit
//! [`EditorMode`] value. Each input is handled to completion, including the
//! crossing re-scan, before the next one is accepted.

mod controller;
mod mode;

pub use controller::{ClickOutcome, DeletedElement, EditorController};
pub use mode::{EditorMode, ModeKind, PathfindingState};
