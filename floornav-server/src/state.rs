use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use floornav_core::{EditorController, EngineConfig, Floorplan};

/// Shared handle to the single editing session served by this process
#[derive(Clone)]
pub struct AppState {
    editor: Arc<Mutex<EditorController>>,
    pub document_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(floorplan: Floorplan, config: EngineConfig, document_path: Option<PathBuf>) -> Self {
        Self {
            editor: Arc::new(Mutex::new(EditorController::new(floorplan, config))),
            document_path,
        }
    }

    /// Locks the session; a panicked handler does not wedge the server
    pub fn editor(&self) -> MutexGuard<'_, EditorController> {
        self.editor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
