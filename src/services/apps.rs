//! Home-screen selection service.
//!
//! Wraps the capy-home engine over the desktop app catalog and the JSON
//! preferences file.

use crate::event_bus::{self, HomeEvent};
use capy_apps::DesktopCatalog;
use capy_home::SelectionEngine;
use capy_prefs::{JsonFilePrefs, default_prefs_path};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast::error::RecvError;

pub type HomeEngine = SelectionEngine<Arc<DesktopCatalog>, JsonFilePrefs>;

/// The engine shared between the loader and the UI. One mutation at a time.
pub type SharedEngine = Arc<Mutex<HomeEngine>>;

/// Create the engine with empty views.
pub fn create_engine() -> SharedEngine {
    let path = default_prefs_path();
    info!("Using preferences at {:?}", path);

    let engine = SelectionEngine::new(Arc::new(DesktopCatalog::new()), JsonFilePrefs::open(path));
    Arc::new(Mutex::new(engine))
}

pub fn lock(engine: &SharedEngine) -> MutexGuard<'_, HomeEngine> {
    engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Forward engine events to the event bus.
/// Must be called from within a tokio runtime.
pub fn start_forwarding(engine: &SharedEngine) {
    let mut rx = lock(engine).subscribe();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => event_bus::send(HomeEvent::Selection(event)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Selection forwarder skipped {} events", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Rescan apps and reload the saved list.
/// Blocks on filesystem I/O, keep it off the render path.
pub fn load(engine: &SharedEngine) {
    lock(engine).load();
}

/// Launch the selected app at `index`. Anything that cannot be launched is ignored.
pub fn launch_selected(engine: &SharedEngine, index: usize) {
    let engine = lock(engine);
    let Some(app) = engine.selected_view().get(index) else {
        debug!("No selected app at position {}", index);
        return;
    };

    capy_apps::launch(engine.catalog(), &app.package_id);
}
