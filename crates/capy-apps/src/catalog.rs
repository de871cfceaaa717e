//! App Catalog implementation.

use crate::desktop_entry::{DesktopApp, parse_desktop_file};
use crate::error::CatalogError;
use crate::paths::get_application_directories;
use log::{debug, info, warn};

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A launchable application as seen by the home screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchableApp {
    pub package_id: String,
    pub label: String,
}

/// Read-only view of the applications the host can launch.
pub trait CatalogReader {
    /// Query every launchable application, deduplicated by package id.
    fn query_launchable_apps(&self) -> Result<Vec<LaunchableApp>, CatalogError>;
}

impl<T: CatalogReader + ?Sized> CatalogReader for Arc<T> {
    fn query_launchable_apps(&self) -> Result<Vec<LaunchableApp>, CatalogError> {
        (**self).query_launchable_apps()
    }
}

/// The desktop-entry backed application catalog.
pub struct DesktopCatalog {
    /// Directories scanned, highest precedence first.
    directories: Vec<PathBuf>,
    /// Launchable apps from the last query, indexed by desktop file id.
    apps: RwLock<HashMap<String, DesktopApp>>,
}

impl DesktopCatalog {
    /// Catalog over the standard XDG application directories.
    pub fn new() -> Self {
        Self::with_directories(get_application_directories())
    }

    /// Catalog over an explicit list of directories, highest precedence first.
    pub fn with_directories(directories: Vec<PathBuf>) -> Self {
        Self {
            directories,
            apps: RwLock::new(HashMap::new()),
        }
    }

    /// Get app details by ID from the last query.
    pub fn get_app(&self, id: &str) -> Option<DesktopApp> {
        self.apps.read().unwrap().get(id).cloned()
    }

    fn scan_desktop_files(&self) -> Result<Vec<DesktopApp>, CatalogError> {
        let mut found_any_dir = false;
        let mut scanned_any_dir = false;
        let mut last_error = None;
        // Ids claimed so far, including hidden ones: a hidden user entry masks
        // the system entry with the same id.
        let mut claimed = HashSet::new();
        let mut ordered = Vec::new();

        for dir in &self.directories {
            if !dir.is_dir() {
                continue;
            }
            found_any_dir = true;

            match scan_directory(dir, &mut claimed, &mut ordered) {
                Ok(()) => scanned_any_dir = true,
                Err(e) => {
                    warn!("Skipping unreadable application directory {:?}: {}", dir, e);
                    last_error = Some(CatalogError::Walk {
                        path: dir.clone(),
                        source: e,
                    });
                }
            }
        }

        if !found_any_dir {
            return Err(CatalogError::NoApplicationDirectories);
        }
        if !scanned_any_dir {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        Ok(ordered)
    }
}

/// Scan one directory, appending apps whose id is not claimed yet.
/// Fails only if `dir` itself cannot be read.
fn scan_directory(
    dir: &Path,
    claimed: &mut HashSet<String>,
    ordered: &mut Vec<DesktopApp>,
) -> Result<(), walkdir::Error> {
    let walker = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .max_depth(3)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e),
            Err(e) => {
                debug!("Skipping unreadable entry in {:?}: {}", dir, e);
                continue;
            }
        };

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("desktop") {
            continue;
        }

        let Some(app) = parse_desktop_file(dir, path) else {
            continue;
        };

        if !claimed.insert(app.id.clone()) {
            debug!("Duplicate desktop id {} at {:?}, keeping first", app.id, path);
            continue;
        }

        if app.is_launchable() {
            ordered.push(app);
        }
    }

    Ok(())
}

impl Default for DesktopCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogReader for DesktopCatalog {
    fn query_launchable_apps(&self) -> Result<Vec<LaunchableApp>, CatalogError> {
        info!("Scanning app catalog...");

        let apps = match self.scan_desktop_files() {
            Ok(apps) => apps,
            Err(e) => {
                warn!("App catalog scan failed: {}", e);
                return Err(e);
            }
        };

        let launchable = apps
            .iter()
            .map(|app| LaunchableApp {
                package_id: app.id.clone(),
                label: app.name.clone(),
            })
            .collect::<Vec<_>>();

        *self.apps.write().unwrap() = apps.into_iter().map(|a| (a.id.clone(), a)).collect();

        info!("App catalog scan complete: {} apps.", launchable.len());
        Ok(launchable)
    }
}
