//! The ordered list of home-screen apps and its legacy-format migration.

use crate::backend::PrefsBackend;
use crate::error::PrefsError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Key of the ordered JSON list.
pub const SAVED_APPS_KEY: &str = "saved_apps_list";

/// Key of the old unordered set of package ids.
pub const LEGACY_SELECTED_KEY: &str = "selected_apps";

/// One persisted home-screen app, in launch order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEntry {
    #[serde(alias = "packageName")]
    pub package_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
}

impl SavedEntry {
    pub fn new(package_id: impl Into<String>, custom_label: Option<String>) -> Self {
        Self {
            package_id: package_id.into(),
            custom_label,
        }
    }
}

/// Keep the first entry for each package id.
fn dedup_by_package(entries: impl IntoIterator<Item = SavedEntry>) -> Vec<SavedEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| {
            let first = seen.insert(entry.package_id.clone());
            if !first {
                warn!("Dropping duplicate saved app {}", entry.package_id);
            }
            first
        })
        .collect()
}

/// Reads and writes the saved app list on top of a preferences backend.
pub struct SavedAppsStore<B> {
    backend: B,
}

impl<B: PrefsBackend> SavedAppsStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the saved list in stored order.
    /// Missing or malformed data reads as an empty list.
    pub fn load(&self) -> Vec<SavedEntry> {
        let Some(json) = self.backend.get_string(SAVED_APPS_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<SavedEntry>>(&json) {
            Ok(entries) => dedup_by_package(entries),
            Err(e) => {
                warn!("Ignoring malformed saved app list: {}", e);
                Vec::new()
            }
        }
    }

    /// Replace the saved list.
    pub fn save(&self, entries: &[SavedEntry]) -> Result<(), PrefsError> {
        let entries = dedup_by_package(entries.iter().cloned());
        let json = serde_json::to_string(&entries)?;
        self.backend.put_string(SAVED_APPS_KEY, &json)
    }

    /// Convert the legacy id set into the ordered list, once.
    /// Returns true if a migration happened.
    pub fn migrate_legacy_if_needed(&self) -> Result<bool, PrefsError> {
        if self.backend.contains(SAVED_APPS_KEY) || !self.backend.contains(LEGACY_SELECTED_KEY) {
            return Ok(false);
        }

        let legacy = self
            .backend
            .get_string_set(LEGACY_SELECTED_KEY)
            .unwrap_or_default();

        // The legacy set has no order; BTreeSet iteration keeps it deterministic.
        let entries: Vec<SavedEntry> = legacy
            .into_iter()
            .map(|id| SavedEntry::new(id, None))
            .collect();

        self.save(&entries)?;
        self.backend.remove(LEGACY_SELECTED_KEY)?;

        info!("Migrated {} apps from the legacy selection", entries.len());
        Ok(true)
    }
}
