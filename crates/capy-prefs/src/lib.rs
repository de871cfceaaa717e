//! capy-prefs: Durable launcher preferences.
//!
//! - `PrefsBackend`: string-keyed storage (JSON file or in-memory)
//! - `SavedAppsStore`: the ordered home-screen app list, with a one-time
//!   migration from the legacy unordered id set

mod backend;
mod error;
mod paths;
mod saved_apps;

pub use backend::{JsonFilePrefs, MemoryPrefs, PrefValue, PrefsBackend};
pub use error::PrefsError;
pub use paths::{PREFS_PATH_ENV, default_prefs_path};
pub use saved_apps::{LEGACY_SELECTED_KEY, SAVED_APPS_KEY, SavedAppsStore, SavedEntry};
