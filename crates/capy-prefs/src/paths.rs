//! Location of the preferences file.

use std::path::PathBuf;

/// Environment variable overriding the preferences file location.
pub const PREFS_PATH_ENV: &str = "CAPY_LAUNCHER_PREFS";

/// Resolve the preferences file path.
/// Usually ~/.local/share/capy-launcher/prefs.json
pub fn default_prefs_path() -> PathBuf {
    if let Ok(path) = std::env::var(PREFS_PATH_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    let data_dir = dirs::data_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_default()
            .join(".local")
            .join("share")
    });

    data_dir.join("capy-launcher").join("prefs.json")
}
