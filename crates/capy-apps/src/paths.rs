//! Path helpers for XDG application directories.

use std::path::PathBuf;

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default()
}

/// Get all application .desktop file directories, highest precedence first.
pub fn get_application_directories() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let home = home_dir();
    let xdg_data_home = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home.join(".local/share"));
    let xdg_data_dirs = std::env::var("XDG_DATA_DIRS")
        .unwrap_or_else(|_| "/usr/local/share:/usr/share".to_string());

    dirs.push(xdg_data_home.join("applications"));

    for data_dir in xdg_data_dirs.split(':') {
        if !data_dir.is_empty() {
            dirs.push(PathBuf::from(data_dir).join("applications"));
        }
    }

    dirs.push(home.join(".local/share/flatpak/exports/share/applications"));
    dirs.push(PathBuf::from("/var/lib/flatpak/exports/share/applications"));
    dirs.push(PathBuf::from("/var/lib/snapd/desktop/applications"));

    // XDG_DATA_DIRS may already list the flatpak exports.
    let mut seen = std::collections::HashSet::new();
    dirs.retain(|d| seen.insert(d.clone()));

    dirs
}
