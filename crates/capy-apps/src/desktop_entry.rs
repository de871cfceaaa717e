//! Desktop entry parsing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A launchable application parsed from a .desktop file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesktopApp {
    /// Desktop file id, e.g. "firefox.desktop".
    pub id: String,
    pub name: String,
    pub exec: String,
    pub no_display: bool,
    pub hidden: bool,
    pub desktop_file_path: PathBuf,
}

impl DesktopApp {
    /// Whether the entry should show up in a launcher.
    pub fn is_launchable(&self) -> bool {
        !self.no_display && !self.hidden && !self.exec.trim().is_empty()
    }
}

/// Compute the XDG desktop file id of `path` relative to the applications
/// directory `base`: "kde4/konsole.desktop" becomes "kde4-konsole.desktop".
pub fn desktop_file_id(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        return None;
    }

    Some(parts.join("-"))
}

/// Parse a .desktop file into a DesktopApp struct.
pub fn parse_desktop_file(base: &Path, path: &Path) -> Option<DesktopApp> {
    let content = fs::read_to_string(path).ok()?;
    let id = desktop_file_id(base, path)?;
    parse_desktop_entry(&id, &content, path)
}

/// Parse the `[Desktop Entry]` group of `content`.
/// Returns None unless the entry is an Application with a Name and Exec.
pub fn parse_desktop_entry(id: &str, content: &str, path: &Path) -> Option<DesktopApp> {
    let mut entries = HashMap::new();
    let mut in_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            in_desktop_entry = line == "[Desktop Entry]";
            continue;
        }

        if in_desktop_entry {
            if let Some((key, value)) = line.split_once('=') {
                // Localized keys (Name[de]=...) are ignored; the first plain key wins.
                entries
                    .entry(key.trim().to_string())
                    .or_insert_with(|| value.trim().to_string());
            }
        }
    }

    if entries.get("Type").map(|s| s.as_str()) != Some("Application") {
        return None;
    }

    let name = entries.get("Name")?.clone();
    let exec = entries.get("Exec")?.clone();

    Some(DesktopApp {
        id: id.to_string(),
        name,
        exec,
        no_display: entries
            .get("NoDisplay")
            .map(|s| s == "true")
            .unwrap_or(false),
        hidden: entries.get("Hidden").map(|s| s == "true").unwrap_or(false),
        desktop_file_path: path.to_path_buf(),
    })
}
