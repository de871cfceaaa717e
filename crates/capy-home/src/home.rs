//! Presentation helpers for the home and settings screens.

use crate::engine::MAX_SELECTED;
use crate::record::AppRecord;
use std::collections::HashSet;

/// Shown on the home screen when no app is selected.
pub const EMPTY_HOME_MESSAGE: &str = "No apps selected.\nOpen settings to add apps.";

/// Shown when the user tries to select past the limit.
pub const CAP_REACHED_MESSAGE: &str = "Maximum 10 apps allowed";

/// Marker drawn after an app that has notifications.
pub const NOTIFICATION_MARKER: &str = "⋮";

/// One line of the home screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeEntry {
    pub package_id: String,
    /// Lower-cased display name.
    pub title: String,
    pub has_notification: bool,
}

impl HomeEntry {
    /// Plain-text rendering, e.g. "mail ⋮".
    pub fn render(&self) -> String {
        if self.has_notification {
            format!("{} {}", self.title, NOTIFICATION_MARKER)
        } else {
            self.title.clone()
        }
    }
}

/// Build the home list from the selected apps and the notification set.
pub fn home_entries(selected: &[AppRecord], active: &HashSet<String>) -> Vec<HomeEntry> {
    selected
        .iter()
        .map(|app| HomeEntry {
            package_id: app.package_id.clone(),
            title: app.display_name().to_lowercase(),
            has_notification: active.contains(&app.package_id),
        })
        .collect()
}

/// Settings header, e.g. "Select Apps (3/10)".
pub fn selection_header(count: usize) -> String {
    format!("Select Apps ({}/{})", count, MAX_SELECTED)
}

/// Which move buttons a selected row offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReorderControls {
    pub can_move_up: bool,
    pub can_move_down: bool,
}

pub fn reorder_controls(index: usize, len: usize) -> ReorderControls {
    ReorderControls {
        can_move_up: index > 0 && index < len,
        can_move_down: index.saturating_add(1) < len,
    }
}

/// Initial text of the rename dialog.
pub fn rename_prefill(app: &AppRecord) -> &str {
    app.display_name()
}
