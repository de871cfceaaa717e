//! Core types for capy-home

/// An installed app as shown by the launcher, joined with saved state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppRecord {
    /// Label reported by the catalog.
    pub label: String,
    pub package_id: String,
    /// User-chosen name, if any.
    pub custom_label: Option<String>,
    pub is_selected: bool,
}

impl AppRecord {
    pub fn display_name(&self) -> &str {
        self.custom_label.as_deref().unwrap_or(&self.label)
    }
}

/// Why a mutation left the state untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No installed app has this package id.
    UnknownApp,
    /// Selecting would exceed the selection limit.
    SelectionFull,
    /// A reorder index is outside the selected list.
    IndexOutOfRange,
    /// Reorder of a position with itself.
    SamePosition,
}

/// Outcome of a mutation. Ignored requests are not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    Applied,
    Ignored(IgnoreReason),
}

impl Change {
    pub fn is_applied(&self) -> bool {
        matches!(self, Change::Applied)
    }
}

/// Events broadcast after the views change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    Loaded { catalog: usize, selected: usize },
    SelectionChanged { package_id: String, selected: bool },
    Reordered { from: usize, to: usize },
    Renamed { package_id: String, custom_label: Option<String> },
}
