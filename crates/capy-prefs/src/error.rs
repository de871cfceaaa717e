//! Error types for capy-prefs

/// Preference storage errors
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to replace preferences file: {0}")]
    Persist(#[from] tempfile::PersistError),
}
