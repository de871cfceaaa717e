//! Error types for capy-apps

use std::path::PathBuf;

/// Catalog query errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("No application directories found")]
    NoApplicationDirectories,

    #[error("Failed to scan {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
