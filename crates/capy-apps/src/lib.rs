//! capy-apps: Launchable application catalog for Linux desktops.
//!
//! Provides:
//! - Desktop application catalog parsing from .desktop files
//! - XDG precedence rules (user entries override and hide system ones)
//! - Launching an app by its desktop file id

mod catalog;
mod desktop_entry;
mod error;
mod launch;
mod paths;

pub use catalog::{CatalogReader, DesktopCatalog, LaunchableApp};
pub use desktop_entry::DesktopApp;
pub use error::CatalogError;
pub use launch::{exec_to_argv, launch, try_launch};
pub use paths::get_application_directories;
