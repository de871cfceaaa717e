//! capy-notify - Notification presence tracking
//!
//! Keeps the set of package ids that currently have at least one active
//! notification. Every posted/removed event re-reads the full list from the
//! source instead of patching the set, so missed events cannot cause drift.

pub mod error;
pub mod source;
pub mod tracker;

pub use error::NotifyError;
pub use source::{ActiveNotification, NotificationSource, UnavailableSource};
pub use tracker::{NotificationEvent, PresenceTracker};
