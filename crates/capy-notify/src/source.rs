//! The host side of notification tracking.

use crate::error::NotifyError;

/// A notification currently shown by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveNotification {
    /// Package id of the app that posted it.
    pub package_id: String,
    /// Host-specific notification key.
    pub key: String,
}

impl ActiveNotification {
    pub fn new(package_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            key: key.into(),
        }
    }
}

/// Something that can list the host's active notifications.
pub trait NotificationSource: Send + Sync {
    /// Whether the user granted notification access.
    fn is_access_granted(&self) -> bool;

    /// The full list of currently active notifications.
    fn active_notifications(&self) -> Result<Vec<ActiveNotification>, NotifyError>;
}

/// Source for hosts without a notification listener. Access is never granted.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableSource;

impl NotificationSource for UnavailableSource {
    fn is_access_granted(&self) -> bool {
        false
    }

    fn active_notifications(&self) -> Result<Vec<ActiveNotification>, NotifyError> {
        Err(NotifyError::AccessDenied)
    }
}
