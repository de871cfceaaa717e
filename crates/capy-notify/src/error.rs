//! Error types for capy-notify

/// Notification source errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification access not granted")]
    AccessDenied,

    #[error("Notification listener is not bound")]
    ListenerUnbound,

    #[error("Notification source error: {0}")]
    Source(String),
}
