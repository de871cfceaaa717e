//! Notification presence service.
//!
//! Owns the presence tracker and its listener thread. Desktop hosts expose no
//! active-notification query, so the tracker runs on `UnavailableSource` and
//! stays empty until a host source is plugged in.

use crate::event_bus::{self, HomeEvent};
use capy_notify::{NotificationEvent, PresenceTracker, UnavailableSource};
use log::debug;
use std::sync::Arc;

pub struct NotificationService {
    pub tracker: Arc<PresenceTracker>,
    listener: crossbeam_channel::Sender<NotificationEvent>,
}

impl NotificationService {
    /// Revoke tracking; the listener thread clears the set.
    pub fn stop(&self) {
        if self
            .listener
            .send(NotificationEvent::AccessChanged(false))
            .is_err()
        {
            debug!("Notification listener already gone");
        }
    }
}

/// Start the tracker, its listener thread and the bus forwarder.
/// Must be called from within a tokio runtime.
pub fn start() -> NotificationService {
    let tracker = Arc::new(PresenceTracker::new(Arc::new(UnavailableSource)));
    let (tx, rx) = crossbeam_channel::unbounded();
    tracker.spawn_listener(rx);

    let mut changes = tracker.subscribe();
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let active = changes.borrow_and_update().clone();
            event_bus::send(HomeEvent::Notifications(active));
        }
    });

    tracker.start();

    NotificationService {
        tracker,
        listener: tx,
    }
}
