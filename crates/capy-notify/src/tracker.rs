//! Presence tracker implementation

use crate::source::NotificationSource;
use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use tokio::sync::watch;

/// Events delivered by the host's notification listener.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationEvent {
    /// A notification was posted by the given package.
    Posted(String),
    /// A notification of the given package was removed.
    Removed(String),
    /// The user granted (true) or revoked (false) notification access.
    AccessChanged(bool),
}

/// Tracks which packages have active notifications.
///
/// The set is empty until `start` succeeds and after `stop`.
pub struct PresenceTracker {
    source: Arc<dyn NotificationSource>,
    running: AtomicBool,
    active: watch::Sender<HashSet<String>>,
}

impl PresenceTracker {
    pub fn new(source: Arc<dyn NotificationSource>) -> Self {
        let (active, _) = watch::channel(HashSet::new());

        Self {
            source,
            running: AtomicBool::new(false),
            active,
        }
    }

    /// Start tracking if access is granted. Returns whether tracking runs.
    pub fn start(&self) -> bool {
        if !self.source.is_access_granted() {
            info!("Notification access not granted, presence tracking disabled");
            self.running.store(false, Ordering::SeqCst);
            self.publish(HashSet::new());
            return false;
        }

        info!("Starting notification presence tracking...");
        self.running.store(true, Ordering::SeqCst);
        self.refresh();
        true
    }

    /// Stop tracking and forget the current set.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Notification presence tracking stopped");
        }
        self.publish(HashSet::new());
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn on_posted(&self, package_id: &str) {
        debug!("Notification posted by {}", package_id);
        self.refresh();
    }

    pub fn on_removed(&self, package_id: &str) {
        debug!("Notification removed for {}", package_id);
        self.refresh();
    }

    /// Apply one listener event.
    pub fn handle_event(&self, event: NotificationEvent) {
        match event {
            NotificationEvent::Posted(id) => self.on_posted(&id),
            NotificationEvent::Removed(id) => self.on_removed(&id),
            NotificationEvent::AccessChanged(true) => {
                self.start();
            }
            NotificationEvent::AccessChanged(false) => self.stop(),
        }
    }

    /// Current set of packages with notifications.
    pub fn snapshot(&self) -> HashSet<String> {
        self.active.borrow().clone()
    }

    pub fn has_notification(&self, package_id: &str) -> bool {
        self.active.borrow().contains(package_id)
    }

    /// Subscribe to set changes. Receivers only wake when the set differs.
    pub fn subscribe(&self) -> watch::Receiver<HashSet<String>> {
        self.active.subscribe()
    }

    /// Drive the tracker from a listener channel on a background thread.
    /// The thread exits when every sender is dropped.
    pub fn spawn_listener(
        self: &Arc<Self>,
        events: crossbeam_channel::Receiver<NotificationEvent>,
    ) -> JoinHandle<()> {
        let tracker = Arc::clone(self);

        thread::spawn(move || {
            for event in events.iter() {
                tracker.handle_event(event);
            }
            debug!("Notification listener channel closed");
        })
    }

    /// Re-derive the full set from the source.
    /// Source errors keep the last known set.
    fn refresh(&self) {
        if !self.is_running() {
            return;
        }

        match self.source.active_notifications() {
            Ok(list) => {
                let packages = list.into_iter().map(|n| n.package_id).collect();
                self.publish(packages);
            }
            Err(e) => debug!("Keeping last notification set: {}", e),
        }
    }

    fn publish(&self, packages: HashSet<String>) {
        self.active.send_if_modified(|current| {
            if *current == packages {
                return false;
            }
            *current = packages;
            true
        });
    }
}
