//! Shared services for capy-launcher.
//!
//! - `apps` - selection engine over the desktop catalog and saved list
//! - `notifications` - which apps have active notifications

pub mod apps;
pub mod notifications;

use log::info;

/// Running services, owned by main.
pub struct Services {
    pub home: apps::SharedEngine,
    pub notifications: notifications::NotificationService,
}

/// Start all shared background services.
/// Call this once from main, inside the tokio runtime.
pub fn start_all() -> Services {
    info!("Starting shared services...");

    let home = apps::create_engine();
    apps::start_forwarding(&home);
    let notifications = notifications::start();

    Services {
        home,
        notifications,
    }
}
