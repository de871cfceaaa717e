//! Event bus for cross-thread communication.
//!
//! Design principles:
//! - Broadcast channel (tokio) - all subscribers receive every event
//! - Batch processing (drain all events per frame)
//! - Selection events are kept in order, notification snapshots are
//!   collapsed to the latest one

use capy_home::SelectionEvent;
use std::collections::HashSet;
use std::sync::OnceLock;
use tokio::sync::broadcast::{self, Receiver, Sender};

/// Broadcast channel capacity.
/// Lagging receivers will skip old events.
pub const CHANNEL_CAPACITY: usize = 64;

/// Everything the home screen reacts to.
#[derive(Clone, Debug)]
pub enum HomeEvent {
    Selection(SelectionEvent),
    Notifications(HashSet<String>),
}

static HOME_SENDER: OnceLock<Sender<HomeEvent>> = OnceLock::new();

fn get_sender() -> &'static Sender<HomeEvent> {
    HOME_SENDER.get_or_init(|| {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        tx
    })
}

/// Send an event to all subscribers. Non-blocking.
/// If no receivers, the event is dropped (expected during startup).
#[inline]
pub fn send(event: HomeEvent) {
    let _ = get_sender().send(event);
}

/// Subscribe to the event bus.
pub fn subscribe() -> Receiver<HomeEvent> {
    get_sender().subscribe()
}

/// Drain all pending events, keeping only the latest notification snapshot.
/// Handles RecvError::Lagged by continuing to drain.
pub fn drain_latest(rx: &mut Receiver<HomeEvent>) -> Vec<HomeEvent> {
    let mut events = Vec::new();

    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Empty) => break,
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(broadcast::error::TryRecvError::Closed) => break,
        }
    }

    let last_notifications = events
        .iter()
        .rposition(|e| matches!(e, HomeEvent::Notifications(_)));

    events
        .into_iter()
        .enumerate()
        .filter(|(i, e)| !matches!(e, HomeEvent::Notifications(_)) || Some(*i) == last_notifications)
        .map(|(_, e)| e)
        .collect()
}
