//! Single-slot transient notifications.
//!
//! At most one notification is visible. Raising a new one replaces the
//! current one and takes over the expiry timer; an older timer can never clear
//! a newer notification because every raise bumps a generation counter.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::events::ControllerEvent;

/// Default time a notification stays visible.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(4000);

/// Notification flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Something worked.
    Success,
    /// Something failed.
    Error,
}

/// A visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Text shown to the user.
    pub message: String,
    /// Flavour.
    pub kind: NotificationKind,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    current: Option<Notification>,
    timer: Option<JoinHandle<()>>,
}

/// Owner of the notification slot.
#[derive(Debug, Clone)]
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    ttl: Duration,
    events: broadcast::Sender<ControllerEvent>,
    shutdown: CancellationToken,
}

impl Notifier {
    /// Create a notifier publishing changes on `events`.
    pub fn new(
        ttl: Duration,
        events: broadcast::Sender<ControllerEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            ttl,
            events,
            shutdown,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Currently visible notification.
    pub fn current(&self) -> Option<Notification> {
        self.lock().current.clone()
    }

    /// Show a success notification.
    pub fn success(&self, message: impl Into<String>) {
        self.raise(NotificationKind::Success, message);
    }

    /// Show an error notification.
    pub fn error(&self, message: impl Into<String>) {
        self.raise(NotificationKind::Error, message);
    }

    /// Show a notification, replacing any visible one.
    ///
    /// Must be called from within a Tokio runtime; the expiry timer is a
    /// spawned task.
    pub fn raise(&self, kind: NotificationKind, message: impl Into<String>) {
        let notification = Notification {
            message: message.into(),
            kind,
        };
        debug!(name: "notification.raised", kind = ?kind, message = %notification.message, "Notification raised");

        let mut slot = self.lock();
        slot.generation += 1;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.current = Some(notification.clone());
        slot.timer = Some(self.spawn_expiry(slot.generation));
        drop(slot);

        let _ = self
            .events
            .send(ControllerEvent::NotificationChanged(Some(notification)));
    }

    /// Hide the visible notification and cancel its expiry.
    pub fn dismiss(&self) {
        let mut slot = self.lock();
        slot.generation += 1;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        let had_one = slot.current.take().is_some();
        drop(slot);

        if had_one {
            let _ = self.events.send(ControllerEvent::NotificationChanged(None));
        }
    }

    fn spawn_expiry(&self, generation: u64) -> JoinHandle<()> {
        let slot = Arc::clone(&self.slot);
        let events = self.events.clone();
        let shutdown = self.shutdown.clone();
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::select! {
                () = shutdown.cancelled() => return,
                () = tokio::time::sleep(ttl) => {}
            }
            let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.generation != generation {
                return;
            }
            slot.current = None;
            slot.timer = None;
            drop(slot);
            let _ = events.send(ControllerEvent::NotificationChanged(None));
        })
    }
}
