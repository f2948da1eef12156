//! User-visible notifications and the bus that carries them.
//!
//! Every completed session operation publishes exactly one [`Notification`].
//! Presentation layers (toasts, status bars, logs) subscribe independently
//! through [`NotificationBus::subscribe`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::defaults::NOTIFICATION_CAPACITY;

/// Outcome class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A short message describing the outcome of one operation.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Unique notification identifier (UUIDv7 for temporal ordering).
    pub id: Uuid,
    pub kind: NotificationKind,
    /// Short heading, "Success" or "Error".
    pub title: String,
    /// Human-readable description.
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, "Success", description)
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, "Error", description)
    }

    fn new(kind: NotificationKind, title: &str, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            title: title.to_string(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

/// Broadcast bus for notifications.
///
/// Cloning is cheap; all clones publish into the same channel.
#[derive(Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<Notification>,
}

impl NotificationBus {
    /// Create a new bus with the given per-subscriber buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish a notification. Having no subscribers is not an error.
    pub fn emit(&self, notification: Notification) {
        tracing::debug!(
            kind = ?notification.kind,
            description = %notification.description,
            "Notification emitted"
        );
        let _ = self.tx.send(notification);
    }

    /// Subscribe to notifications published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(NOTIFICATION_CAPACITY)
    }
}
