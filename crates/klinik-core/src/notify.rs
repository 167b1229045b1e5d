//! Single-slot notification channel.

use tracing::debug;

use crate::models::{Notification, NotificationKind};

/// Holds at most one notification. Last write wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NotificationChannel {
    current: Option<Notification>,
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification, replacing any unacknowledged one.
    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>) {
        let notification = Notification {
            kind,
            message: message.into(),
        };
        if let Some(previous) = self.current.replace(notification) {
            debug!(replaced = %previous.message, "notification replaced before dismissal");
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}
