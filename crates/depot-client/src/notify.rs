//! Outcome notifications.
//!
//! The controller reports per-file outcomes through this seam instead of
//! logging directly, so a UI can surface them as toasts while tests record
//! them for assertions.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Success,
    Destructive,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            variant: NotificationVariant::Success,
        }
    }

    pub fn destructive(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Default notifier: emits notifications as tracing events.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Success => {
                tracing::info!(message = %notification.message, "upload notification")
            }
            NotificationVariant::Destructive => {
                tracing::warn!(message = %notification.message, "upload notification")
            }
        }
    }
}
