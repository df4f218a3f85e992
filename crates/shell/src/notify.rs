//! Fire-and-forget user notifications (toasts).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn login_succeeded() -> Self {
        Self::success("Login successful")
    }

    pub fn login_rejected() -> Self {
        Self::error("Invalid credentials")
    }

    pub fn login_failed() -> Self {
        Self::error("Login failed. Please try again.")
    }

    pub fn logged_out() -> Self {
        Self::success("Logged out successfully")
    }
}

/// Notification sink. The shell never tracks what happens to a notification
/// after handing it over.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log (headless use).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::warn!(text = %notification.message, "notification"),
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(text = %notification.message, "notification")
            }
        }
    }
}

/// Keeps every notification; used in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: std::rc::Rc<std::cell::RefCell<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<Notification> {
        self.seen.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.borrow_mut().push(notification);
    }
}
