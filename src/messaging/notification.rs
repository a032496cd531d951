// Notifications - problems the scheduler recovered from, reported to the UI

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Playback continued, but not exactly as scheduled
    Warning,
    /// A sound was lost
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    /// A sound emission failed at dispatch time
    Trigger,
    /// The poll loop fell behind and skipped steps
    Scheduler,
}

/// One recovered problem
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    pub message: String,
    /// Output-clock time the problem concerns (a due time, or the poll time)
    pub at: f64,
    /// Wall-clock Unix time in milliseconds
    pub timestamp: u64,
}

impl Notification {
    fn new(
        level: NotificationLevel,
        category: NotificationCategory,
        at: f64,
        message: String,
    ) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            level,
            category,
            message,
            at,
            timestamp,
        }
    }

    pub fn warning(category: NotificationCategory, at: f64, message: String) -> Self {
        Self::new(NotificationLevel::Warning, category, at, message)
    }

    pub fn error(category: NotificationCategory, at: f64, message: String) -> Self {
        Self::new(NotificationLevel::Error, category, at, message)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        write!(f, "[{} @ {:.3}s] {}", level, self.at, self.message)
    }
}
