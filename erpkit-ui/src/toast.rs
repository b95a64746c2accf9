//! Toast notifications for errors that have no field to attach to.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use erpkit_lib::error::ApiError;

/// Default duration for toast notifications.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
///
/// # Example
///
/// ```ignore
/// toasts.push(Toast::error("Connection failed"), Instant::now());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    /// How long to show the toast.
    pub duration: Duration,
}

impl Toast {
    fn with_level(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Error, message)
    }

    /// Set a custom duration for this toast.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Failures worth retrying are warnings; everything else is an error.
impl From<&ApiError> for Toast {
    fn from(err: &ApiError) -> Self {
        let message = err.user_message();
        if err.is_retryable() {
            Toast::warning(message)
        } else {
            Toast::error(message)
        }
    }
}

impl From<String> for Toast {
    fn from(message: String) -> Self {
        Toast::info(message)
    }
}

impl From<&str> for Toast {
    fn from(message: &str) -> Self {
        Toast::info(message)
    }
}

/// Active toasts, oldest first.
#[derive(Debug, Default)]
pub struct Toasts {
    active: VecDeque<(Toast, Instant)>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: impl Into<Toast>, now: Instant) {
        let toast = toast.into();
        log::debug!("Toast {:?}: {}", toast.level, toast.message);
        let expires = now + toast.duration;
        self.active.push_back((toast, expires));
    }

    /// Drop expired toasts.
    pub fn tick(&mut self, now: Instant) {
        self.active.retain(|(_, expires)| *expires > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.active.iter().map(|(toast, _)| toast)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire() {
        let now = Instant::now();
        let mut toasts = Toasts::new();
        toasts.push(Toast::error("Could not reach the server"), now);
        toasts.push(Toast::info("short").with_duration(Duration::from_secs(1)), now);

        toasts.tick(now + Duration::from_secs(2));
        let left: Vec<_> = toasts.iter().map(|t| t.level).collect();
        assert_eq!(left, vec![ToastLevel::Error]);

        toasts.tick(now + DEFAULT_TOAST_DURATION);
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_from_api_error() {
        let toast = Toast::from(&ApiError::http(503, "down"));
        assert_eq!(toast.level, ToastLevel::Warning);
        assert_eq!(toast.message, "Server error (503)");

        let toast = Toast::from(&ApiError::http(404, "No such list"));
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "No such list");
    }
}
