//! Notification collaborator: the only user-facing output channel of the core.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotifyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotifyLevel::Info => "info",
            NotifyLevel::Success => "success",
            NotifyLevel::Warning => "warning",
            NotifyLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// Surfaces save/load/substitution outcomes to the user (toast, status bar, ...).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: NotifyLevel);
}

/// Forwards notifications to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, level: NotifyLevel) {
        match level {
            NotifyLevel::Info | NotifyLevel::Success => log::info!("{}", message),
            NotifyLevel::Warning => log::warn!("{}", message),
            NotifyLevel::Error => log::error!("{}", message),
        }
    }
}

/// Keeps every notification in memory, for tests and headless hosts.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(NotifyLevel, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all recorded notifications, oldest first.
    pub fn take(&self) -> Vec<(NotifyLevel, String)> {
        std::mem::take(&mut *self.messages())
    }

    /// The message list stays usable after a panicking writer poisons the lock.
    fn messages(&self) -> MutexGuard<'_, Vec<(NotifyLevel, String)>> {
        self.messages.lock().unwrap_or_else(|poisoned| {
            log::warn!("Notification log lock poisoned; recovering");
            poisoned.into_inner()
        })
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, level: NotifyLevel) {
        self.messages().push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.notify("Saved", NotifyLevel::Success);
        notifier.notify("Oops", NotifyLevel::Error);
        let messages = notifier.take();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], (NotifyLevel::Error, "Oops".to_string()));
        assert!(notifier.take().is_empty());
    }

    #[test]
    fn test_recording_survives_poisoned_lock() {
        let notifier = std::sync::Arc::new(RecordingNotifier::new());
        notifier.notify("Before", NotifyLevel::Info);

        let holder = notifier.clone();
        let result = std::thread::spawn(move || {
            let _guard = holder.messages.lock().unwrap();
            panic!("writer died");
        })
        .join();
        assert!(result.is_err());
        assert!(notifier.messages.is_poisoned());

        notifier.notify("After", NotifyLevel::Warning);
        let messages = notifier.take();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], (NotifyLevel::Warning, "After".to_string()));
    }

    #[test]
    fn test_level_display() {
        assert_eq!(NotifyLevel::Warning.to_string(), "warning");
    }
}
