//! Outcome notifications.
//!
//! Every mutating service call reports its outcome to a [`Notifier`]. The default
//! [`TracingNotifier`] turns notices into `tracing` events; [`RecordingNotifier`] keeps
//! them in memory so callers (and tests) can inspect what happened.

use std::sync::Mutex;

/// Severity attached to a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single outcome report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

/// Sink for outcome reports. Delivery is best effort; the core never inspects a result.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);

    fn info(&self, message: &str) {
        self.notify(Severity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.notify(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(Severity::Error, message);
    }
}

/// Forwards notices to the `tracing` subscriber installed by the binary.
#[derive(Clone, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
    }
}

/// Keeps every notice in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every notice received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    /// Messages of the given severity.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.severity == severity)
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        tracing::debug!(?severity, "{message}");
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(Notice {
                severity,
                message: message.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.info("first");
        notifier.warning("second");
        notifier.error("third");

        let notices = notifier.notices();
        assert_eq!(notices.len(), 3);
        assert_eq!(notices[0].severity, Severity::Info);
        assert_eq!(notices[2].message, "third");
        assert_eq!(notifier.messages(Severity::Warning), vec!["second".to_string()]);
    }
}
