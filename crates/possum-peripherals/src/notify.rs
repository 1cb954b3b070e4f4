//! User-facing alerts and notifications.
//!
//! Peripheral actions report to the cashier through a [`Notifier`]: a modal
//! alert when an action is aborted, a transient notification (optionally
//! with a chime) when a fallback was used.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{info, warn};

/// How long the cash drawer notification stays on screen.
pub const DRAWER_NOTIFICATION_MS: u64 = 3_000;

/// Transient on-screen notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,

    /// Play the audible cue with the notification.
    pub chime: bool,

    pub duration: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            chime: false,
            duration: Duration::from_millis(DRAWER_NOTIFICATION_MS),
        }
    }

    pub fn with_chime(mut self) -> Self {
        self.chime = true;
        self
    }

    /// Shown when the drawer could not be kicked over serial.
    pub fn cash_drawer_opened() -> Self {
        Self::new("Cash drawer opened").with_chime()
    }
}

/// Sink for cashier-facing messages.
///
/// Implementations must not fail; presentation errors are theirs to swallow.
pub trait Notifier: Send + Sync {
    /// Modal alert the cashier has to dismiss.
    fn alert(&self, message: &str);

    /// Transient notification.
    fn notify(&self, notification: &Notification);
}

/// Notifier writing to the log only, for headless terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        warn!(message, "Cashier alert");
    }

    fn notify(&self, notification: &Notification) {
        info!(
            message = %notification.message,
            chime = notification.chime,
            "Cashier notification"
        );
    }
}

/// Something a [`RecordingNotifier`] was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Alert(String),
    Notification(Notification),
}

/// Notifier remembering everything it was asked to show.
///
/// Clones share the same record.
///
/// # Examples
///
/// ```
/// use possum_peripherals::notify::{Notice, Notifier, RecordingNotifier};
///
/// let notifier = RecordingNotifier::new();
/// notifier.alert("Receipt content not found");
/// assert_eq!(
///     notifier.notices(),
///     vec![Notice::Alert("Receipt content not found".into())]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|notice| match notice {
                Notice::Alert(message) => Some(message),
                Notice::Notification(_) => None,
            })
            .collect()
    }

    fn record(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.record(Notice::Alert(message.to_string()));
    }

    fn notify(&self, notification: &Notification) {
        self.record(Notice::Notification(notification.clone()));
    }
}
