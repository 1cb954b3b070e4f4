//! Cash drawer action.

use possum_hardware::CashDrawer;
use tracing::{debug, info, warn};

use crate::notify::{Notification, Notifier};

/// How the cashier was given access to the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerOutcome {
    /// The kick pulse was written to the drawer.
    Kicked,
    /// No drawer could be kicked; the cashier was notified instead.
    Notified,
}

/// Kick the drawer, falling back to an on-screen notification.
///
/// Never fails: a missing drawer or a failed kick ends in the notification.
pub async fn open_cash_drawer<D>(drawer: Option<&mut D>, notifier: &dyn Notifier) -> DrawerOutcome
where
    D: CashDrawer,
{
    match drawer {
        Some(drawer) => match drawer.open().await {
            Ok(()) => {
                info!("Cash drawer kicked");
                return DrawerOutcome::Kicked;
            }
            Err(err) => warn!(error = %err, "Cash drawer kick failed, notifying instead"),
        },
        None => debug!("No cash drawer configured, notifying instead"),
    }

    notifier.notify(&Notification::cash_drawer_opened());
    DrawerOutcome::Notified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Notice, RecordingNotifier};
    use possum_hardware::mock::MockCashDrawer;

    #[tokio::test]
    async fn test_kick_without_notification() {
        let (mut drawer, handle) = MockCashDrawer::new();
        let notifier = RecordingNotifier::new();

        let outcome = open_cash_drawer(Some(&mut drawer), &notifier).await;

        assert_eq!(outcome, DrawerOutcome::Kicked);
        assert_eq!(handle.open_count(), 1);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_failed_kick_notifies() {
        let (mut drawer, handle) = MockCashDrawer::new();
        handle.fail(true);
        let notifier = RecordingNotifier::new();

        let outcome = open_cash_drawer(Some(&mut drawer), &notifier).await;

        assert_eq!(outcome, DrawerOutcome::Notified);
        assert_eq!(
            notifier.notices(),
            vec![Notice::Notification(Notification::cash_drawer_opened())]
        );
    }

    #[tokio::test]
    async fn test_missing_drawer_notifies() {
        let notifier = RecordingNotifier::new();

        let outcome = open_cash_drawer::<MockCashDrawer>(None, &notifier).await;

        assert_eq!(outcome, DrawerOutcome::Notified);
        assert_eq!(notifier.notices().len(), 1);
    }
}
