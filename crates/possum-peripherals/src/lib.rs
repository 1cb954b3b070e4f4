//! Receipt printing and cash drawer actions requested by the server.
//!
//! Both actions are fire-and-forget. A print that cannot happen alerts the
//! cashier and is dropped; a drawer that cannot be kicked is replaced by an
//! on-screen notification. Neither is retried.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use possum_hardware::mock::MockPrinter;
//! use possum_peripherals::notify::RecordingNotifier;
//! use possum_peripherals::{ActionOutcome, PeripheralActions, SharedReceipt};
//!
//! #[tokio::main]
//! async fn main() -> possum_peripherals::Result<()> {
//!     let notifier = RecordingNotifier::new();
//!     let (printer, _jobs) = MockPrinter::new();
//!     let mut actions =
//!         PeripheralActions::new(SharedReceipt::new(), printer, Arc::new(notifier.clone()));
//!
//!     let outcome = actions.handle_json(r#"{"event":"open_cash_drawer"}"#).await?;
//!     assert!(matches!(outcome, ActionOutcome::DrawerNotified));
//!     assert_eq!(notifier.notices().len(), 1);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod drawer;
pub mod error;
pub mod notify;
pub mod print;

pub use config::PeripheralConfig;
pub use dispatch::{ActionOutcome, PeripheralActions};
pub use drawer::{DrawerOutcome, open_cash_drawer};
pub use error::{ActionError, Result};
pub use notify::{LogNotifier, Notification, Notifier};
pub use print::{ReceiptSource, SharedReceipt, build_print_job, print_receipt};
