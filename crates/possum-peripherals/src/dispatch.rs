//! Inbound message dispatch for peripheral actions.

use std::sync::Arc;

use possum_core::InboundMessage;
use possum_hardware::{AnyCashDrawer, AnyReceiptPrinter, CashDrawer, DeviceInfo, ReceiptPrinter};
use tracing::{debug, info, warn};

use crate::config::PeripheralConfig;
use crate::drawer::{DrawerOutcome, open_cash_drawer};
use crate::error::{ActionError, Result};
use crate::notify::Notifier;
use crate::print::{ReceiptSource, print_receipt};

/// What handling a message did.
#[derive(Debug)]
pub enum ActionOutcome {
    Printed,
    /// The print was aborted; the cashier has been alerted.
    PrintAborted(ActionError),
    DrawerKicked,
    DrawerNotified,
    /// The message is not a peripheral action.
    Ignored,
}

/// Executes `print_receipt` and `open_cash_drawer` requests.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use possum_core::InboundMessage;
/// use possum_hardware::mock::MockPrinter;
/// use possum_peripherals::notify::LogNotifier;
/// use possum_peripherals::{ActionOutcome, PeripheralActions, SharedReceipt};
///
/// #[tokio::main]
/// async fn main() {
///     let receipt = SharedReceipt::new();
///     let (printer, jobs) = MockPrinter::new();
///     let mut actions = PeripheralActions::new(receipt.clone(), printer, Arc::new(LogNotifier));
///
///     receipt.set("<p>Total: KSh 100</p>");
///     let outcome = actions.handle(&InboundMessage::PrintReceipt).await;
///
///     assert!(matches!(outcome, ActionOutcome::Printed));
///     assert_eq!(jobs.jobs()[0].text, "Total: KSh 100");
/// }
/// ```
pub struct PeripheralActions<S, P> {
    source: S,
    printer: P,
    drawer: Option<AnyCashDrawer>,
    notifier: Arc<dyn Notifier>,
}

impl<S: ReceiptSource, P: ReceiptPrinter> PeripheralActions<S, P> {
    /// Actions without a cash drawer.
    pub fn new(source: S, printer: P, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            source,
            printer,
            drawer: None,
            notifier,
        }
    }

    pub fn with_drawer(mut self, drawer: AnyCashDrawer) -> Self {
        self.drawer = Some(drawer);
        self
    }

    pub fn has_drawer(&self) -> bool {
        self.drawer.is_some()
    }

    pub fn printer(&self) -> &P {
        &self.printer
    }

    /// Printer and drawer descriptions, for diagnostics.
    ///
    /// Devices that cannot describe themselves are left out.
    pub async fn devices(&self) -> Vec<DeviceInfo> {
        let mut devices = Vec::new();
        match self.printer.get_info().await {
            Ok(info) => devices.push(info),
            Err(e) => warn!(error = %e, "Printer info unavailable"),
        }
        if let Some(drawer) = &self.drawer {
            match drawer.get_info().await {
                Ok(info) => devices.push(info),
                Err(e) => warn!(error = %e, "Cash drawer info unavailable"),
            }
        }
        devices
    }

    /// Run the action requested by `message`.
    pub async fn handle(&mut self, message: &InboundMessage) -> ActionOutcome {
        match message {
            InboundMessage::PrintReceipt => {
                match print_receipt(&self.source, &mut self.printer, self.notifier.as_ref()).await
                {
                    Ok(()) => ActionOutcome::Printed,
                    Err(err) => ActionOutcome::PrintAborted(err),
                }
            }
            InboundMessage::OpenCashDrawer => {
                match open_cash_drawer(self.drawer.as_mut(), self.notifier.as_ref()).await {
                    DrawerOutcome::Kicked => ActionOutcome::DrawerKicked,
                    DrawerOutcome::Notified => ActionOutcome::DrawerNotified,
                }
            }
            InboundMessage::ScanSuccess => {
                debug!(event = message.event_name(), "Not a peripheral action");
                ActionOutcome::Ignored
            }
        }
    }

    /// Decode a server message and run its action.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::Message` if the message cannot be decoded.
    pub async fn handle_json(&mut self, json: &str) -> Result<ActionOutcome> {
        let message = InboundMessage::from_json(json).inspect_err(|err| {
            warn!(error = %err, "Dropping undecodable server message");
        })?;
        Ok(self.handle(&message).await)
    }
}

impl<S: ReceiptSource> PeripheralActions<S, AnyReceiptPrinter> {
    /// Actions with the devices described by `config`.
    ///
    /// A configured serial printer replaces `printer`; without a `printer`
    /// section, `printer` is used.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::Message` wrapping the configuration error.
    pub fn from_config(
        config: &PeripheralConfig,
        source: S,
        printer: AnyReceiptPrinter,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        config.validate()?;

        let printer = match config.receipt_printer()? {
            Some(serial) => {
                info!("Printing receipts on the configured serial printer");
                serial
            }
            None => printer,
        };

        let mut actions = Self::new(source, printer, notifier);
        actions.drawer = config.cash_drawer()?;
        Ok(actions)
    }
}
