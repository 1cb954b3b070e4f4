//! Mock receipt printer.
//!
//! Records submitted jobs and can refuse them, simulating a print window
//! blocked by the host.

use crate::{
    HardwareError, Result,
    traits::ReceiptPrinter,
    types::{DeviceInfo, PrintJob},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct PrinterState {
    blocked: AtomicBool,
    jobs: Mutex<Vec<PrintJob>>,
}

/// Mock receipt printer for testing and development.
///
/// # Examples
///
/// ```
/// use possum_hardware::mock::MockPrinter;
/// use possum_hardware::traits::ReceiptPrinter;
/// use possum_hardware::types::PrintJob;
///
/// #[tokio::main]
/// async fn main() -> possum_hardware::Result<()> {
///     let (mut printer, handle) = MockPrinter::new();
///     let job = PrintJob {
///         title: "Receipt".into(),
///         html: "<p>Total 100</p>".into(),
///         text: "Total 100".into(),
///     };
///
///     printer.print(&job).await?;
///     assert_eq!(handle.jobs().len(), 1);
///
///     handle.block(true);
///     assert!(printer.print(&job).await.is_err());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockPrinter {
    name: String,
    state: Arc<PrinterState>,
}

impl MockPrinter {
    pub fn new() -> (Self, MockPrinterHandle) {
        Self::with_name("Mock Printer".to_string())
    }

    pub fn with_name(name: String) -> (Self, MockPrinterHandle) {
        let state = Arc::new(PrinterState::default());
        let printer = Self {
            name,
            state: Arc::clone(&state),
        };
        (printer, MockPrinterHandle { state })
    }
}

impl Default for MockPrinter {
    fn default() -> Self {
        Self::new().0
    }
}

impl ReceiptPrinter for MockPrinter {
    async fn print(&mut self, job: &PrintJob) -> Result<()> {
        if self.state.blocked.load(Ordering::SeqCst) {
            return Err(HardwareError::target_unavailable(format!(
                "{} refused the print window",
                self.name
            )));
        }

        self.state
            .jobs
            .lock()
            .map_err(|_| HardwareError::other("printer job log poisoned"))?
            .push(job.clone());
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock Printer v1.0"))
    }
}

/// Handle for inspecting and controlling a mock printer.
#[derive(Debug, Clone)]
pub struct MockPrinterHandle {
    state: Arc<PrinterState>,
}

impl MockPrinterHandle {
    /// Refuse (or accept again) subsequent jobs.
    pub fn block(&self, blocked: bool) {
        self.state.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Jobs printed so far.
    pub fn jobs(&self) -> Vec<PrintJob> {
        self.state
            .jobs
            .lock()
            .map(|jobs| jobs.clone())
            .unwrap_or_default()
    }
}
