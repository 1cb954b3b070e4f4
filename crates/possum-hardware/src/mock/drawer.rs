//! Mock cash drawer.

use crate::{HardwareError, Result, traits::CashDrawer, types::DeviceInfo};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct DrawerState {
    fail: AtomicBool,
    open_count: AtomicUsize,
}

/// Mock cash drawer counting kick pulses.
///
/// # Examples
///
/// ```
/// use possum_hardware::mock::MockCashDrawer;
/// use possum_hardware::traits::CashDrawer;
///
/// #[tokio::main]
/// async fn main() -> possum_hardware::Result<()> {
///     let (mut drawer, handle) = MockCashDrawer::new();
///     drawer.open().await?;
///     assert_eq!(handle.open_count(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockCashDrawer {
    name: String,
    state: Arc<DrawerState>,
}

impl MockCashDrawer {
    pub fn new() -> (Self, MockCashDrawerHandle) {
        let state = Arc::new(DrawerState::default());
        let drawer = Self {
            name: "Mock Cash Drawer".to_string(),
            state: Arc::clone(&state),
        };
        (drawer, MockCashDrawerHandle { state })
    }
}

impl Default for MockCashDrawer {
    fn default() -> Self {
        Self::new().0
    }
}

impl CashDrawer for MockCashDrawer {
    async fn open(&mut self) -> Result<()> {
        if self.state.fail.load(Ordering::SeqCst) {
            return Err(HardwareError::communication(format!(
                "{} did not accept the kick pulse",
                self.name
            )));
        }
        self.state.open_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock Drawer v1.0"))
    }
}

/// Handle for inspecting and controlling a mock cash drawer.
#[derive(Debug, Clone)]
pub struct MockCashDrawerHandle {
    state: Arc<DrawerState>,
}

impl MockCashDrawerHandle {
    /// Make subsequent kicks fail.
    pub fn fail(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }

    /// Successful kicks so far.
    pub fn open_count(&self) -> usize {
        self.state.open_count.load(Ordering::SeqCst)
    }
}
