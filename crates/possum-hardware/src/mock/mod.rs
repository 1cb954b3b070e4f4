//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware.

pub mod decoder;
pub mod drawer;
pub mod printer;

// Re-export commonly used types
pub use decoder::{MockDecoder, MockDecoderHandle};
pub use drawer::{MockCashDrawer, MockCashDrawerHandle};
pub use printer::{MockPrinter, MockPrinterHandle};
