pub mod constants;
pub mod error;
pub mod message;
pub mod types;

pub use error::{Error, Result};
pub use message::{InboundMessage, OutboundMessage};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
