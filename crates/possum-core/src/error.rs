use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Scan errors
    #[error("Invalid barcode: {0}")]
    InvalidBarcode(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Message errors
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
