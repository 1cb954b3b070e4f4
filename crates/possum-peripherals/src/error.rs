use possum_hardware::HardwareError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Receipt content not found")]
    MissingContent,

    #[error("Print target unavailable: {0}")]
    TargetUnavailable(String),

    #[error(transparent)]
    Hardware(#[from] HardwareError),

    #[error(transparent)]
    Message(#[from] possum_core::Error),
}

impl ActionError {
    /// Classify a printer failure.
    pub fn from_printer(error: HardwareError) -> Self {
        if error.is_unavailable() {
            Self::TargetUnavailable(error.to_string())
        } else {
            Self::Hardware(error)
        }
    }
}

pub type Result<T> = std::result::Result<T, ActionError>;
