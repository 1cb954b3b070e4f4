use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error(transparent)]
    Core(#[from] possum_core::Error),

    #[error("Scanner service stopped")]
    ServiceStopped,
}

pub type Result<T> = std::result::Result<T, ScannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_is_transparent() {
        let err: ScannerError = possum_core::Error::Config("bad cooldown".into()).into();
        assert_eq!(err.to_string(), "Configuration error: bad cooldown");
    }
}
