use crate::{
    Result,
    constants::{GS1_SEPARATOR, MAX_BARCODE_LENGTH, MIN_BARCODE_LENGTH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;

/// Decoded barcode value.
///
/// The value is trimmed and must be printable ASCII between
/// [`MIN_BARCODE_LENGTH`] and [`MAX_BARCODE_LENGTH`] characters, plus the
/// [`GS1_SEPARATOR`] of GS1-128 reads, which is kept as decoded. All
/// supported symbologies (EAN, UPC, Code 128, Code 39) encode within that set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Barcode(String);

impl Barcode {
    /// Create a new barcode with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidBarcode` if:
    /// - The trimmed value is empty or longer than the maximum length
    /// - The value contains characters outside printable ASCII other than
    ///   the GS1 group separator
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();

        let len = code.len();
        if !(MIN_BARCODE_LENGTH..=MAX_BARCODE_LENGTH).contains(&len) {
            return Err(Error::InvalidBarcode(format!(
                "length must be {MIN_BARCODE_LENGTH}-{MAX_BARCODE_LENGTH}, got {len}"
            )));
        }

        if let Some(c) = code
            .chars()
            .find(|c| !(' '..='~').contains(c) && *c != GS1_SEPARATOR)
        {
            return Err(Error::InvalidBarcode(format!(
                "unsupported character {c:?} in {code:?}"
            )));
        }

        Ok(Barcode(code.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Barcode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Barcode::new(s)
    }
}

impl TryFrom<String> for Barcode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Barcode::new(&value)
    }
}

impl From<Barcode> for String {
    fn from(value: Barcode) -> Self {
        value.0
    }
}

/// A single decode result with its arrival time.
///
/// Produced from a decoder detection and consumed immediately by the scan
/// gate; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub code: Barcode,
    pub timestamp: Instant,
}

impl ScanEvent {
    pub fn new(code: Barcode, timestamp: Instant) -> Self {
        Self { code, timestamp }
    }

    /// Create an event stamped with the current (tokio) time.
    pub fn now(code: Barcode) -> Self {
        Self::new(code, Instant::now())
    }
}

/// Identifier of one open-to-close scanning session.
///
/// Allocated from a monotonically increasing counter every time a session
/// starts, so identifiers are never reused within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(id: u64) -> Self {
        SessionId(id)
    }

    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The identifier following this one.
    #[must_use]
    pub fn next(&self) -> Self {
        SessionId(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies one arming of the safety timer.
///
/// A fired timer is honored only while its token matches the controller's
/// current session and arm generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub session: SessionId,
    pub generation: u64,
}

impl TimerToken {
    pub fn new(session: SessionId, generation: u64) -> Self {
        Self {
            session,
            generation,
        }
    }
}

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.session, self.generation)
    }
}
