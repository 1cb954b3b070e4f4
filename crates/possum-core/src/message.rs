//! Messages exchanged with the POS server.
//!
//! Every message is a JSON object tagged by `event` with an optional
//! `payload` object:
//!
//! ```text
//! {"event":"barcode_scanned","payload":{"barcode":"5901234123457"}}
//! {"event":"scan_success"}
//! ```
//!
//! Inbound events carry no payload today. Servers are free to attach one
//! (some push an empty object); it is ignored.

use serde::{Deserialize, Serialize};

use crate::Barcode;
use crate::constants::{
    EVENT_BARCODE_SCANNED, EVENT_OPEN_CASH_DRAWER, EVENT_PRINT_RECEIPT, EVENT_SCAN_SUCCESS,
};
use crate::error::{Error, Result};

/// Message sent from the terminal to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// A scan passed the duplicate gate and should be processed.
    BarcodeScanned { barcode: Barcode },
}

impl OutboundMessage {
    pub fn barcode_scanned(barcode: Barcode) -> Self {
        Self::BarcodeScanned { barcode }
    }

    /// Wire name of the event.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::BarcodeScanned { .. } => EVENT_BARCODE_SCANNED,
        }
    }

    /// Serialize to the JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Message received from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundMessage {
    /// The server processed the last scan; the scanning session should end.
    ScanSuccess,

    /// Print the receipt currently rendered by the host page.
    PrintReceipt,

    /// Signal the cash drawer to open.
    OpenCashDrawer,
}

/// Inbound messages carry no data the terminal uses; `payload` is ignored.
#[derive(Deserialize)]
struct RawInbound {
    event: String,
}

impl InboundMessage {
    /// Map a wire event name to a message.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownEvent` for names this terminal does not handle.
    pub fn from_event_name(name: &str) -> Result<Self> {
        match name {
            EVENT_SCAN_SUCCESS => Ok(Self::ScanSuccess),
            EVENT_PRINT_RECEIPT => Ok(Self::PrintReceipt),
            EVENT_OPEN_CASH_DRAWER => Ok(Self::OpenCashDrawer),
            other => Err(Error::UnknownEvent(other.to_string())),
        }
    }

    /// Parse the JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` for malformed JSON or a missing `event` field,
    /// and `Error::UnknownEvent` for unrecognized event names.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawInbound = serde_json::from_str(json)?;
        Self::from_event_name(&raw.event)
    }

    /// Wire name of the event.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ScanSuccess => EVENT_SCAN_SUCCESS,
            Self::PrintReceipt => EVENT_PRINT_RECEIPT,
            Self::OpenCashDrawer => EVENT_OPEN_CASH_DRAWER,
        }
    }

    /// Whether the message is handled by the scanner rather than peripherals.
    pub fn is_scanner_event(&self) -> bool {
        matches!(self, Self::ScanSuccess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_outbound_wire_format() {
        let msg = OutboundMessage::barcode_scanned(Barcode::new("0001").unwrap());
        assert_eq!(msg.event_name(), "barcode_scanned");
        assert_eq!(
            msg.to_json().unwrap(),
            r#"{"event":"barcode_scanned","payload":{"barcode":"0001"}}"#
        );
    }

    #[rstest]
    #[case(r#"{"event":"scan_success"}"#, InboundMessage::ScanSuccess)]
    #[case(r#"{"event":"scan_success","payload":{}}"#, InboundMessage::ScanSuccess)]
    #[case(r#"{"event":"print_receipt"}"#, InboundMessage::PrintReceipt)]
    #[case(r#"{"event":"open_cash_drawer","payload":null}"#, InboundMessage::OpenCashDrawer)]
    #[case(r#"{"event":"print_receipt","payload":[1, "two"],"id":7}"#, InboundMessage::PrintReceipt)]
    fn test_inbound_parse(#[case] json: &str, #[case] expected: InboundMessage) {
        let msg = InboundMessage::from_json(json).unwrap();
        assert_eq!(msg, expected);
        assert_eq!(InboundMessage::from_event_name(msg.event_name()).unwrap(), msg);
    }

    #[test]
    fn test_inbound_unknown_event() {
        let result = InboundMessage::from_json(r#"{"event":"refund"}"#);
        assert!(matches!(result, Err(Error::UnknownEvent(name)) if name == "refund"));
    }

    #[test]
    fn test_inbound_malformed() {
        assert!(matches!(
            InboundMessage::from_json("not json"),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            InboundMessage::from_json(r#"{"payload":{}}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_scanner_event_routing() {
        assert!(InboundMessage::ScanSuccess.is_scanner_event());
        assert!(!InboundMessage::PrintReceipt.is_scanner_event());
        assert!(!InboundMessage::OpenCashDrawer.is_scanner_event());
    }
}
