//! ESC/POS command assembly.
//!
//! Only the handful of commands receipt printing and drawer kicking need are
//! covered. Text is reduced to printable ASCII because code page selection is
//! printer specific.
//!
//! ```
//! use possum_hardware::escpos::{EscPosBuilder, Justify};
//!
//! let bytes = EscPosBuilder::new()
//!     .justify(Justify::Center)
//!     .line("THANK YOU")
//!     .feed(3)
//!     .cut()
//!     .build();
//!
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! ```

use bytes::{BufMut, Bytes, BytesMut};

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const LF: u8 = 0x0A;

/// Drawer connector pin 2, the usual wiring for a single drawer.
pub const DRAWER_PIN_2: u8 = 0;

/// Pulse on-time in units of 2 ms.
pub const DRAWER_PULSE_ON: u8 = 25;

/// Pulse off-time in units of 2 ms.
pub const DRAWER_PULSE_OFF: u8 = 250;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Center,
    Right,
}

impl Justify {
    fn code(self) -> u8 {
        match self {
            Justify::Left => 0,
            Justify::Center => 1,
            Justify::Right => 2,
        }
    }
}

/// Incremental ESC/POS byte stream.
///
/// Every stream starts with `ESC @` so the printer is in a known state.
#[derive(Debug, Clone)]
pub struct EscPosBuilder {
    buf: BytesMut,
}

impl EscPosBuilder {
    pub fn new() -> Self {
        let mut buf = BytesMut::with_capacity(256);
        buf.put_slice(&[ESC, b'@']);
        Self { buf }
    }

    /// `ESC a n`
    pub fn justify(mut self, justify: Justify) -> Self {
        self.buf.put_slice(&[ESC, b'a', justify.code()]);
        self
    }

    /// `ESC E n`
    pub fn bold(mut self, enabled: bool) -> Self {
        self.buf.put_slice(&[ESC, b'E', u8::from(enabled)]);
        self
    }

    /// Append text without a line feed.
    pub fn text(mut self, text: &str) -> Self {
        self.buf.extend(text.chars().map(printable_byte));
        self
    }

    /// Append text followed by a line feed.
    pub fn line(self, text: &str) -> Self {
        let mut this = self.text(text);
        this.buf.put_u8(LF);
        this
    }

    /// `ESC d n`: print and feed `lines` lines.
    pub fn feed(mut self, lines: u8) -> Self {
        self.buf.put_slice(&[ESC, b'd', lines]);
        self
    }

    /// `GS V 0`: full cut.
    pub fn cut(mut self) -> Self {
        self.buf.put_slice(&[GS, b'V', 0]);
        self
    }

    /// `ESC p m t1 t2`: pulse the drawer kick connector.
    pub fn drawer_kick(mut self, pin: u8, on: u8, off: u8) -> Self {
        self.buf.put_slice(&[ESC, b'p', pin, on, off]);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn build(self) -> Bytes {
        self.buf.freeze()
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The standard drawer-kick sequence on pin 2.
pub fn drawer_kick_sequence() -> Bytes {
    EscPosBuilder::new()
        .drawer_kick(DRAWER_PIN_2, DRAWER_PULSE_ON, DRAWER_PULSE_OFF)
        .build()
}

fn printable_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\t' => b' ',
        _ => b'?',
    }
}
