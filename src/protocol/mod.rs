//! Host link protocol
//!
//! Everything on the wire is ASCII text, one message per line:
//!
//! ```text
//! host   -> device   READY?
//! device -> host     OK
//! device -> host     @1/512
//! device -> host     @2/0
//! ...
//! ```
//!
//! Device lines end in `\r\n`. Host lines end in `\n`; surrounding
//! whitespace is ignored.

pub mod line;
pub mod negotiator;
pub mod report;

pub use line::LineBuffer;
pub use negotiator::Negotiator;
pub use report::Report;

use embedded_hal::serial;
use ufmt::uWrite;

/// Token the host sends once it is ready to receive reports
pub const HANDSHAKE_TOKEN: &str = "READY?";

/// Reply to a valid handshake
pub const ACK_TOKEN: &str = "OK";

/// Terminator of every line the device sends
pub const LINE_END: &str = "\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    BufferOverflow,
    TransportError,
    InvalidReport,
    AddressOutOfRange,
    ValueOutOfRange,
}

pub type Result<T> = core::result::Result<T, ProtocolError>;

/// `ufmt` sink that pushes bytes out of a serial port, blocking per byte.
pub struct SerialWriter<'a, W> {
    serial: &'a mut W,
}

impl<'a, W: serial::Write<u8>> SerialWriter<'a, W> {
    pub fn new(serial: &'a mut W) -> Self {
        Self { serial }
    }

    pub fn write_line(&mut self, text: &str) -> Result<()> {
        self.write_str(text)?;
        self.write_str(LINE_END)
    }
}

impl<W: serial::Write<u8>> uWrite for SerialWriter<'_, W> {
    type Error = ProtocolError;

    fn write_str(&mut self, s: &str) -> Result<()> {
        for byte in s.bytes() {
            nb::block!(self.serial.write(byte)).map_err(|_| ProtocolError::TransportError)?;
        }
        Ok(())
    }
}
