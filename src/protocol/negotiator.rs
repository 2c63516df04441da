//! Startup handshake with the host

use super::{LineBuffer, ProtocolError, Result, SerialWriter, ACK_TOKEN, HANDSHAKE_TOKEN};
use crate::config::{ACK_HOLD_MS, ACK_SETTLE_MS, LINE_TIMEOUT_MS};
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::serial;

/// Bytes kept of a handshake line once surrounding whitespace is skipped
pub const MAX_LINE: usize = 32;

/// Gate that holds the firmware until the host has asked for data.
///
/// Call [`poll`](Negotiator::poll) in a loop until it yields `true`. There is
/// no overall timeout: without a host the device waits forever.
pub struct Negotiator<S, D> {
    serial: S,
    delay: D,
    line: LineBuffer<MAX_LINE>,
    acknowledged: bool,
}

impl<S, D> Negotiator<S, D>
where
    S: serial::Read<u8> + serial::Write<u8>,
    D: DelayMs<u16>,
{
    pub fn new(serial: S, delay: D) -> Self {
        Self {
            serial,
            delay,
            line: LineBuffer::new(),
            acknowledged: false,
        }
    }

    /// One negotiation check.
    ///
    /// Returns `Ok(false)` straight away when nothing is waiting on the link.
    /// Otherwise reads one line; if it is the handshake token the
    /// acknowledgment is sent between the two settle delays and `Ok(true)` is
    /// returned. Any other line is dropped.
    pub fn poll(&mut self) -> Result<bool> {
        if self.acknowledged {
            return Ok(true);
        }

        let first = match self.serial.read() {
            Ok(byte) => byte,
            Err(nb::Error::WouldBlock) => return Ok(false),
            Err(nb::Error::Other(_)) => return Err(ProtocolError::TransportError),
        };

        self.read_line(first)?;
        if !self.line.matches(HANDSHAKE_TOKEN) {
            return Ok(false);
        }

        self.delay.delay_ms(ACK_SETTLE_MS);
        SerialWriter::new(&mut self.serial).write_line(ACK_TOKEN)?;
        self.delay.delay_ms(ACK_HOLD_MS);

        self.acknowledged = true;
        info!("host acknowledged");
        Ok(true)
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Block until the host has been acknowledged.
    pub fn wait(&mut self) -> Result<()> {
        while !self.poll()? {}
        Ok(())
    }

    /// Hand the serial port and delay back once negotiation is over.
    pub fn release(self) -> (S, D) {
        (self.serial, self.delay)
    }

    // Collects bytes up to '\n'. A stalled line ends after LINE_TIMEOUT_MS
    // without a new byte.
    fn read_line(&mut self, first: u8) -> Result<()> {
        self.line.clear();

        let mut byte = first;
        loop {
            if byte == b'\n' {
                break;
            }
            self.line.push_input(byte);

            match self.next_byte()? {
                Some(next) => byte = next,
                None => break,
            }
        }

        if self.line.overflowed() {
            warn!("dropped overlong handshake line");
        }
        Ok(())
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut waited_ms = 0;
        loop {
            match self.serial.read() {
                Ok(byte) => return Ok(Some(byte)),
                Err(nb::Error::WouldBlock) if waited_ms < LINE_TIMEOUT_MS => {
                    self.delay.delay_ms(1);
                    waited_ms += 1;
                }
                Err(nb::Error::WouldBlock) => return Ok(None),
                Err(nb::Error::Other(_)) => return Err(ProtocolError::TransportError),
            }
        }
    }
}
