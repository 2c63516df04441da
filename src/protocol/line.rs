//! Fixed-capacity line storage

use super::{ProtocolError, Result};
use ufmt::uWrite;

/// Bytes of one text line, without allocation.
///
/// Pushing past capacity keeps the stored prefix and marks the line as
/// overflowed; an overflowed line never compares equal to anything.
#[derive(Clone)]
pub struct LineBuffer<const N: usize> {
    bytes: [u8; N],
    len: usize,
    overflowed: bool,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
            overflowed: false,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.overflowed = false;
    }

    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.len == N {
            self.overflowed = true;
            return Err(ProtocolError::BufferOverflow);
        }
        self.bytes[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Store one received byte of a line that will be compared trimmed.
    ///
    /// Leading whitespace is not stored, and whitespace arriving once the
    /// buffer is full is dropped. Only a dropped non-whitespace byte marks
    /// the line as overflowed.
    pub fn push_input(&mut self, byte: u8) {
        if is_space(byte) && (self.len == 0 || self.len == N) {
            return;
        }
        self.push(byte).ok();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Contents without leading or trailing whitespace
    pub fn trimmed(&self) -> &[u8] {
        trim(self.as_bytes())
    }

    /// True when the trimmed, complete line equals `token`
    pub fn matches(&self, token: &str) -> bool {
        !self.overflowed && self.trimmed() == token.as_bytes()
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> uWrite for LineBuffer<N> {
    type Error = ProtocolError;

    fn write_str(&mut self, s: &str) -> Result<()> {
        s.bytes().try_for_each(|b| self.push(b))
    }
}

// Same set as C isspace()
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

pub fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| !is_space(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| !is_space(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}
