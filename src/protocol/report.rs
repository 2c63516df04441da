//! `@<address>/<value>` report lines

use super::line::trim;
use super::{ProtocolError, Result};
use crate::channel::CHANNEL_COUNT;
use crate::config::ADC_MAX;
use core::str::FromStr;
use ufmt::{uDisplay, uWrite, uwrite, Formatter};

/// One channel reading as sent on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Report {
    pub address: u8,
    pub value: u16,
}

impl Report {
    pub const fn new(address: u8, value: u16) -> Self {
        Self { address, value }
    }

    /// Decode one received line; surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Result<Self> {
        let body = trim(line.as_bytes())
            .strip_prefix(b"@")
            .ok_or(ProtocolError::InvalidReport)?;

        let slash = body
            .iter()
            .position(|&b| b == b'/')
            .ok_or(ProtocolError::InvalidReport)?;
        let address = parse_decimal(&body[..slash])?;
        let value = parse_decimal(&body[slash + 1..])?;

        if address == 0 || address > CHANNEL_COUNT as u32 {
            return Err(ProtocolError::AddressOutOfRange);
        }
        if value > ADC_MAX as u32 {
            return Err(ProtocolError::ValueOutOfRange);
        }

        Ok(Self::new(address as u8, value as u16))
    }
}

impl FromStr for Report {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl uDisplay for Report {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(f, "@{}/{}", self.address, self.value)
    }
}

// Plain ASCII digits only, capped well below overflow
fn parse_decimal(digits: &[u8]) -> Result<u32> {
    if digits.is_empty() || digits.len() > 5 {
        return Err(ProtocolError::InvalidReport);
    }
    digits.iter().try_fold(0u32, |acc, &b| {
        if b.is_ascii_digit() {
            Ok(acc * 10 + (b - b'0') as u32)
        } else {
            Err(ProtocolError::InvalidReport)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::LineBuffer;

    fn render(report: Report) -> LineBuffer<16> {
        let mut buf = LineBuffer::new();
        uwrite!(buf, "{}", report).unwrap();
        buf
    }

    #[test]
    fn renders_address_and_value() {
        assert_eq!(render(Report::new(1, 512)).as_bytes(), b"@1/512");
        assert_eq!(render(Report::new(6, 0)).as_bytes(), b"@6/0");
        assert_eq!(render(Report::new(4, 1023)).as_bytes(), b"@4/1023");
    }

    #[test]
    fn parses_wire_lines() {
        assert_eq!(Report::parse("@1/512"), Ok(Report::new(1, 512)));
        assert_eq!(Report::parse("@6/0\r\n"), Ok(Report::new(6, 0)));
        assert_eq!("@3/1023".parse::<Report>(), Ok(Report::new(3, 1023)));
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in ["", "@", "1/512", "@1512", "@/5", "@1/", "@a/5", "@1/+5", "@1/5 x", "@123456/1"] {
            assert_eq!(Report::parse(line), Err(ProtocolError::InvalidReport), "{line:?}");
        }
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!(Report::parse("@0/10"), Err(ProtocolError::AddressOutOfRange));
        assert_eq!(Report::parse("@7/10"), Err(ProtocolError::AddressOutOfRange));
        assert_eq!(Report::parse("@2/1024"), Err(ProtocolError::ValueOutOfRange));
    }
}
