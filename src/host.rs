//! Host-side decoding of the report stream
//!
//! A host does not want six raw lines every 10ms. [`ReportFilter`] keeps a
//! short moving average per address and only passes a reading on once the
//! average moves away from the previous raw reading, normalized to
//! hundredths of full scale so it can drive an effect parameter directly.

use crate::channel::CHANNEL_COUNT;
use crate::config::ADC_MAX;
use crate::protocol::{Report, Result};

/// Earlier readings kept per address; each average also counts the new one
pub const WINDOW: usize = 10;

const SPAN: usize = WINDOW + 1;

/// Minimum distance between average and previous reading, in tenths of a count
pub const THRESHOLD_TENTHS: u32 = 12;

/// Full-scale divisor used for normalization
const FULL_SCALE: u32 = 1024;

/// Effect parameter driven by each address, index 0 = address 1
const ROUTES: [&str; CHANNEL_COUNT] = [
    "/parameter/Canyon/Dry_Wet",
    "/parameter/Canyon/Gain",
    "/parameter/Canyon/Blend",
    "/parameter/Canyon/HighCut_Freq",
    "/parameter/Canyon/HighCut_FreqB",
    "/parameter/Canyon/LowCut_Freq",
];

/// Parameter path for a channel address
pub fn parameter_path(address: u8) -> Option<&'static str> {
    ROUTES.get((address as usize).checked_sub(1)?).copied()
}

/// A parameter change worth forwarding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Update {
    pub address: u8,
    /// Smoothed level, 0..=100
    pub hundredths: u8,
    pub path: &'static str,
}

/// Moving window of the latest readings for one address
#[derive(Clone, Debug, Default)]
pub struct ChannelFilter {
    window: [u16; SPAN],
    len: usize,
    next: usize,
    last: Option<u16>,
}

impl ChannelFilter {
    pub const fn new() -> Self {
        Self {
            window: [0; SPAN],
            len: 0,
            next: 0,
            last: None,
        }
    }

    /// Add a reading; returns the new level in hundredths when it moved enough.
    ///
    /// The first reading only seeds the window. Values above full scale are
    /// clamped to it.
    pub fn push(&mut self, value: u16) -> Option<u8> {
        let value = value.min(ADC_MAX);
        let previous = self.last.replace(value);

        self.window[self.next] = value;
        self.next = (self.next + 1) % SPAN;
        self.len = (self.len + 1).min(SPAN);

        let previous = previous? as u32;
        let len = self.len as u32;
        let sum: u32 = self.window[..self.len].iter().map(|&v| v as u32).sum();

        // |sum/len - previous| > 1.2, kept in integers
        if sum.abs_diff(previous * len) * 10 <= THRESHOLD_TENTHS * len {
            return None;
        }

        let scale = len * FULL_SCALE;
        Some(((sum * 100 + scale / 2) / scale) as u8)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Filters for all six addresses
#[derive(Clone, Debug, Default)]
pub struct ReportFilter {
    channels: [ChannelFilter; CHANNEL_COUNT],
}

impl ReportFilter {
    pub const fn new() -> Self {
        Self {
            channels: [
                ChannelFilter::new(),
                ChannelFilter::new(),
                ChannelFilter::new(),
                ChannelFilter::new(),
                ChannelFilter::new(),
                ChannelFilter::new(),
            ],
        }
    }

    pub fn accept(&mut self, report: Report) -> Option<Update> {
        let index = (report.address as usize).checked_sub(1)?;
        let hundredths = self.channels.get_mut(index)?.push(report.value)?;
        Some(Update {
            address: report.address,
            hundredths,
            path: parameter_path(report.address)?,
        })
    }

    /// Parse and filter one received line.
    pub fn accept_line(&mut self, line: &str) -> Result<Option<Update>> {
        Report::parse(line).map(|report| self.accept(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ProtocolError;

    #[test]
    fn routes_cover_the_six_addresses() {
        assert_eq!(parameter_path(1), Some("/parameter/Canyon/Dry_Wet"));
        assert_eq!(parameter_path(6), Some("/parameter/Canyon/LowCut_Freq"));
        assert_eq!(parameter_path(0), None);
        assert_eq!(parameter_path(7), None);
    }

    #[test]
    fn first_reading_only_seeds() {
        let mut filter = ChannelFilter::new();
        assert_eq!(filter.push(800), None);
    }

    #[test]
    fn jump_is_averaged_and_normalized() {
        let mut filter = ChannelFilter::new();
        filter.push(0);
        // (0 + 1000) / 2 = 500 -> 48.8% of 1024
        assert_eq!(filter.push(1000), Some(49));
    }

    #[test]
    fn steady_input_is_suppressed() {
        let mut filter = ChannelFilter::new();
        for _ in 0..20 {
            assert_eq!(filter.push(512), None);
        }
    }

    #[test]
    fn small_wobble_stays_below_threshold() {
        let mut filter = ChannelFilter::new();
        filter.push(512);
        // average 512.5, previous 512
        assert_eq!(filter.push(513), None);
    }

    #[test]
    fn window_forgets_old_readings() {
        let mut filter = ChannelFilter::new();
        for _ in 0..=WINDOW {
            filter.push(0);
        }
        for _ in 0..WINDOW {
            filter.push(1023);
        }
        // Window now holds one 0 and ten 1023s; the next 1023 flushes the 0
        assert_eq!(filter.push(1023), None);
        filter.reset();
        assert_eq!(filter.push(1023), None);
    }

    #[test]
    fn average_spans_new_reading_and_ten_before_it() {
        let mut filter = ChannelFilter::new();
        for _ in 0..WINDOW {
            filter.push(0);
        }
        // 1023 / 11 = 93 -> 9.1% of 1024
        assert_eq!(filter.push(1023), Some(9));
    }

    #[test]
    fn readings_above_full_scale_are_clamped() {
        let mut filter = ChannelFilter::new();
        filter.push(0);
        assert_eq!(filter.push(u16::MAX), Some(50));

        let mut reports = ReportFilter::new();
        reports.accept(Report::new(2, u16::MAX));
        reports.accept(Report::new(2, 0));
        let update = reports.accept(Report::new(2, 60_000)).unwrap();
        assert!(update.hundredths <= 100);
        assert_eq!(update.hundredths, 67);
    }

    #[test]
    fn updates_carry_address_and_path() {
        let mut filter = ReportFilter::new();
        assert_eq!(filter.accept_line("@3/0\r\n"), Ok(None));
        assert_eq!(
            filter.accept_line("@3/1023"),
            Ok(Some(Update {
                address: 3,
                hundredths: 50,
                path: "/parameter/Canyon/Blend",
            }))
        );
        // Other addresses are independent
        assert_eq!(filter.accept(Report::new(4, 1023)), None);
    }

    #[test]
    fn malformed_lines_are_errors() {
        let mut filter = ReportFilter::new();
        assert_eq!(filter.accept_line("garbage"), Err(ProtocolError::InvalidReport));
    }
}
