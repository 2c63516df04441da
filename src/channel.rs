//! Potentiometer channels and their fixed wiring

use crate::config::ADC_MAX;
use crate::protocol::Report;

/// Analog input pins of the ATmega328P (ADC6/ADC7 exist on TQFP only)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AnalogPin {
    A0 = 0,
    A1 = 1,
    A2 = 2,
    A3 = 3,
    A4 = 4,
    A5 = 5,
    A6 = 6,
    A7 = 7,
}

impl AnalogPin {
    /// ADC multiplexer selection for this pin
    pub const fn mux(self) -> u8 {
        self as u8
    }
}

/// Synchronous single-shot analog conversion.
pub trait AnalogSource {
    /// Convert `pin`; the result is in `0..=1023`.
    fn read(&mut self, pin: AnalogPin) -> u16;
}

/// One potentiometer input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Channel {
    pin: AnalogPin,
    address: u8,
    value: u16,
}

impl Channel {
    const fn new(pin: AnalogPin, address: u8) -> Self {
        Self { pin, address, value: 0 }
    }

    pub fn pin(&self) -> AnalogPin {
        self.pin
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Value from the most recent cycle
    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn report(&self) -> Report {
        Report::new(self.address, self.value)
    }
}

pub const CHANNEL_COUNT: usize = 6;

/// The six wired channels, kept in ascending address order.
///
/// Values are written only from the sampling interrupt. Foreground code that
/// starts reading them must do so inside `avr_device::interrupt::free`, since
/// a 16-bit load is not atomic with respect to the interrupt.
#[derive(Clone, Debug)]
pub struct ChannelBank {
    channels: [Channel; CHANNEL_COUNT],
}

impl ChannelBank {
    pub const fn new() -> Self {
        Self {
            channels: [
                Channel::new(AnalogPin::A0, 1),
                Channel::new(AnalogPin::A1, 2),
                Channel::new(AnalogPin::A2, 3),
                Channel::new(AnalogPin::A3, 4),
                Channel::new(AnalogPin::A4, 5),
                Channel::new(AnalogPin::A5, 6),
            ],
        }
    }

    /// Convert every channel, address 1 first.
    pub fn sample_all<A: AnalogSource>(&mut self, adc: &mut A) {
        for channel in self.channels.iter_mut() {
            channel.value = adc.read(channel.pin).min(ADC_MAX);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn by_pin(&self, pin: AnalogPin) -> Option<&Channel> {
        self.channels.iter().find(|c| c.pin == pin)
    }

    /// Report for the channel wired to `pin`, `None` for an unwired pin
    pub fn report_for(&self, pin: AnalogPin) -> Option<Report> {
        self.by_pin(pin).map(Channel::report)
    }
}

impl Default for ChannelBank {
    fn default() -> Self {
        Self::new()
    }
}
