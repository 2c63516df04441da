//! Periodic sampling and reporting
//!
//! [`SamplingCycle::on_overflow`] is the body of the timer overflow
//! interrupt. Each call re-arms the timer, converts all six channels and
//! writes one report line per channel, address 1 through 6.

use crate::channel::{AnalogPin, AnalogSource, ChannelBank};
use crate::protocol::{Result, SerialWriter, LINE_END};
use crate::timer::OverflowTimer;
use embedded_hal::serial;
use ufmt::{uWrite, uwrite};

/// State owned by the overflow interrupt.
///
/// Runs at interrupt priority and preempts the idle foreground at any point.
/// Nothing outside the handler reads the channel values today; any future
/// foreground access to [`channels`](SamplingCycle::channels) has to happen
/// inside a critical section.
pub struct SamplingCycle<T, A, W> {
    timer: T,
    adc: A,
    serial: W,
    channels: ChannelBank,
}

impl<T, A, W> SamplingCycle<T, A, W>
where
    T: OverflowTimer,
    A: AnalogSource,
    W: serial::Write<u8>,
{
    pub fn new(timer: T, adc: A, serial: W) -> Self {
        Self {
            timer,
            adc,
            serial,
            channels: ChannelBank::new(),
        }
    }

    /// One sampling cycle.
    ///
    /// The reload comes first so that the conversions and serial output
    /// below do not stretch the period any further than their own duration.
    pub fn on_overflow(&mut self) -> Result<()> {
        self.timer.reload();
        self.channels.sample_all(&mut self.adc);

        let mut out = SerialWriter::new(&mut self.serial);
        for channel in self.channels.iter() {
            uwrite!(out, "{}{}", channel.report(), LINE_END)?;
        }
        Ok(())
    }

    /// Send the line for `pin` from the last cycle.
    ///
    /// A pin without a channel produces an empty line.
    pub fn emit(&mut self, pin: AnalogPin) -> Result<()> {
        let mut out = SerialWriter::new(&mut self.serial);
        match self.channels.report_for(pin) {
            Some(report) => uwrite!(out, "{}{}", report, LINE_END),
            None => out.write_str(LINE_END),
        }
    }

    pub fn channels(&self) -> &ChannelBank {
        &self.channels
    }

    pub fn release(self) -> (T, A, W) {
        (self.timer, self.adc, self.serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::timer::Prescaler;
    use embedded_hal_mock::serial::{Mock as SerialMock, Transaction};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    enum Event {
        Reload,
        Convert(AnalogPin),
    }

    type Events = Rc<RefCell<Vec<Event>>>;

    struct FakeTimer(Events);

    impl OverflowTimer for FakeTimer {
        fn configure(&mut self, _prescaler: Prescaler, _reload: u16) {}

        fn reload(&mut self) {
            self.0.borrow_mut().push(Event::Reload);
        }
    }

    struct FakeAdc {
        events: Events,
        values: [u16; 8],
    }

    impl AnalogSource for FakeAdc {
        fn read(&mut self, pin: AnalogPin) -> u16 {
            self.events.borrow_mut().push(Event::Convert(pin));
            self.values[pin.mux() as usize]
        }
    }

    fn cycle(values: [u16; 8], serial: SerialMock<u8>) -> (SamplingCycle<FakeTimer, FakeAdc, SerialMock<u8>>, Events) {
        let events = Events::default();
        let adc = FakeAdc { events: events.clone(), values };
        (SamplingCycle::new(FakeTimer(events.clone()), adc, serial), events)
    }

    fn lines(reports: &[&str]) -> Vec<Transaction<u8>> {
        reports
            .iter()
            .map(|r| Transaction::write_many(format!("{r}\r\n")))
            .collect()
    }

    #[test]
    fn reload_precedes_conversions_in_address_order() {
        let expectations = lines(&["@1/10", "@2/20", "@3/30", "@4/40", "@5/50", "@6/60"]);
        let mut serial = SerialMock::new(&expectations);
        let (mut sampler, events) = cycle([10, 20, 30, 40, 50, 60, 70, 80], serial.clone());

        sampler.on_overflow().unwrap();

        use AnalogPin::*;
        let expected: Vec<Event> = [A0, A1, A2, A3, A4, A5].into_iter().map(Event::Convert).collect();
        let events = events.borrow();
        assert_eq!(events[0], Event::Reload);
        assert_eq!(events[1..], expected[..]);
        serial.done();
    }

    #[test]
    fn every_cycle_reports_all_channels() {
        let mut expectations = lines(&["@1/0", "@2/1", "@3/2", "@4/3", "@5/4", "@6/5"]);
        expectations.extend(lines(&["@1/0", "@2/1", "@3/2", "@4/3", "@5/4", "@6/5"]));
        let mut serial = SerialMock::new(&expectations);
        let (mut sampler, events) = cycle([0, 1, 2, 3, 4, 5, 6, 7], serial.clone());

        sampler.on_overflow().unwrap();
        sampler.on_overflow().unwrap();

        let reloads = events.borrow().iter().filter(|e| **e == Event::Reload).count();
        assert_eq!(reloads, 2);
        serial.done();
    }

    #[test]
    fn full_scale_and_zero_values() {
        let expectations = lines(&["@1/1023", "@2/0", "@3/1023", "@4/0", "@5/1023", "@6/0"]);
        let mut serial = SerialMock::new(&expectations);
        let (mut sampler, _) = cycle([1023, 0, 1023, 0, 1023, 0, 0, 0], serial.clone());

        sampler.on_overflow().unwrap();

        let values: Vec<u16> = sampler.channels().iter().map(Channel::value).collect();
        assert_eq!(values, [1023, 0, 1023, 0, 1023, 0]);
        serial.done();
    }

    #[test]
    fn emit_for_wired_and_unwired_pins() {
        let mut expectations = lines(&["@1/7", "@2/7", "@3/7", "@4/7", "@5/7", "@6/7"]);
        expectations.extend(lines(&["@5/7", ""]));
        let mut serial = SerialMock::new(&expectations);
        let (mut sampler, _) = cycle([7; 8], serial.clone());

        sampler.on_overflow().unwrap();
        sampler.emit(AnalogPin::A4).unwrap();
        sampler.emit(AnalogPin::A7).unwrap();
        serial.done();
    }
}
