//! Startup sequence

use crate::channel::AnalogSource;
use crate::protocol::{Negotiator, Result};
use crate::sampling::SamplingCycle;
use crate::timer::{self, OverflowTimer};
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::serial;

/// Negotiate with the host, then arm the sampling timer.
///
/// Blocks until the handshake succeeds. The returned cycle must be handed to
/// the overflow interrupt before global interrupts are enabled; until then
/// nothing is sampled.
pub fn bring_up<S, D, T, A>(serial: S, delay: D, mut timer: T, adc: A) -> Result<SamplingCycle<T, A, S>>
where
    S: serial::Read<u8> + serial::Write<u8>,
    D: DelayMs<u16>,
    T: OverflowTimer,
    A: AnalogSource,
{
    let mut negotiator = Negotiator::new(serial, delay);
    negotiator.wait()?;
    let (serial, _delay) = negotiator.release();

    timer::arm(&mut timer);
    info!("sampling ready");

    Ok(SamplingCycle::new(timer, adc, serial))
}
