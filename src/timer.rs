//! Sampling timer contract and reload arithmetic
//!
//! The sampling period comes from a 16-bit up-counter that raises an
//! interrupt when it rolls over from `0xFFFF` to `0`. Loading it with
//! [`SAMPLE_RELOAD`] leaves exactly one sampling period of ticks before the
//! next overflow.

use crate::config::{CPU_FREQ_HZ, SAMPLE_PERIOD_US, SAMPLE_TIMER_PRESCALER};

/// Clock select values for the 16-bit timer (CS12..CS10)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

impl Prescaler {
    /// Clock divisor, 0 when the timer is stopped
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Stop => 0,
            Prescaler::Direct => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }

    /// Register bits to place in the clock select field
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// A hardware countdown that overflows once per period.
///
/// Implementations remember the reload value given to [`configure`] so the
/// overflow handler can re-arm without knowing the constant.
///
/// [`configure`]: OverflowTimer::configure
pub trait OverflowTimer {
    /// Select the clock, load the counter and enable the overflow interrupt.
    fn configure(&mut self, prescaler: Prescaler, reload: u16);

    /// Load the counter with the configured reload value again.
    fn reload(&mut self);
}

/// Counter start value for `period_us` at `cpu_hz` after `prescaler`.
///
/// Fails to compile when used in a const context with a period that does
/// not fit the 16-bit counter.
pub const fn reload_for(cpu_hz: u32, prescaler: Prescaler, period_us: u32) -> u16 {
    let divisor = prescaler.divisor();
    assert!(divisor != 0, "stopped timer has no period");

    let ticks = (cpu_hz / divisor) as u64 * period_us as u64 / 1_000_000;
    assert!(ticks > 0 && ticks <= 0x1_0000, "period does not fit 16-bit timer");

    (0x1_0000 - ticks) as u16
}

/// Reload value for the configured sampling period (45536 at 16MHz, /8, 10ms)
pub const SAMPLE_RELOAD: u16 = reload_for(CPU_FREQ_HZ, SAMPLE_TIMER_PRESCALER, SAMPLE_PERIOD_US);

/// One-shot setup of the sampling timer.
///
/// Must run after the handshake and before global interrupts are enabled.
pub fn arm<T: OverflowTimer>(timer: &mut T) {
    timer.configure(SAMPLE_TIMER_PRESCALER, SAMPLE_RELOAD);
    debug!("sampling timer armed, reload={=u16}", SAMPLE_RELOAD);
}
