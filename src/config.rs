//! Configuration constants for the potentiometer streamer

use crate::timer::Prescaler;

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 115_200;

/// Sampling period in microseconds
pub const SAMPLE_PERIOD_US: u32 = 10_000;

/// Clock divider feeding the sampling timer
pub const SAMPLE_TIMER_PRESCALER: Prescaler = Prescaler::Div8;

/// Wait between matching the handshake and sending the acknowledgment
pub const ACK_SETTLE_MS: u16 = 1200;

/// Wait after the acknowledgment before sampling may start
pub const ACK_HOLD_MS: u16 = 1000;

/// How long a started handshake line may stall between bytes
pub const LINE_TIMEOUT_MS: u16 = 1000;

/// Full-scale reading of the 10-bit ADC
pub const ADC_MAX: u16 = 1023;
