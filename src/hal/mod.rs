//! ATmega328P peripheral drivers

pub mod adc;
pub mod power;
pub mod timer;
pub mod uart;

// Re-export commonly used types
pub use adc::Adc;
pub use power::Power;
pub use timer::{Delay, Timer1};
pub use uart::Uart;
