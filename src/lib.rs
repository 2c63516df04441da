//! Potentiometer streamer firmware
//!
//! Samples six potentiometers every 10ms and streams `@<address>/<value>`
//! lines to a host once the host has completed the `READY?`/`OK` handshake.
//!
//! Everything here is hardware independent and builds for the host as well
//! as for AVR; the register-level drivers live with the firmware binary.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

pub mod application;
pub mod channel;
pub mod config;
pub mod host;
pub mod protocol;
pub mod sampling;
pub mod timer;

pub use application::bring_up;
pub use channel::{AnalogPin, AnalogSource, Channel, ChannelBank};
pub use protocol::{Negotiator, ProtocolError, Report};
pub use sampling::SamplingCycle;
pub use timer::{OverflowTimer, Prescaler};
