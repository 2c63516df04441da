use avr_device::atmega328p::{TC0, TC1};
use embedded_hal::blocking::delay::DelayMs;
use potstream::timer::{OverflowTimer, Prescaler};

// TIMSK1 overflow interrupt enable
const TOIE1: u8 = 1 << 0;

/// 16-bit Timer1 in normal mode, driving the sampling interrupt
pub struct Timer1 {
    tc1: TC1,
    reload: u16,
}

impl Timer1 {
    pub fn new(tc1: TC1) -> Self {
        unsafe {
            // Normal mode, stopped
            tc1.tccr1a.write(|w| w.bits(0));
            tc1.tccr1b.write(|w| w.bits(0));
        }
        Self { tc1, reload: 0 }
    }
}

impl OverflowTimer for Timer1 {
    fn configure(&mut self, prescaler: Prescaler, reload: u16) {
        self.reload = reload;
        unsafe {
            self.tc1.tccr1a.write(|w| w.bits(0));
            self.tc1.tccr1b.write(|w| w.bits(prescaler.bits()));
            self.tc1.tcnt1.write(|w| w.bits(reload));
            self.tc1.timsk1.modify(|r, w| w.bits(r.bits() | TOIE1));
        }
    }

    #[inline]
    fn reload(&mut self) {
        unsafe {
            self.tc1.tcnt1.write(|w| w.bits(self.reload));
        }
    }
}

/// Busy-wait millisecond delay on Timer0
pub struct Delay {
    tc0: TC0,
}

impl Delay {
    pub fn new(tc0: TC0) -> Self {
        unsafe {
            tc0.tccr0a.write(|w| w.bits(0));
            tc0.tccr0b.write(|w| w.bits(0));
        }
        Self { tc0 }
    }
}

impl DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        // 1ms ticks: 16MHz/64 = 250kHz, 250 ticks = 1ms
        unsafe {
            self.tc0.tcnt0.write(|w| w.bits(0));
            self.tc0.tccr0b.write(|w| w.bits(Prescaler::Div64.bits()));
        }

        for _ in 0..ms {
            while self.tc0.tcnt0.read().bits() < 250 {}
            unsafe {
                self.tc0.tcnt0.write(|w| w.bits(0));
            }
        }

        unsafe {
            self.tc0.tccr0b.write(|w| w.bits(0));
        }
    }
}
