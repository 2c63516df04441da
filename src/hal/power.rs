use avr_device::atmega328p::CPU;

// SMCR: SM2..SM0 = 000 (idle), SE set
const SLEEP_IDLE: u8 = 0b0000_0001;

pub struct Power {
    cpu: CPU,
}

impl Power {
    pub fn new(cpu: CPU) -> Self {
        Self { cpu }
    }

    /// Sleep until the next interrupt. Idle keeps timers and the USART clocked.
    #[inline]
    pub fn enter_idle_mode(&mut self) {
        unsafe {
            self.cpu.smcr.write(|w| w.bits(SLEEP_IDLE));
        }
        avr_device::asm::sleep();
        unsafe {
            self.cpu.smcr.write(|w| w.bits(0));
        }
    }
}
