use avr_device::atmega328p::ADC;
use potstream::channel::{AnalogPin, AnalogSource};

// ADCSRA bits
const ADEN: u8 = 1 << 7;
const ADSC: u8 = 1 << 6;
// ADC clock = 16MHz / 128 = 125kHz
const PRESCALER_DIV128: u8 = 0x07;

// ADMUX: REFS1..0 = 01, AVCC with external cap at AREF
const REF_AVCC: u8 = 1 << 6;

pub struct Adc {
    adc: ADC,
}

impl Adc {
    pub fn new(adc: ADC) -> Self {
        unsafe {
            adc.adcsra.write(|w| w.bits(ADEN | PRESCALER_DIV128));
            adc.admux.write(|w| w.bits(REF_AVCC));
        }
        Self { adc }
    }

    pub fn read_channel(&mut self, pin: AnalogPin) -> u16 {
        unsafe {
            // Select channel
            self.adc.admux.write(|w| w.bits(REF_AVCC | pin.mux()));

            // Start conversion
            self.adc.adcsra.modify(|r, w| w.bits(r.bits() | ADSC));
        }

        // Wait for completion
        while self.adc.adcsra.read().bits() & ADSC != 0 {}

        // 16-bit read takes ADCL before ADCH
        self.adc.adc.read().bits()
    }
}

impl AnalogSource for Adc {
    fn read(&mut self, pin: AnalogPin) -> u16 {
        self.read_channel(pin)
    }
}
