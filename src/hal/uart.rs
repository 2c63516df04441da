use avr_device::atmega328p::USART0;
use core::convert::Infallible;
use embedded_hal::serial;
use potstream::config::{CPU_FREQ_HZ, UART_BAUD};

// UCSR0A bits
const RXC0: u8 = 1 << 7;
const UDRE0: u8 = 1 << 5;
const U2X0: u8 = 1 << 1;
// UCSR0B bits
const RXEN0: u8 = 1 << 4;
const TXEN0: u8 = 1 << 3;
// UCSR0C: asynchronous, no parity, 1 stop bit, 8 data bits
const FRAME_8N1: u8 = 0x06;

// Double-speed divisor, rounded: 16 for 115200 at 16MHz
const UBRR: u16 = ((CPU_FREQ_HZ + 4 * UART_BAUD) / (8 * UART_BAUD) - 1) as u16;

/// Polled USART0.
///
/// Reception is polled rather than interrupt-driven: the only input the
/// firmware ever consumes is the handshake, read before interrupts are on.
pub struct Uart {
    usart: USART0,
}

impl Uart {
    pub fn new(usart: USART0) -> Self {
        unsafe {
            usart.ucsr0a.write(|w| w.bits(U2X0));
            usart.ubrr0.write(|w| w.bits(UBRR));
            usart.ucsr0c.write(|w| w.bits(FRAME_8N1));
            // Enable TX and RX
            usart.ucsr0b.write(|w| w.bits(RXEN0 | TXEN0));
        }
        Self { usart }
    }

    pub fn is_rx_ready(&self) -> bool {
        self.usart.ucsr0a.read().bits() & RXC0 != 0
    }

    pub fn is_tx_ready(&self) -> bool {
        self.usart.ucsr0a.read().bits() & UDRE0 != 0
    }
}

impl serial::Read<u8> for Uart {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        if !self.is_rx_ready() {
            return Err(nb::Error::WouldBlock);
        }
        Ok(self.usart.udr0.read().bits())
    }
}

impl serial::Write<u8> for Uart {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        if !self.is_tx_ready() {
            return Err(nb::Error::WouldBlock);
        }
        unsafe {
            self.usart.udr0.write(|w| w.bits(byte));
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        if self.is_tx_ready() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}
