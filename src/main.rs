#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod hal;

#[cfg(target_arch = "avr")]
mod firmware {
    use crate::hal::{Adc, Delay, Power, Timer1, Uart};
    use avr_device::atmega328p::Peripherals;
    use avr_device::interrupt::{self, Mutex};
    use core::cell::RefCell;
    use panic_halt as _;
    use potstream::SamplingCycle;

    type Sampler = SamplingCycle<Timer1, Adc, Uart>;

    // Filled once before interrupts are enabled, then only touched by TIMER1_OVF
    static SAMPLER: Mutex<RefCell<Option<Sampler>>> = Mutex::new(RefCell::new(None));

    #[avr_device::entry]
    fn main() -> ! {
        let dp = Peripherals::take().unwrap();

        let serial = Uart::new(dp.USART0);
        let delay = Delay::new(dp.TC0);
        let timer = Timer1::new(dp.TC1);
        let adc = Adc::new(dp.ADC);
        let mut power = Power::new(dp.CPU);

        // Blocks until the host sends READY?
        let sampler = match potstream::bring_up(serial, delay, timer, adc) {
            Ok(sampler) => sampler,
            // The polled UART cannot fail
            Err(_) => loop {},
        };

        interrupt::free(|cs| {
            SAMPLER.borrow(cs).replace(Some(sampler));
        });

        // Enable interrupts globally
        unsafe { avr_device::interrupt::enable() };

        loop {
            power.enter_idle_mode();
        }
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER1_OVF() {
        interrupt::free(|cs| {
            if let Some(sampler) = SAMPLER.borrow(cs).borrow_mut().as_mut() {
                sampler.on_overflow().ok();
            }
        });
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {
    eprintln!("potstream runs on an ATmega328P; build with --target avr-unknown-gnu-atmega328");
}
