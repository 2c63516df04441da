use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (unit tests, tooling) get no MCU flags
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    // Configure for ATmega328P
    println!("cargo:rustc-link-arg=-mmcu=atmega328p");

    println!("cargo:warning=Building for ATmega328P at 16MHz");
}
