//! Core traits and types shared by the Game Boy emulator crates.
//!
//! The CPU never owns memory. Every access goes through a [`Bus`], and
//! every access costs one machine cycle on the CPU's [`Cycles`] counter.

mod bus;
mod cpu;
mod cycles;
mod observable;

pub use bus::{Bus, BusError, SimpleBus};
pub use cpu::Cpu;
pub use cycles::Cycles;
pub use observable::{Observable, Value, parse_address};
