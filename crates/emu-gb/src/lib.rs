//! Game Boy (DMG) emulator: the SM83 CPU wired to work RAM and a cartridge.
//!
//! Only the CPU and memory map are modelled. There is no PPU, APU, timer,
//! joypad, or interrupt delivery; a program runs until it halts, faults,
//! or the driver stops stepping it.

mod bus;
mod config;
mod gameboy;

pub use bus::GbBus;
pub use config::{GameBoyConfig, StartState};
pub use gameboy::{GameBoy, Status};
