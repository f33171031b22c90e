//! Game Boy bus: CPU address routing.
//!
//! - $0000-$7FFF, $A000-$BFFF: cartridge (ROM, bank registers, RAM)
//! - $C000-$DFFF: work RAM; writes are copied to the echo cell 0x2000 above
//! - $E000-$FDFF: echo RAM; writes are copied to the work RAM cell below
//! - everything else: flat memory
//!
//! Reads always come from the addressed cell itself.

use emu_core::{Bus, BusError};
use gb_cartridge::Cartridge;

const ECHO_OFFSET: u16 = 0x2000;

/// The Game Boy bus, implementing `emu_core::Bus`.
pub struct GbBus {
    pub cartridge: Cartridge,
    /// Every non-cartridge address, indexed directly.
    memory: Box<[u8; 0x1_0000]>,
}

impl GbBus {
    #[must_use]
    pub fn new(cartridge: Cartridge) -> Self {
        Self {
            cartridge,
            memory: Box::new([0; 0x1_0000]),
        }
    }

    /// Read a byte without side effects (for observation).
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => self.cartridge.read(address),
            _ => self.memory[address as usize],
        }
    }
}

impl Bus for GbBus {
    fn read(&mut self, address: u16) -> u8 {
        self.peek(address)
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        match address {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => return self.cartridge.write(address, value),
            0xE000..=0xFDFF => self.memory[(address - ECHO_OFFSET) as usize] = value,
            0xC000..=0xDFFF => self.memory[(address + ECHO_OFFSET) as usize] = value,
            _ => {}
        }
        self.memory[address as usize] = value;
        Ok(())
    }
}
