//! Memory bus interface.

use thiserror::Error;

/// A write the bus refused to perform.
///
/// Reads are total: every address yields a byte. Writes can hit read-only
/// or disabled storage, which the bus reports instead of dropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    /// Store into cartridge ROM.
    #[error("write of {value:#04X} to read-only ROM at {address:#06X}")]
    RomWrite { address: u16, value: u8 },
    /// Store into cartridge RAM while the RAM gate is closed.
    #[error("write of {value:#04X} to disabled cartridge RAM at {address:#06X}")]
    RamWriteDisabled { address: u16, value: u8 },
}

/// Memory bus interface.
///
/// Components access memory through this trait. The bus handles address
/// decoding and routing to the appropriate backing store.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError>;
}

/// Flat 64K RAM bus with no mapping rules. Every write succeeds.
///
/// Used by CPU tests that need memory without a cartridge.
pub struct SimpleBus {
    ram: Box<[u8; 0x1_0000]>,
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; 0x1_0000]),
        }
    }

    /// Copy `data` into RAM starting at `address`, wrapping at 0xFFFF.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        let mut addr = address;
        for &byte in data {
            self.ram[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    /// Read without going through the trait.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.ram[address as usize]
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, address: u16) -> u8 {
        self.ram[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        self.ram[address as usize] = value;
        Ok(())
    }
}
