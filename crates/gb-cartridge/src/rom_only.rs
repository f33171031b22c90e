//! Cartridges with no bank controller: 32K of ROM and nothing else.

use emu_core::BusError;

use crate::RamProtection;

const ROM_SIZE: usize = 0x8000;

/// Type 0x00: the image is mapped flat at 0x0000-0x7FFF.
#[derive(Debug, Clone)]
pub struct RomOnly {
    rom: Box<[u8; ROM_SIZE]>,
    ram_protection: RamProtection,
}

impl RomOnly {
    /// Copy `image` into a 32K ROM, zero-padding short images and dropping
    /// anything past 32K.
    #[must_use]
    pub fn new(image: &[u8], ram_protection: RamProtection) -> Self {
        let mut rom = Box::new([0; ROM_SIZE]);
        let len = image.len().min(ROM_SIZE);
        rom[..len].copy_from_slice(&image[..len]);
        Self {
            rom,
            ram_protection,
        }
    }

    /// Read ROM below 0x8000. There is no RAM, so everything else is open bus.
    #[must_use]
    pub fn read(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x7FFF => self.rom[address as usize],
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        match address {
            0x0000..=0x7FFF => Err(BusError::RomWrite { address, value }),
            _ => self
                .ram_protection
                .check(BusError::RamWriteDisabled { address, value }),
        }
    }
}
