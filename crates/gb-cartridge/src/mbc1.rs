//! MBC1: switchable ROM banks at 0x4000-0x7FFF and up to 32K of RAM.
//!
//! Register writes land in the ROM address range:
//! - $0000-$1FFF: RAM gate, open when the low nibble is 0xA
//! - $2000-$3FFF: ROM bank bits 0-4 (0 selects 1)
//! - $4000-$5FFF: RAM bank, or ROM bank bits 5-6, depending on mode
//! - $6000-$7FFF: banking mode (bit 0: 0 = ROM, 1 = RAM)
//!
//! Only one of the two uses of the $4000 register is live at a time. In
//! ROM mode the RAM bank reads as 0; in RAM mode the ROM bank loses bits
//! 5-6. Both stored values survive a mode switch.

use emu_core::BusError;

use crate::RamProtection;

const ROM_BANK_SIZE: usize = 0x4000;
const RAM_BANK_SIZE: usize = 0x2000;
const RAM_SIZE: usize = 4 * RAM_BANK_SIZE;

/// Type 0x01.
#[derive(Debug, Clone)]
pub struct Mbc1 {
    rom: Vec<u8>,
    ram: Box<[u8; RAM_SIZE]>,
    ram_protection: RamProtection,
    ram_enabled: bool,
    /// Banking mode: false = ROM banking, true = RAM banking.
    ram_banking: bool,
    /// Seven-bit ROM bank register. Never has bits 0-4 all clear.
    rom_bank: u8,
    /// Two-bit RAM bank register.
    ram_bank: u8,
}

impl Mbc1 {
    #[must_use]
    pub fn new(rom: Vec<u8>, ram_protection: RamProtection) -> Self {
        Self {
            rom,
            ram: Box::new([0; RAM_SIZE]),
            ram_protection,
            ram_enabled: false,
            ram_banking: false,
            rom_bank: 1,
            ram_bank: 0,
        }
    }

    /// ROM bank mapped at 0x4000-0x7FFF.
    #[must_use]
    pub fn rom_bank(&self) -> u8 {
        if self.ram_banking {
            self.rom_bank & 0x1F
        } else {
            self.rom_bank
        }
    }

    /// RAM bank mapped at 0xA000-0xBFFF.
    #[must_use]
    pub fn ram_bank(&self) -> u8 {
        if self.ram_banking { self.ram_bank } else { 0 }
    }

    #[must_use]
    pub fn ram_enabled(&self) -> bool {
        self.ram_enabled
    }

    #[must_use]
    pub fn ram_banking(&self) -> bool {
        self.ram_banking
    }

    /// Byte `offset` of ROM bank `bank`. Bank numbers wrap at the image
    /// size; a partial last bank reads 0xFF past the end of the image.
    fn rom_byte(&self, bank: u8, offset: usize) -> u8 {
        let banks = self.rom.len().div_ceil(ROM_BANK_SIZE).max(1);
        let index = (usize::from(bank) % banks) * ROM_BANK_SIZE + offset;
        self.rom.get(index).copied().unwrap_or(0xFF)
    }

    fn ram_index(&self, address: u16) -> usize {
        usize::from(self.ram_bank()) * RAM_BANK_SIZE + usize::from(address - 0xA000)
    }

    #[must_use]
    pub fn read(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x3FFF => self.rom_byte(0, usize::from(address)),
            0x4000..=0x7FFF => self.rom_byte(self.rom_bank(), usize::from(address - 0x4000)),
            0xA000..=0xBFFF => self.ram[self.ram_index(address)],
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        match address {
            0x0000..=0x1FFF => {
                let enabled = value & 0x0F == 0x0A;
                if enabled != self.ram_enabled {
                    log::debug!("MBC1 RAM {}", if enabled { "enabled" } else { "disabled" });
                }
                self.ram_enabled = enabled;
            }
            0x2000..=0x3FFF => {
                let low = match value & 0x1F {
                    0 => 1,
                    bank => bank,
                };
                self.rom_bank = (self.rom_bank & 0x60) | low;
                log::debug!("MBC1 ROM bank {}", self.rom_bank());
            }
            0x4000..=0x5FFF => {
                let bits = value & 0x03;
                if self.ram_banking {
                    self.ram_bank = bits;
                    log::debug!("MBC1 RAM bank {bits}");
                } else {
                    self.rom_bank = (bits << 5) | (self.rom_bank & 0x1F);
                    log::debug!("MBC1 ROM bank {}", self.rom_bank());
                }
            }
            0x6000..=0x7FFF => {
                self.ram_banking = value & 0x01 != 0;
                log::debug!(
                    "MBC1 {} banking mode",
                    if self.ram_banking { "RAM" } else { "ROM" }
                );
            }
            0xA000..=0xBFFF => {
                if self.ram_enabled {
                    let index = self.ram_index(address);
                    self.ram[index] = value;
                } else {
                    self.ram_protection
                        .check(BusError::RamWriteDisabled { address, value })?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
