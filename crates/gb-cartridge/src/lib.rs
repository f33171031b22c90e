//! Game Boy cartridges.
//!
//! A cartridge owns the ROM image and any on-board RAM, and decodes the
//! CPU's accesses to 0x0000-0x7FFF and 0xA000-0xBFFF. The bank controller
//! is chosen from header byte 0x147 when the image is loaded.

mod header;
mod mbc1;
mod rom_only;

use emu_core::{BusError, Observable, Value};
use thiserror::Error;

pub use header::{CartridgeHeader, HEADER_END, Licensee};
pub use mbc1::Mbc1;
pub use rom_only::RomOnly;

/// Why an image could not be turned into a cartridge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("image is {len} bytes, too short to hold the cartridge type byte")]
    Truncated { len: usize },
    #[error("unsupported cartridge type {0:#04X}")]
    UnsupportedCartridgeType(u8),
}

/// Why a header could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("image is {len} bytes, too short to hold a cartridge header")]
    Truncated { len: usize },
}

/// What to do with a write to cartridge RAM that is disabled or absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RamProtection {
    /// Report [`BusError::RamWriteDisabled`].
    #[default]
    Fault,
    /// Drop the write, as the hardware does.
    Ignore,
}

impl RamProtection {
    fn check(self, refused: BusError) -> Result<(), BusError> {
        match self {
            Self::Fault => Err(refused),
            Self::Ignore => {
                log::debug!("ignored: {refused}");
                Ok(())
            }
        }
    }
}

/// A loaded cartridge.
#[derive(Debug, Clone)]
pub enum Cartridge {
    RomOnly(RomOnly),
    Mbc1(Mbc1),
}

impl Cartridge {
    /// Build the bank controller named by header byte 0x147.
    ///
    /// # Errors
    ///
    /// Fails if the image does not reach 0x147 or names a controller other
    /// than 0x00 (none) or 0x01 (MBC1).
    pub fn from_rom(rom: Vec<u8>, ram_protection: RamProtection) -> Result<Self, LoadError> {
        let kind = *rom
            .get(header::CARTRIDGE_TYPE)
            .ok_or(LoadError::Truncated { len: rom.len() })?;

        let cartridge = match kind {
            0x00 => Self::RomOnly(RomOnly::new(&rom, ram_protection)),
            0x01 => Self::Mbc1(Mbc1::new(rom, ram_protection)),
            other => return Err(LoadError::UnsupportedCartridgeType(other)),
        };
        log::info!("cartridge type {kind:#04X}: {}", cartridge.kind());
        Ok(cartridge)
    }

    /// Short name of the bank controller.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RomOnly(_) => "ROM ONLY",
            Self::Mbc1(_) => "MBC1",
        }
    }

    /// Read a cartridge-mapped address. Has no side effects.
    #[must_use]
    pub fn read(&self, address: u16) -> u8 {
        match self {
            Self::RomOnly(cart) => cart.read(address),
            Self::Mbc1(cart) => cart.read(address),
        }
    }

    /// Write a cartridge-mapped address: a bank register or cartridge RAM.
    pub fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        match self {
            Self::RomOnly(cart) => cart.write(address, value),
            Self::Mbc1(cart) => cart.write(address, value),
        }
    }
}

impl Observable for Cartridge {
    fn query(&self, path: &str) -> Option<Value> {
        match (self, path) {
            (_, "kind") => Some(self.kind().into()),
            (Self::Mbc1(cart), "rom_bank") => Some(cart.rom_bank().into()),
            (Self::Mbc1(cart), "ram_bank") => Some(cart.ram_bank().into()),
            (Self::Mbc1(cart), "ram_enabled") => Some(cart.ram_enabled().into()),
            (Self::Mbc1(cart), "ram_banking") => Some(cart.ram_banking().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        match self {
            Self::RomOnly(_) => &["kind"],
            Self::Mbc1(_) => &["kind", "rom_bank", "ram_bank", "ram_enabled", "ram_banking"],
        }
    }
}
