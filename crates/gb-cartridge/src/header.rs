//! Cartridge header fields at 0x0134-0x014F.
//!
//! Parsing reads bytes only; it does not build a bank controller.

use std::fmt;

use crate::HeaderError;

/// Offsets of the header bytes read here.
const TITLE: std::ops::Range<usize> = 0x134..0x143;
const CGB_FLAG: usize = 0x143;
const NEW_LICENSEE: std::ops::Range<usize> = 0x144..0x146;
pub(crate) const CARTRIDGE_TYPE: usize = 0x147;
const ROM_SIZE: usize = 0x148;
const RAM_SIZE: usize = 0x149;
const DESTINATION: usize = 0x14A;
const OLD_LICENSEE: usize = 0x14B;

/// First byte past the fields this module reads.
pub const HEADER_END: usize = 0x14C;

/// Who published the cartridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Licensee {
    Accolade,
    Konami,
    /// Old code 0x33: the two ASCII bytes at 0x144-0x145.
    Code(String),
    Unknown(u8),
}

impl fmt::Display for Licensee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accolade => f.write_str("Accolade"),
            Self::Konami => f.write_str("Konami"),
            Self::Code(code) => f.write_str(code),
            Self::Unknown(_) => f.write_str("Unknown"),
        }
    }
}

/// Parsed cartridge header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeHeader {
    /// Up to 15 ASCII characters, trailing NULs removed.
    pub title: String,
    /// 0x80 at 0x143.
    pub color: bool,
    pub licensee: Licensee,
    /// Nonzero destination byte.
    pub japanese: bool,
    pub cartridge_type: u8,
    /// Declared ROM size in bytes, `None` if the code overflows.
    pub rom_size: Option<usize>,
    /// Declared RAM size in bytes, `None` if the code overflows.
    pub ram_size: Option<usize>,
}

impl CartridgeHeader {
    /// Parse the header of a raw image.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::Truncated`] if the image ends before 0x14C.
    pub fn parse(rom: &[u8]) -> Result<Self, HeaderError> {
        if rom.len() < HEADER_END {
            return Err(HeaderError::Truncated { len: rom.len() });
        }

        let title = String::from_utf8_lossy(&rom[TITLE])
            .trim_end_matches('\0')
            .to_string();

        let licensee = match rom[OLD_LICENSEE] {
            0x79 => Licensee::Accolade,
            0xA4 => Licensee::Konami,
            0x33 => Licensee::Code(String::from_utf8_lossy(&rom[NEW_LICENSEE]).into_owned()),
            other => Licensee::Unknown(other),
        };

        Ok(Self {
            title,
            color: rom[CGB_FLAG] == 0x80,
            licensee,
            japanese: rom[DESTINATION] != 0,
            cartridge_type: rom[CARTRIDGE_TYPE],
            rom_size: rom_size(rom[ROM_SIZE]),
            ram_size: ram_size(rom[RAM_SIZE]),
        })
    }

    /// "Japanese" or "Non-Japanese".
    #[must_use]
    pub fn destination(&self) -> &'static str {
        if self.japanese {
            "Japanese"
        } else {
            "Non-Japanese"
        }
    }

    /// Human-readable cartridge type. Unlisted codes print as hex.
    #[must_use]
    pub fn type_label(&self) -> String {
        match self.cartridge_type {
            0x00 => "ROM ONLY".to_string(),
            0x01 => "ROM+MBC1".to_string(),
            0x13 => "ROM+MBC3+RAM+BATT".to_string(),
            other => format!("{other:#04X}"),
        }
    }
}

/// 32K doubled `code` times.
fn rom_size(code: u8) -> Option<usize> {
    1usize
        .checked_shl(u32::from(code))
        .and_then(|banks| banks.checked_mul(0x8000))
}

/// 0 for code 0, 2K for code 1, then four times larger per step.
fn ram_size(code: u8) -> Option<usize> {
    match code {
        0 => Some(0),
        n => 4usize
            .checked_pow(u32::from(n - 1))
            .and_then(|factor| factor.checked_mul(0x800)),
    }
}
