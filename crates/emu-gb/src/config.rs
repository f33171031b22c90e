//! Game Boy configuration.

use gb_cartridge::RamProtection;
use sharp_sm83::Registers;

/// CPU register state at the first step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StartState {
    /// Every register zero, execution from 0x0000.
    #[default]
    PowerOn,
    /// The state the DMG boot ROM leaves behind, execution from 0x0100.
    PostBoot,
}

impl StartState {
    #[must_use]
    pub fn registers(self) -> Registers {
        match self {
            Self::PowerOn => Registers::default(),
            Self::PostBoot => Registers::post_boot(),
        }
    }
}

/// Game Boy configuration.
pub struct GameBoyConfig {
    /// Raw cartridge image.
    pub rom_data: Vec<u8>,
    /// Writes to disabled cartridge RAM. Defaults to faulting.
    pub ram_protection: RamProtection,
    /// Initial registers. Defaults to power-on zeros.
    pub start: StartState,
}

impl GameBoyConfig {
    /// Configuration with default policies for the given image.
    #[must_use]
    pub fn new(rom_data: Vec<u8>) -> Self {
        Self {
            rom_data,
            ram_protection: RamProtection::default(),
            start: StartState::default(),
        }
    }
}
