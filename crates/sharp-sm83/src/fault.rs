//! Run-time faults raised while executing an instruction.

use emu_core::BusError;
use thiserror::Error;

/// Why `step()` could not complete an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// One of the eleven holes in the primary opcode table.
    #[error("unknown opcode {opcode:#04X} at {address:#06X}")]
    UnknownOpcode { opcode: u8, address: u16 },

    /// A register rank outside 0..=7 was passed to `get`/`set`.
    #[error("invalid register rank {0}")]
    InvalidRank(u8),

    /// The bus refused a write.
    #[error(transparent)]
    Bus(#[from] BusError),
}
