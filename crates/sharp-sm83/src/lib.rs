//! Sharp SM83 CPU emulator.
//!
//! The SM83 is the Game Boy's Z80-derived core: no IX/IY, no alternate
//! register set, a four-flag F register, and a 0xCB extended table. Each
//! call to `step()` executes one whole instruction and reports the machine
//! cycles it used.

pub mod alu;
mod cpu;
mod fault;
mod flags;
mod registers;

pub use cpu::Sm83;
pub use fault::Fault;
pub use flags::{CF, Flags, HF, NF, ZF};
pub use registers::{Operand, Registers};
