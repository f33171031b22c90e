//! CPU core trait.

use crate::{Bus, Cycles};

/// A CPU core.
///
/// The bus is passed in, not owned, so the owner of the system decides
/// what sits behind each address. A CPU advances one whole instruction per
/// [`Cpu::step`]; the cycles that instruction consumed are returned.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Run-time fault raised by an instruction.
    type Fault;

    /// Execute one instruction.
    ///
    /// A halted CPU idles for one cycle and returns without fetching.
    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<Cycles, Self::Fault>;

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU is halted.
    fn is_halted(&self) -> bool;

    /// Reset the CPU to its power-on state.
    fn reset(&mut self);
}
