//! SM83 CPU core with per-instruction execution.
//!
//! Every bus access goes through `read`/`write`, each of which costs one
//! machine cycle. Internal delays (16-bit arithmetic, taken branches, the
//! extra slot before a push) call `tick` directly.

use emu_core::{Bus, Cpu, Cycles, Observable, Value};

use crate::fault::Fault;
use crate::registers::{Operand, Registers};

mod execute;
mod prefixed;

/// Sharp SM83 CPU.
///
/// The CPU does not own the bus; it is passed to `step()` so the machine
/// decides what sits behind each address.
#[derive(Debug, Clone)]
pub struct Sm83 {
    pub(crate) regs: Registers,
    /// Set by HALT and STOP. Nothing clears it except `reset`.
    halted: bool,
    /// Interrupt master enable. Recorded only; nothing is dispatched.
    ime: bool,
    /// Last primary opcode fetched.
    opcode: u8,
    cycles: Cycles,
}

impl Sm83 {
    /// Create a CPU with every register zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registers(Registers::default())
    }

    /// Create a CPU with a chosen register state.
    #[must_use]
    pub fn with_registers(regs: Registers) -> Self {
        Self {
            regs,
            halted: false,
            ime: false,
            opcode: 0,
            cycles: Cycles::ZERO,
        }
    }

    #[must_use]
    pub fn regs(&self) -> &Registers {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    /// Machine cycles elapsed since creation or the last reset.
    #[must_use]
    pub const fn cycles(&self) -> Cycles {
        self.cycles
    }

    #[must_use]
    pub const fn ime(&self) -> bool {
        self.ime
    }

    /// Read the register or memory byte selected by `rank`.
    ///
    /// Rank 6 reads memory at HL and costs a cycle.
    pub fn get<B: Bus>(&mut self, bus: &mut B, rank: u8) -> Result<u8, Fault> {
        let value = match Operand::from_rank(rank).ok_or(Fault::InvalidRank(rank))? {
            Operand::B => self.regs.b,
            Operand::C => self.regs.c,
            Operand::D => self.regs.d,
            Operand::E => self.regs.e,
            Operand::H => self.regs.h,
            Operand::L => self.regs.l,
            Operand::IndirectHl => self.read(bus, self.regs.hl()),
            Operand::A => self.regs.a,
        };
        Ok(value)
    }

    /// Write the register or memory byte selected by `rank`.
    pub fn set<B: Bus>(&mut self, bus: &mut B, rank: u8, value: u8) -> Result<(), Fault> {
        match Operand::from_rank(rank).ok_or(Fault::InvalidRank(rank))? {
            Operand::B => self.regs.b = value,
            Operand::C => self.regs.c = value,
            Operand::D => self.regs.d = value,
            Operand::E => self.regs.e = value,
            Operand::H => self.regs.h = value,
            Operand::L => self.regs.l = value,
            Operand::IndirectHl => self.write(bus, self.regs.hl(), value)?,
            Operand::A => self.regs.a = value,
        }
        Ok(())
    }

    /// Timing hook: one machine cycle passes.
    fn tick(&mut self) {
        self.cycles += Cycles::new(1);
    }

    fn read<B: Bus>(&mut self, bus: &mut B, address: u16) -> u8 {
        let value = bus.read(address);
        self.tick();
        value
    }

    fn write<B: Bus>(&mut self, bus: &mut B, address: u16, value: u8) -> Result<(), Fault> {
        bus.write(address, value)?;
        self.tick();
        Ok(())
    }

    fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = self.read(bus, self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Little-endian immediate word.
    fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Decrement SP by two and store `value` there, low byte at the lower
    /// address. Costs an internal cycle plus two writes.
    fn push<B: Bus>(&mut self, bus: &mut B, value: u16) -> Result<(), Fault> {
        let [lo, hi] = value.to_le_bytes();
        self.tick();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write(bus, self.regs.sp, hi)?;
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write(bus, self.regs.sp, lo)
    }

    fn pop<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.read(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = self.read(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_le_bytes([lo, hi])
    }

    fn jump(&mut self, target: u16) {
        self.regs.pc = target;
        self.tick();
    }

    fn call<B: Bus>(&mut self, bus: &mut B, target: u16) -> Result<(), Fault> {
        self.push(bus, self.regs.pc)?;
        self.regs.pc = target;
        Ok(())
    }

    fn ret<B: Bus>(&mut self, bus: &mut B) {
        let target = self.pop(bus);
        self.jump(target);
    }

    /// Condition field `cc` of bits 3-4: NZ, Z, NC, C.
    fn condition(&self, cc: u8) -> bool {
        let f = self.regs.f;
        match cc & 0x03 {
            0 => !f.zero(),
            1 => f.zero(),
            2 => !f.carry(),
            _ => f.carry(),
        }
    }
}

impl Default for Sm83 {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu for Sm83 {
    type Registers = Registers;
    type Fault = Fault;

    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<Cycles, Fault> {
        let start = self.cycles;

        if self.halted {
            self.tick();
            return Ok(self.cycles - start);
        }

        let address = self.regs.pc;
        let opcode = self.fetch8(bus);
        self.opcode = opcode;

        log::trace!(
            "{address:04X}  {opcode:02X}  A:{:02X} F:{:02X} BC:{:04X} DE:{:04X} HL:{:04X} SP:{:04X}",
            self.regs.a,
            self.regs.f.bits(),
            self.regs.bc(),
            self.regs.de(),
            self.regs.hl(),
            self.regs.sp,
        );

        self.execute(bus, opcode, address)?;
        Ok(self.cycles - start)
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Observable for Sm83 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "a" => Some(self.regs.a.into()),
            "f" => Some(self.regs.f.bits().into()),
            "b" => Some(self.regs.b.into()),
            "c" => Some(self.regs.c.into()),
            "d" => Some(self.regs.d.into()),
            "e" => Some(self.regs.e.into()),
            "h" => Some(self.regs.h.into()),
            "l" => Some(self.regs.l.into()),

            "af" => Some(self.regs.af().into()),
            "bc" => Some(self.regs.bc().into()),
            "de" => Some(self.regs.de().into()),
            "hl" => Some(self.regs.hl().into()),
            "sp" => Some(self.regs.sp.into()),
            "pc" => Some(self.regs.pc.into()),

            "flags.z" => Some(self.regs.f.zero().into()),
            "flags.n" => Some(self.regs.f.subtract().into()),
            "flags.h" => Some(self.regs.f.half_carry().into()),
            "flags.c" => Some(self.regs.f.carry().into()),

            "halted" => Some(self.halted.into()),
            "ime" => Some(self.ime.into()),
            "opcode" => Some(self.opcode.into()),
            "cycles" => Some(self.cycles.get().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "a", "f", "b", "c", "d", "e", "h", "l", "af", "bc", "de", "hl", "sp", "pc", "flags.z",
            "flags.n", "flags.h", "flags.c", "halted", "ime", "opcode", "cycles",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    #[test]
    fn power_on_state_is_zero() {
        let cpu = Sm83::new();
        assert_eq!(cpu.registers(), Registers::default());
        assert!(!cpu.is_halted());
        assert_eq!(cpu.cycles(), Cycles::ZERO);
    }

    #[test]
    fn rank_six_goes_through_memory() {
        let mut cpu = Sm83::new();
        let mut bus = SimpleBus::new();
        cpu.regs.set_hl(0xC123);
        cpu.set(&mut bus, 6, 0x5A).expect("valid");
        assert_eq!(bus.peek(0xC123), 0x5A);
        assert_eq!(cpu.get(&mut bus, 6).expect("valid"), 0x5A);
        assert_eq!(cpu.cycles(), Cycles::new(2));
    }

    #[test]
    fn rank_out_of_range_faults() {
        let mut cpu = Sm83::new();
        let mut bus = SimpleBus::new();
        assert_eq!(cpu.get(&mut bus, 8), Err(Fault::InvalidRank(8)));
        assert_eq!(cpu.set(&mut bus, 200, 0), Err(Fault::InvalidRank(200)));
    }

    #[test]
    fn push_pop_little_endian() {
        let mut cpu = Sm83::new();
        let mut bus = SimpleBus::new();
        cpu.regs.sp = 0xFFFE;
        cpu.push(&mut bus, 0x1234).expect("valid");
        assert_eq!(cpu.regs.sp, 0xFFFC);
        assert_eq!(bus.peek(0xFFFC), 0x34);
        assert_eq!(bus.peek(0xFFFD), 0x12);
        assert_eq!(cpu.pop(&mut bus), 0x1234);
        assert_eq!(cpu.regs.sp, 0xFFFE);
    }

    #[test]
    fn halted_cpu_idles() {
        let mut cpu = Sm83::new();
        let mut bus = SimpleBus::new();
        bus.load(0x0000, &[0x76, 0x3C]);
        cpu.step(&mut bus).expect("valid");
        assert!(cpu.is_halted());
        let pc = cpu.pc();
        assert_eq!(cpu.step(&mut bus), Ok(Cycles::new(1)));
        assert_eq!(cpu.pc(), pc);
        assert_eq!(cpu.regs.a, 0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut cpu = Sm83::with_registers(Registers::post_boot());
        cpu.halted = true;
        cpu.reset();
        assert_eq!(cpu.pc(), 0);
        assert!(!cpu.is_halted());
    }

    #[test]
    fn observable_paths() {
        let mut cpu = Sm83::with_registers(Registers::post_boot());
        cpu.regs.f.set_carry(false);
        assert_eq!(cpu.query("pc"), Some(Value::U16(0x0100)));
        assert_eq!(cpu.query("af"), Some(Value::U16(0x01A0)));
        assert_eq!(cpu.query("flags.z"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("flags.c"), Some(Value::Bool(false)));
        assert_eq!(cpu.query("ix"), None);
        for path in cpu.query_paths() {
            assert!(cpu.query(path).is_some(), "{path}");
        }
    }
}
