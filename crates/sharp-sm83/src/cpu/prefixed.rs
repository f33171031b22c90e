//! 0xCB-prefixed opcode table: rotates, shifts, SWAP, BIT, RES, SET.

use emu_core::Bus;

use super::Sm83;
use crate::alu;
use crate::fault::Fault;

impl Sm83 {
    pub(super) fn execute_prefixed<B: Bus>(&mut self, bus: &mut B) -> Result<(), Fault> {
        let opcode = self.fetch8(bus);
        let rank = opcode & 0x07;
        let n = (opcode >> 3) & 0x07;
        let value = self.get(bus, rank)?;

        match opcode {
            // RLC RRC RL RR SLA SRA SWAP SRL
            0x00..=0x3F => {
                let carry = self.regs.f.carry();
                let result = match n {
                    0 => alu::rlc8(value),
                    1 => alu::rrc8(value),
                    2 => alu::rl8(value, carry),
                    3 => alu::rr8(value, carry),
                    4 => alu::sla8(value),
                    5 => alu::sra8(value),
                    6 => alu::swap8(value),
                    _ => alu::srl8(value),
                };
                self.regs.f = result.flags;
                self.set(bus, rank, result.value)?;
            }

            // BIT n, r: read only
            0x40..=0x7F => self.regs.f = alu::bit(n, value, self.regs.f),

            // RES n, r
            0x80..=0xBF => self.set(bus, rank, value & !(1 << n))?,

            // SET n, r
            0xC0..=0xFF => self.set(bus, rank, value | 1 << n)?,
        }

        Ok(())
    }
}
