//! Primary opcode table.

use emu_core::Bus;

use super::Sm83;
use crate::alu::{self, AluOp};
use crate::fault::Fault;

impl Sm83 {
    /// Execute a fetched primary opcode. `address` is where it was fetched.
    pub(super) fn execute<B: Bus>(
        &mut self,
        bus: &mut B,
        opcode: u8,
        address: u16,
    ) -> Result<(), Fault> {
        // Middle three bits select a register, condition, or ALU op.
        let y = (opcode >> 3) & 0x07;

        match opcode {
            // NOP
            0x00 => {}

            // LD rr, nn
            0x01 => {
                let value = self.fetch16(bus);
                self.regs.set_bc(value);
            }
            0x11 => {
                let value = self.fetch16(bus);
                self.regs.set_de(value);
            }
            0x21 => {
                let value = self.fetch16(bus);
                self.regs.set_hl(value);
            }
            0x31 => self.regs.sp = self.fetch16(bus),

            // LD (BC), A / LD (DE), A
            0x02 => self.write(bus, self.regs.bc(), self.regs.a)?,
            0x12 => self.write(bus, self.regs.de(), self.regs.a)?,

            // LD (HL+), A / LD (HL-), A
            0x22 => {
                let hl = self.regs.hl();
                self.write(bus, hl, self.regs.a)?;
                self.regs.set_hl(hl.wrapping_add(1));
            }
            0x32 => {
                let hl = self.regs.hl();
                self.write(bus, hl, self.regs.a)?;
                self.regs.set_hl(hl.wrapping_sub(1));
            }

            // LD A, (BC) / LD A, (DE)
            0x0A => self.regs.a = self.read(bus, self.regs.bc()),
            0x1A => self.regs.a = self.read(bus, self.regs.de()),

            // LD A, (HL+) / LD A, (HL-)
            0x2A => {
                let hl = self.regs.hl();
                self.regs.a = self.read(bus, hl);
                self.regs.set_hl(hl.wrapping_add(1));
            }
            0x3A => {
                let hl = self.regs.hl();
                self.regs.a = self.read(bus, hl);
                self.regs.set_hl(hl.wrapping_sub(1));
            }

            // INC rr / DEC rr: one extra cycle in the address unit
            0x03 => {
                self.regs.set_bc(self.regs.bc().wrapping_add(1));
                self.tick();
            }
            0x13 => {
                self.regs.set_de(self.regs.de().wrapping_add(1));
                self.tick();
            }
            0x23 => {
                self.regs.set_hl(self.regs.hl().wrapping_add(1));
                self.tick();
            }
            0x33 => {
                self.regs.sp = self.regs.sp.wrapping_add(1);
                self.tick();
            }
            0x0B => {
                self.regs.set_bc(self.regs.bc().wrapping_sub(1));
                self.tick();
            }
            0x1B => {
                self.regs.set_de(self.regs.de().wrapping_sub(1));
                self.tick();
            }
            0x2B => {
                self.regs.set_hl(self.regs.hl().wrapping_sub(1));
                self.tick();
            }
            0x3B => {
                self.regs.sp = self.regs.sp.wrapping_sub(1);
                self.tick();
            }

            // INC r
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                let value = self.get(bus, y)?;
                let result = alu::inc8(value, self.regs.f);
                self.regs.f = result.flags;
                self.set(bus, y, result.value)?;
            }

            // DEC r
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                let value = self.get(bus, y)?;
                let result = alu::dec8(value, self.regs.f);
                self.regs.f = result.flags;
                self.set(bus, y, result.value)?;
            }

            // LD r, n
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                let value = self.fetch8(bus);
                self.set(bus, y, value)?;
            }

            // RLCA / RRCA / RLA / RRA: as the CB forms on A, but Z is cleared
            0x07 | 0x0F | 0x17 | 0x1F => {
                let a = self.regs.a;
                let carry = self.regs.f.carry();
                let mut result = match opcode {
                    0x07 => alu::rlc8(a),
                    0x0F => alu::rrc8(a),
                    0x17 => alu::rl8(a, carry),
                    _ => alu::rr8(a, carry),
                };
                result.flags.set_zero(false);
                self.regs.a = result.value;
                self.regs.f = result.flags;
            }

            // LD (nn), SP
            0x08 => {
                let target = self.fetch16(bus);
                let [lo, hi] = self.regs.sp.to_le_bytes();
                self.write(bus, target, lo)?;
                self.write(bus, target.wrapping_add(1), hi)?;
            }

            // ADD HL, rr
            0x09 | 0x19 | 0x29 | 0x39 => {
                let rr = match opcode {
                    0x09 => self.regs.bc(),
                    0x19 => self.regs.de(),
                    0x29 => self.regs.hl(),
                    _ => self.regs.sp,
                };
                let (value, flags) = alu::add16(self.regs.hl(), rr, self.regs.f);
                self.regs.set_hl(value);
                self.regs.f = flags;
                self.tick();
            }

            // STOP: the padding byte is consumed
            0x10 => {
                self.fetch8(bus);
                self.halted = true;
                log::debug!("STOP at {address:#06X}");
            }

            // JR e
            0x18 => {
                let offset = self.fetch8(bus) as i8;
                self.jump(self.regs.pc.wrapping_add_signed(i16::from(offset)));
            }

            // JR cc, e
            0x20 | 0x28 | 0x30 | 0x38 => {
                let offset = self.fetch8(bus) as i8;
                if self.condition(y) {
                    self.jump(self.regs.pc.wrapping_add_signed(i16::from(offset)));
                }
            }

            // DAA
            0x27 => {
                let result = alu::daa(self.regs.a, self.regs.f);
                self.regs.a = result.value;
                self.regs.f = result.flags;
            }

            // CPL
            0x2F => {
                self.regs.a = !self.regs.a;
                self.regs.f.set_subtract(true);
                self.regs.f.set_half_carry(true);
            }

            // SCF
            0x37 => {
                self.regs.f.set_subtract(false);
                self.regs.f.set_half_carry(false);
                self.regs.f.set_carry(true);
            }

            // CCF
            0x3F => {
                let carry = self.regs.f.carry();
                self.regs.f.set_subtract(false);
                self.regs.f.set_half_carry(false);
                self.regs.f.set_carry(!carry);
            }

            // HALT
            0x76 => {
                self.halted = true;
                log::debug!("HALT at {address:#06X}");
            }

            // LD r, r'
            0x40..=0x7F => {
                let value = self.get(bus, opcode & 0x07)?;
                self.set(bus, y, value)?;
            }

            // ADD/ADC/SUB/SBC/AND/XOR/OR/CP A, r
            0x80..=0xBF => {
                let value = self.get(bus, opcode & 0x07)?;
                self.alu(AluOp::from_index(y), value);
            }

            // RET cc
            0xC0 | 0xC8 | 0xD0 | 0xD8 => {
                self.tick();
                if self.condition(y) {
                    self.ret(bus);
                }
            }

            // POP rr
            0xC1 => {
                let value = self.pop(bus);
                self.regs.set_bc(value);
            }
            0xD1 => {
                let value = self.pop(bus);
                self.regs.set_de(value);
            }
            0xE1 => {
                let value = self.pop(bus);
                self.regs.set_hl(value);
            }
            0xF1 => {
                let value = self.pop(bus);
                self.regs.set_af(value);
            }

            // JP cc, nn
            0xC2 | 0xCA | 0xD2 | 0xDA => {
                let target = self.fetch16(bus);
                if self.condition(y) {
                    self.jump(target);
                }
            }

            // JP nn
            0xC3 => {
                let target = self.fetch16(bus);
                self.jump(target);
            }

            // CALL cc, nn
            0xC4 | 0xCC | 0xD4 | 0xDC => {
                let target = self.fetch16(bus);
                if self.condition(y) {
                    self.call(bus, target)?;
                }
            }

            // PUSH rr
            0xC5 => self.push(bus, self.regs.bc())?,
            0xD5 => self.push(bus, self.regs.de())?,
            0xE5 => self.push(bus, self.regs.hl())?,
            0xF5 => self.push(bus, self.regs.af())?,

            // ADD/ADC/SUB/SBC/AND/XOR/OR/CP A, n
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                let value = self.fetch8(bus);
                self.alu(AluOp::from_index(y), value);
            }

            // RST n
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                self.call(bus, u16::from(opcode & 0x38))?;
            }

            // RET
            0xC9 => self.ret(bus),

            // RETI
            0xD9 => {
                self.ret(bus);
                self.ime = true;
            }

            // CALL nn
            0xCD => {
                let target = self.fetch16(bus);
                self.call(bus, target)?;
            }

            // CB prefix
            0xCB => self.execute_prefixed(bus)?,

            // LDH (n), A
            0xE0 => {
                let offset = self.fetch8(bus);
                self.write(bus, 0xFF00 | u16::from(offset), self.regs.a)?;
            }

            // LD (C), A
            0xE2 => self.write(bus, 0xFF00 | u16::from(self.regs.c), self.regs.a)?,

            // ADD SP, e
            0xE8 => {
                let offset = self.fetch8(bus) as i8;
                let (value, flags) = alu::add_sp(self.regs.sp, offset);
                self.regs.sp = value;
                self.regs.f = flags;
                self.tick();
                self.tick();
            }

            // JP (HL): no extra cycle
            0xE9 => self.regs.pc = self.regs.hl(),

            // LD (nn), A
            0xEA => {
                let target = self.fetch16(bus);
                self.write(bus, target, self.regs.a)?;
            }

            // LDH A, (n)
            0xF0 => {
                let offset = self.fetch8(bus);
                self.regs.a = self.read(bus, 0xFF00 | u16::from(offset));
            }

            // LD A, (C)
            0xF2 => self.regs.a = self.read(bus, 0xFF00 | u16::from(self.regs.c)),

            // DI / EI
            0xF3 => self.ime = false,
            0xFB => self.ime = true,

            // LD HL, SP+e
            0xF8 => {
                let offset = self.fetch8(bus) as i8;
                let (value, flags) = alu::add_sp(self.regs.sp, offset);
                self.regs.set_hl(value);
                self.regs.f = flags;
                self.tick();
            }

            // LD SP, HL
            0xF9 => {
                self.regs.sp = self.regs.hl();
                self.tick();
            }

            // LD A, (nn)
            0xFA => {
                let source = self.fetch16(bus);
                self.regs.a = self.read(bus, source);
            }

            // 0xD3 0xDB 0xDD 0xE3 0xE4 0xEB 0xEC 0xED 0xF4 0xFC 0xFD
            _ => {
                log::warn!("unknown opcode {opcode:#04X} at {address:#06X}");
                return Err(Fault::UnknownOpcode { opcode, address });
            }
        }

        Ok(())
    }

    fn alu(&mut self, op: AluOp, operand: u8) {
        let result = op.apply(self.regs.a, operand, self.regs.f.carry());
        self.regs.a = result.value;
        self.regs.f = result.flags;
    }
}
