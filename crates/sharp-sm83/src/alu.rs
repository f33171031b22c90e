//! ALU operations for the SM83.
//!
//! Every function is pure: it takes operands (and the incoming flags where
//! an operation leaves some of them alone) and returns the result with the
//! new F register.

#![allow(clippy::verbose_bit_mask)] // Clearer to read mask comparisons.

use crate::flags::Flags;

/// Result of an ALU operation with flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult {
    pub value: u8,
    pub flags: Flags,
}

/// Add two bytes with optional carry.
///
/// The incoming carry is added to the operand first; H and C are taken
/// from that widened operand.
#[must_use]
pub fn add8(a: u8, b: u8, carry: bool) -> AluResult {
    let operand = u16::from(b) + u16::from(carry);
    let wide = u16::from(a) + operand;
    let value = wide as u8;

    AluResult {
        value,
        flags: Flags::new(
            value == 0,
            false,
            u16::from(a & 0x0F) + (operand & 0x0F) > 0x0F,
            wide > 0xFF,
        ),
    }
}

/// Subtract two bytes with optional borrow.
///
/// As with `add8`, the borrow is added to the operand before the flags
/// are computed.
#[must_use]
pub fn sub8(a: u8, b: u8, carry: bool) -> AluResult {
    let operand = u16::from(b) + u16::from(carry);
    let value = u16::from(a).wrapping_sub(operand) as u8;

    AluResult {
        value,
        flags: Flags::new(
            value == 0,
            true,
            u16::from(a & 0x0F) < operand & 0x0F,
            u16::from(a) < operand,
        ),
    }
}

#[must_use]
pub fn and8(a: u8, b: u8) -> AluResult {
    let value = a & b;
    AluResult {
        value,
        flags: Flags::new(value == 0, false, true, false),
    }
}

#[must_use]
pub fn xor8(a: u8, b: u8) -> AluResult {
    let value = a ^ b;
    AluResult {
        value,
        flags: Flags::new(value == 0, false, false, false),
    }
}

#[must_use]
pub fn or8(a: u8, b: u8) -> AluResult {
    let value = a | b;
    AluResult {
        value,
        flags: Flags::new(value == 0, false, false, false),
    }
}

/// Compare: flags as for `sub8`, but `value` is `a` unchanged.
#[must_use]
pub fn cp8(a: u8, b: u8) -> AluResult {
    AluResult {
        value: a,
        flags: sub8(a, b, false).flags,
    }
}

/// Increment. Carry is not affected.
#[must_use]
pub fn inc8(value: u8, flags: Flags) -> AluResult {
    let result = value.wrapping_add(1);
    AluResult {
        value: result,
        flags: Flags::new(result == 0, false, value & 0x0F == 0x0F, flags.carry()),
    }
}

/// Decrement. Carry is not affected.
#[must_use]
pub fn dec8(value: u8, flags: Flags) -> AluResult {
    let result = value.wrapping_sub(1);
    AluResult {
        value: result,
        flags: Flags::new(result == 0, true, value & 0x0F == 0x00, flags.carry()),
    }
}

fn shifted(value: u8, carry: bool) -> AluResult {
    AluResult {
        value,
        flags: Flags::new(value == 0, false, false, carry),
    }
}

/// Rotate left circular.
#[must_use]
pub fn rlc8(value: u8) -> AluResult {
    shifted(value.rotate_left(1), value & 0x80 != 0)
}

/// Rotate right circular.
#[must_use]
pub fn rrc8(value: u8) -> AluResult {
    shifted(value.rotate_right(1), value & 0x01 != 0)
}

/// Rotate left through carry.
#[must_use]
pub fn rl8(value: u8, carry: bool) -> AluResult {
    shifted(value << 1 | u8::from(carry), value & 0x80 != 0)
}

/// Rotate right through carry.
#[must_use]
pub fn rr8(value: u8, carry: bool) -> AluResult {
    shifted(value >> 1 | u8::from(carry) << 7, value & 0x01 != 0)
}

/// Shift left arithmetic.
#[must_use]
pub fn sla8(value: u8) -> AluResult {
    shifted(value << 1, value & 0x80 != 0)
}

/// Shift right arithmetic (bit 7 preserved).
#[must_use]
pub fn sra8(value: u8) -> AluResult {
    shifted(value >> 1 | value & 0x80, value & 0x01 != 0)
}

/// Swap nibbles. Carry is always cleared.
#[must_use]
pub fn swap8(value: u8) -> AluResult {
    shifted(value.rotate_left(4), false)
}

/// Shift right logical.
#[must_use]
pub fn srl8(value: u8) -> AluResult {
    shifted(value >> 1, value & 0x01 != 0)
}

/// Test bit `n` of `value`. Carry is not affected.
#[must_use]
pub fn bit(n: u8, value: u8, flags: Flags) -> Flags {
    Flags::new(value & (1 << n) == 0, false, true, flags.carry())
}

/// `ADD HL, rr`. Zero is not affected; H and C come from bits 11 and 15.
#[must_use]
pub fn add16(a: u16, b: u16, flags: Flags) -> (u16, Flags) {
    let wide = u32::from(a) + u32::from(b);
    let half = (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF;
    (
        wide as u16,
        Flags::new(flags.zero(), false, half, wide > 0xFFFF),
    )
}

/// `ADD SP, e` and `LD HL, SP+e`. H and C come from the low byte, treating
/// the offset as unsigned; Z and N are cleared.
#[must_use]
pub fn add_sp(sp: u16, offset: i8) -> (u16, Flags) {
    let low = u16::from(offset as u8);
    let half = (sp & 0x000F) + (low & 0x000F) > 0x000F;
    let carry = (sp & 0x00FF) + low > 0x00FF;
    (
        sp.wrapping_add_signed(i16::from(offset)),
        Flags::new(false, false, half, carry),
    )
}

/// Decimal adjust after an 8-bit add or subtract.
#[must_use]
pub fn daa(a: u8, flags: Flags) -> AluResult {
    let mut adjust = 0;
    let mut carry = flags.carry();

    let value = if flags.subtract() {
        if flags.half_carry() {
            adjust |= 0x06;
        }
        if carry {
            adjust |= 0x60;
        }
        a.wrapping_sub(adjust)
    } else {
        if flags.half_carry() || a & 0x0F > 0x09 {
            adjust |= 0x06;
        }
        if carry || a > 0x99 {
            adjust |= 0x60;
            carry = true;
        }
        a.wrapping_add(adjust)
    };

    AluResult {
        value,
        flags: Flags::new(value == 0, flags.subtract(), false, carry),
    }
}

/// The eight accumulator operations selected by bits 3-5 of the ALU block
/// and the `op A, n` immediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    /// Decode from the low three bits of `index`.
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => Self::Add,
            1 => Self::Adc,
            2 => Self::Sub,
            3 => Self::Sbc,
            4 => Self::And,
            5 => Self::Xor,
            6 => Self::Or,
            _ => Self::Cp,
        }
    }

    /// Apply to the accumulator. For `Cp` the returned value is `a`.
    #[must_use]
    pub fn apply(self, a: u8, operand: u8, carry: bool) -> AluResult {
        match self {
            Self::Add => add8(a, operand, false),
            Self::Adc => add8(a, operand, carry),
            Self::Sub => sub8(a, operand, false),
            Self::Sbc => sub8(a, operand, carry),
            Self::And => and8(a, operand),
            Self::Xor => xor8(a, operand),
            Self::Or => or8(a, operand),
            Self::Cp => cp8(a, operand),
        }
    }
}
