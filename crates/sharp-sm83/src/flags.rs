//! SM83 flag register.
//!
//! Only the high nibble of F exists. The low nibble reads as zero no
//! matter what is written to it, including through `POP AF`.

/// Zero flag (bit 7) - set if the result is zero.
pub const ZF: u8 = 0b1000_0000;

/// Subtract flag (bit 6) - set if the last operation was a subtraction.
pub const NF: u8 = 0b0100_0000;

/// Half-carry flag (bit 5) - carry out of bit 3.
pub const HF: u8 = 0b0010_0000;

/// Carry flag (bit 4) - carry out of bit 7.
pub const CF: u8 = 0b0001_0000;

const MASK: u8 = ZF | NF | HF | CF;

/// The F register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u8);

impl Flags {
    /// Build from a raw byte, discarding the low nibble.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & MASK)
    }

    /// Build from all four flags at once.
    #[must_use]
    pub const fn new(zero: bool, subtract: bool, half_carry: bool, carry: bool) -> Self {
        let mut bits = 0;
        if zero {
            bits |= ZF;
        }
        if subtract {
            bits |= NF;
        }
        if half_carry {
            bits |= HF;
        }
        if carry {
            bits |= CF;
        }
        Self(bits)
    }

    /// Raw register value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn zero(self) -> bool {
        self.0 & ZF != 0
    }

    #[must_use]
    pub const fn subtract(self) -> bool {
        self.0 & NF != 0
    }

    #[must_use]
    pub const fn half_carry(self) -> bool {
        self.0 & HF != 0
    }

    #[must_use]
    pub const fn carry(self) -> bool {
        self.0 & CF != 0
    }

    pub fn set_zero(&mut self, on: bool) {
        self.assign(ZF, on);
    }

    pub fn set_subtract(&mut self, on: bool) {
        self.assign(NF, on);
    }

    pub fn set_half_carry(&mut self, on: bool) {
        self.assign(HF, on);
    }

    pub fn set_carry(&mut self, on: bool) {
        self.assign(CF, on);
    }

    fn assign(&mut self, bit: u8, on: bool) {
        if on {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_nibble_is_dropped() {
        assert_eq!(Flags::from_bits(0xFF).bits(), 0xF0);
        assert_eq!(Flags::from_bits(0x0F).bits(), 0x00);
    }

    #[test]
    fn bit_layout() {
        assert_eq!(Flags::new(true, false, false, false).bits(), 0x80);
        assert_eq!(Flags::new(false, true, false, false).bits(), 0x40);
        assert_eq!(Flags::new(false, false, true, false).bits(), 0x20);
        assert_eq!(Flags::new(false, false, false, true).bits(), 0x10);
    }

    #[test]
    fn setters_touch_one_bit() {
        let mut f = Flags::from_bits(0xF0);
        f.set_subtract(false);
        assert_eq!(f.bits(), 0xB0);
        f.set_carry(false);
        assert_eq!(f.bits(), 0xA0);
        f.set_subtract(true);
        assert!(f.zero() && f.subtract() && f.half_carry() && !f.carry());
    }
}
