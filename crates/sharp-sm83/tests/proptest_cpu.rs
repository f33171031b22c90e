//! Property-based tests for CPU invariants.

use emu_core::{Cpu, SimpleBus};
use proptest::prelude::*;
use sharp_sm83::{Flags, Registers, Sm83};

const ILLEGAL: [u8; 11] = [
    0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
];

fn legal_opcodes() -> Vec<u8> {
    (0..=0xFFu8).filter(|op| !ILLEGAL.contains(op)).collect()
}

fn arb_registers() -> impl Strategy<Value = Registers> {
    (
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
    )
        .prop_map(|(af, bc, de, hl, sp)| {
            let mut regs = Registers {
                sp,
                pc: 0x0100,
                ..Registers::default()
            };
            regs.set_af(af);
            regs.set_bc(bc);
            regs.set_de(de);
            regs.set_hl(hl);
            regs
        })
}

/// Run one instruction at 0x0100 with the given operand bytes after it.
fn step_once(regs: Registers, program: &[u8]) -> (Sm83, SimpleBus) {
    let mut bus = SimpleBus::new();
    bus.load(0x0100, program);
    let mut cpu = Sm83::with_registers(regs);
    cpu.step(&mut bus).expect("no fault on a flat bus");
    (cpu, bus)
}

proptest! {
    /// Property: writing a pair and reading it back is the identity (AF
    /// drops the low nibble of F).
    #[test]
    fn prop_pair_round_trip(value in any::<u16>()) {
        let mut regs = Registers::default();
        regs.set_bc(value);
        regs.set_de(value);
        regs.set_hl(value);
        regs.set_af(value);
        prop_assert_eq!(regs.bc(), value);
        prop_assert_eq!(regs.de(), value);
        prop_assert_eq!(regs.hl(), value);
        prop_assert_eq!(regs.af(), value & 0xFFF0);
    }

    /// Property: flag accessors read back what the constructor was given.
    #[test]
    fn prop_flags_round_trip(z: bool, n: bool, h: bool, c: bool) {
        let f = Flags::new(z, n, h, c);
        prop_assert_eq!((f.zero(), f.subtract(), f.half_carry(), f.carry()), (z, n, h, c));
        prop_assert_eq!(Flags::from_bits(f.bits()), f);
    }

    /// Property: `set(rank)` then `get(rank)` returns the value for every rank.
    #[test]
    fn prop_operand_round_trip(rank in 0u8..8, value in any::<u8>(), regs in arb_registers()) {
        let mut bus = SimpleBus::new();
        let mut cpu = Sm83::with_registers(regs);
        cpu.set(&mut bus, rank, value).expect("valid rank");
        prop_assert_eq!(cpu.get(&mut bus, rank).expect("valid rank"), value);
    }

    /// Property: ranks above 7 are always rejected.
    #[test]
    fn prop_rank_above_seven_faults(rank in 8u8..) {
        let mut bus = SimpleBus::new();
        let mut cpu = Sm83::new();
        prop_assert!(cpu.get(&mut bus, rank).is_err());
    }

    /// Property: ADD A, n computes the wrapped sum with every flag from it.
    #[test]
    fn prop_add_immediate(a in any::<u8>(), n in any::<u8>(), regs in arb_registers()) {
        let regs = Registers { a, ..regs };
        let (cpu, _) = step_once(regs, &[0xC6, n]);
        let sum = u16::from(a) + u16::from(n);
        let f = cpu.regs().f;
        prop_assert_eq!(cpu.regs().a, sum as u8);
        prop_assert_eq!(f.zero(), sum as u8 == 0);
        prop_assert_eq!(f.carry(), sum > 0xFF);
        prop_assert_eq!(f.half_carry(), (a & 0x0F) + (n & 0x0F) > 0x0F);
        prop_assert!(!f.subtract());
        prop_assert_eq!(f.bits() & 0x0F, 0);
    }

    /// Property: ADC adds the incoming carry to the operand, then flags
    /// follow the plain add rules.
    #[test]
    fn prop_adc_immediate(a in any::<u8>(), n in any::<u8>(), carry: bool) {
        let mut regs = Registers { a, pc: 0x0100, ..Registers::default() };
        regs.f.set_carry(carry);
        let (cpu, _) = step_once(regs, &[0xCE, n]);
        let operand = u16::from(n) + u16::from(carry);
        let sum = u16::from(a) + operand;
        let f = cpu.regs().f;
        prop_assert_eq!(cpu.regs().a, sum as u8);
        prop_assert_eq!(f.zero(), sum as u8 == 0);
        prop_assert_eq!(f.carry(), sum > 0xFF);
        prop_assert_eq!(f.half_carry(), u16::from(a & 0x0F) + (operand & 0x0F) > 0x0F);
    }

    /// Property: SBC adds the incoming carry to the operand, then flags
    /// follow the plain subtract rules.
    #[test]
    fn prop_sbc_immediate(a in any::<u8>(), n in any::<u8>(), carry: bool) {
        let mut regs = Registers { a, pc: 0x0100, ..Registers::default() };
        regs.f.set_carry(carry);
        let (cpu, _) = step_once(regs, &[0xDE, n]);
        let operand = u16::from(n) + u16::from(carry);
        let f = cpu.regs().f;
        prop_assert_eq!(cpu.regs().a, u16::from(a).wrapping_sub(operand) as u8);
        prop_assert!(f.subtract());
        prop_assert_eq!(f.carry(), u16::from(a) < operand);
        prop_assert_eq!(f.half_carry(), u16::from(a & 0x0F) < operand & 0x0F);
    }

    /// Property: SUB n then ADD n restores A.
    #[test]
    fn prop_sub_then_add_restores(a in any::<u8>(), n in any::<u8>()) {
        let mut bus = SimpleBus::new();
        bus.load(0x0100, &[0xD6, n, 0xC6, n]);
        let mut cpu = Sm83::with_registers(Registers { a, pc: 0x0100, ..Registers::default() });
        cpu.step(&mut bus).expect("sub");
        cpu.step(&mut bus).expect("add");
        prop_assert_eq!(cpu.regs().a, a);
    }

    /// Property: PUSH then POP of the same pair restores it and SP.
    #[test]
    fn prop_push_pop_identity(regs in arb_registers(), sp in 0xC002u16..0xE000) {
        let regs = Registers { sp, ..regs };
        let mut bus = SimpleBus::new();
        // PUSH BC; LD BC, 0; POP BC
        bus.load(0x0100, &[0xC5, 0x01, 0x00, 0x00, 0xC1]);
        let mut cpu = Sm83::with_registers(regs);
        for _ in 0..3 {
            cpu.step(&mut bus).expect("valid");
        }
        prop_assert_eq!(cpu.regs().bc(), regs.bc());
        prop_assert_eq!(cpu.regs().sp, sp);
    }

    /// Property: no legal opcode ever sets the low nibble of F.
    #[test]
    fn prop_flag_low_nibble_stays_clear(
        opcode in prop::sample::select(legal_opcodes()),
        operand1 in any::<u8>(),
        operand2 in any::<u8>(),
        regs in arb_registers(),
    ) {
        let (cpu, _) = step_once(regs, &[opcode, operand1, operand2]);
        prop_assert_eq!(cpu.regs().f.bits() & 0x0F, 0);
    }

    /// Property: every legal opcode costs at least one cycle and at most six.
    #[test]
    fn prop_cycle_bounds(
        opcode in prop::sample::select(legal_opcodes()),
        operand1 in any::<u8>(),
        operand2 in any::<u8>(),
        regs in arb_registers(),
    ) {
        let mut bus = SimpleBus::new();
        bus.load(0x0100, &[opcode, operand1, operand2]);
        let mut cpu = Sm83::with_registers(regs);
        let cycles = cpu.step(&mut bus).expect("no fault on a flat bus").get();
        prop_assert!((1..=6).contains(&cycles), "{opcode:#04X} took {cycles}");
    }
}
