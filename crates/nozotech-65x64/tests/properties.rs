//! Property tests for width handling, decimal arithmetic, the stack and
//! bundle fetch.

mod common;

use common::{NOP, ORIGIN, Program, op, slot};
use emu_core::{Cpu, Width};
use nozotech_65x64::{Reg, alu};
use proptest::prelude::*;

fn width() -> impl Strategy<Value = Width> {
    (0u16..4).prop_map(Width::from_field)
}

/// Packed BCD encoding of a decimal number.
fn to_bcd(mut value: u64) -> u64 {
    let mut bcd = 0;
    let mut shift = 0;
    while value > 0 {
        bcd |= (value % 10) << shift;
        value /= 10;
        shift += 4;
    }
    bcd
}

/// Operand bytes consumed by a slot, given the operative width.
#[derive(Debug, Clone, Copy)]
enum Operands {
    None,
    Immediate,
    Scratch,
    Absolute,
}

impl Operands {
    fn len(self, width: Width) -> usize {
        match self {
            Self::None => 0,
            Self::Immediate => width.bytes() as usize,
            Self::Scratch => 1,
            Self::Absolute => 8,
        }
    }
}

/// Instructions that neither transfer control nor write memory.
const STRAIGHT_LINE: [(u16, Operands); 15] = [
    (0x0EA, Operands::None),      // NOP
    (0x0E8, Operands::None),      // INX
    (0x0AA, Operands::None),      // TAX
    (0x018, Operands::None),      // CLC
    (0x038, Operands::None),      // SEC
    (0x00A, Operands::None),      // ASL A
    (0x0A9, Operands::Immediate), // LDA #
    (0x069, Operands::Immediate), // ADC #
    (0x0C9, Operands::Immediate), // CMP #
    (0x029, Operands::Immediate), // AND #
    (0x0AD, Operands::Absolute),  // LDA abs
    (0x01D, Operands::Absolute),  // ORA abs,X
    (0x02C, Operands::Absolute),  // BIT abs
    (0x0A5, Operands::Scratch),   // LDA z
    (0x043, Operands::Scratch),   // EOR n,S
];

proptest! {
    #[test]
    fn narrow_register_writes_preserve_high_bits(
        initial in any::<u64>(),
        value in any::<u64>(),
        width in width(),
    ) {
        let mut r = Reg(initial);
        r.set(width, value);
        prop_assert_eq!(r.q() & width.mask(), value & width.mask());
        prop_assert_eq!(r.q() & !width.mask(), initial & !width.mask());
    }

    #[test]
    fn immediate_load_truncates_to_width(
        initial in any::<u64>(),
        value in any::<u64>(),
        width in width(),
    ) {
        let bytes = value.to_le_bytes();
        let mut p = Program::new();
        p.bundle(&[slot(0xA9, width)], &bytes[..width.bytes() as usize]);
        let (mut cpu, mut bus) = p.boot();
        cpu.regs.a = Reg(initial);

        cpu.step(&mut bus);

        let mask = width.mask();
        prop_assert_eq!(cpu.regs.a.q(), (initial & !mask) | (value & mask));
    }

    #[test]
    fn decimal_add_matches_decimal_arithmetic(
        a in any::<u64>(),
        b in any::<u64>(),
        carry in any::<bool>(),
        width in width(),
    ) {
        let limit = 10u64.pow(width.nibbles());
        let (a, b) = (a % limit, b % limit);
        let sum = a + b + u64::from(carry);

        let r = alu::add(to_bcd(a), to_bcd(b), carry, width, true);

        prop_assert_eq!(r.value, to_bcd(sum % limit));
        prop_assert_eq!(r.carry, sum >= limit);
    }

    #[test]
    fn decimal_subtract_matches_decimal_arithmetic(
        a in any::<u64>(),
        b in any::<u64>(),
        width in width(),
    ) {
        let limit = 10u64.pow(width.nibbles());
        let (a, b) = (a % limit, b % limit);
        let difference = (a + limit - b) % limit;

        let r = alu::sub(to_bcd(a), to_bcd(b), true, width, true);

        prop_assert_eq!(r.value, to_bcd(difference));
        prop_assert_eq!(r.carry, a >= b);
    }

    #[test]
    fn push_then_pull_restores_register_and_sp(
        value in any::<u64>(),
        register in 0usize..3,
        width in width(),
    ) {
        // (push, load immediate, pull) for A, X, Y
        let (push, load, pull) =
            [(0x48, 0xA9, 0x68), (0xDA, 0xA2, 0xFA), (0x5A, 0xA0, 0x7A)][register];
        let zeros = [0u8; 8];
        let mut p = Program::new();
        p.bundle(
            &[slot(push, width), slot(load, width), slot(pull, width)],
            &zeros[..width.bytes() as usize],
        );
        let (mut cpu, mut bus) = p.boot();
        let reg = Reg(value);
        cpu.regs.a = reg;
        cpu.regs.x = reg;
        cpu.regs.y = reg;

        cpu.step(&mut bus);

        let restored = [cpu.regs.a, cpu.regs.x, cpu.regs.y][register];
        prop_assert_eq!(restored.get(width), reg.get(width));
        prop_assert_eq!(cpu.regs.sp.q(), 0x100);
    }

    #[test]
    fn bundle_advances_by_header_and_operands(
        picks in prop::collection::vec((0..STRAIGHT_LINE.len(), width(), any::<[u8; 8]>()), 4),
        a in any::<u64>(),
        x in any::<u64>(),
    ) {
        let mut slots = Vec::new();
        let mut operands = Vec::new();
        for (index, width, bytes) in picks {
            let (selector, kind) = STRAIGHT_LINE[index];
            slots.push(slot(selector, width));
            operands.extend_from_slice(&bytes[..kind.len(width)]);
        }
        let mut p = Program::new();
        p.bundle(&slots, &operands);
        let (mut cpu, mut bus) = p.boot();
        cpu.regs.a = Reg(a);
        cpu.regs.x = Reg(x);

        cpu.step(&mut bus);

        prop_assert!(!cpu.is_halted());
        prop_assert_eq!(cpu.pc(), ORIGIN + 8 + operands.len() as u64);
    }

    #[test]
    fn masked_interrupt_leaves_state_alone(masked_steps in 1u64..5) {
        let mut p = Program::new();
        for _ in 0..masked_steps {
            p.bundle(&[NOP], &[]);
        }
        p.bundle(&[op(0x58)], &[]);
        let (mut cpu, mut bus) = p.boot();

        prop_assert!(!cpu.interrupt());
        for i in 1..=masked_steps {
            cpu.step(&mut bus);
            prop_assert!(cpu.interrupt_pending());
            prop_assert_eq!(cpu.pc(), ORIGIN + 8 * i);
            prop_assert_eq!(cpu.regs.p.0, 0x34);
            prop_assert_eq!(cpu.regs.sp.q(), 0x100);
        }

        // CLI unmasks; the next step services the interrupt
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        prop_assert!(!cpu.interrupt_pending());
        prop_assert_eq!(cpu.regs.sp.q(), 0x100 - 16);
        prop_assert!(cpu.regs.p.is_set(nozotech_65x64::flags::I));
    }
}
