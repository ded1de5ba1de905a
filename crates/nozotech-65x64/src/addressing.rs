//! 65x64 addressing modes.
//!
//! Operands follow the bundle header in the instruction stream. Each
//! resolver consumes its operand bytes starting at PC, advances PC past
//! them, charges the fixed cost of the form and returns the effective
//! address:
//! - Immediate: #n (address of the operand itself)
//! - Absolute: nnnnnnnnnnnnnnnn (flat 64-bit address)
//! - Absolute,X / Absolute,Y
//! - (Absolute) and (Absolute,X): qword pointer in memory
//! - Relative: PC after the operand + signed 16-bit displacement
//! - Relative long: PC after the operand + signed 32-bit displacement
//! - Stack relative: n,S (unsigned displacement)
//! - (Stack relative),Y
//! - Scratch: zn, zn,X, zn,Y (pointer held in a Z register)
//! - (Scratch), (Scratch,X), (Scratch),Y
//!
//! The stack descends. A push writes at SP and then decrements it; a pull
//! increments SP and then reads. Multi-byte values go on high byte first,
//! which leaves them little-endian in memory.

use emu_core::{Bus, Width};

use crate::Emu65x64;
use crate::decode::Mode;

/// Resolved operand of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// No operand.
    Implied,
    /// The accumulator.
    Accumulator,
    /// A memory reference.
    Memory(u64),
}

impl Operand {
    /// Effective address, or 0 when there is no memory reference.
    #[must_use]
    pub const fn address(self) -> u64 {
        match self {
            Self::Memory(address) => address,
            Self::Implied | Self::Accumulator => 0,
        }
    }
}

impl Emu65x64 {
    /// Fetch the byte at PC and advance PC.
    pub(crate) fn fetch_byte(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read_byte(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Fetch a value of the given width at PC and advance PC past it.
    pub(crate) fn fetch_sized(&mut self, bus: &mut impl Bus, width: Width) -> u64 {
        let value = bus.read_sized(self.regs.pc, width);
        self.regs.pc = self.regs.pc.wrapping_add(width.bytes());
        value
    }

    /// Push a byte onto the stack.
    pub(crate) fn push_byte(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write_byte(self.regs.sp.q(), value);
        self.regs.sp.set_q(self.regs.sp.q().wrapping_sub(1));
    }

    /// Pull a byte from the stack.
    pub(crate) fn pull_byte(&mut self, bus: &mut impl Bus) -> u8 {
        self.regs.sp.set_q(self.regs.sp.q().wrapping_add(1));
        bus.read_byte(self.regs.sp.q())
    }

    /// Push a value of the given width (high byte first).
    pub(crate) fn push_sized(&mut self, bus: &mut impl Bus, width: Width, value: u64) {
        for i in (0..width.bytes()).rev() {
            self.push_byte(bus, (value >> (i * 8)) as u8);
        }
    }

    /// Pull a value of the given width (low byte first).
    pub(crate) fn pull_sized(&mut self, bus: &mut impl Bus, width: Width) -> u64 {
        (0..width.bytes()).fold(0, |value, i| {
            value | (u64::from(self.pull_byte(bus)) << (i * 8))
        })
    }

    pub(crate) fn push_qword(&mut self, bus: &mut impl Bus, value: u64) {
        self.push_sized(bus, Width::QWord, value);
    }

    pub(crate) fn pull_qword(&mut self, bus: &mut impl Bus) -> u64 {
        self.pull_sized(bus, Width::QWord)
    }

    // =========================================================================
    // Addressing mode resolvers
    // =========================================================================

    /// Resolve the operand of a decoded slot.
    pub(crate) fn resolve(&mut self, bus: &mut impl Bus, mode: Mode, width: Width) -> Operand {
        match mode {
            Mode::Implied => Operand::Implied,
            Mode::Accumulator => Operand::Accumulator,
            Mode::Immediate => self.addr_immediate(width),
            Mode::ImmediateByte => self.addr_immediate(Width::Byte),
            Mode::Absolute => self.addr_absolute(bus, 0),
            Mode::AbsoluteX => self.addr_absolute(bus, self.regs.x.q()),
            Mode::AbsoluteY => self.addr_absolute(bus, self.regs.y.q()),
            Mode::AbsoluteIndirect => self.addr_absolute_indirect(bus, 0),
            Mode::AbsoluteIndexedIndirect => self.addr_absolute_indirect(bus, self.regs.x.q()),
            Mode::Relative => self.addr_relative(bus, Width::Word),
            Mode::RelativeLong => self.addr_relative(bus, Width::DWord),
            Mode::StackRelative => self.addr_stack_relative(bus),
            Mode::StackRelativeIndirectY => self.addr_stack_relative_indirect_y(bus),
            Mode::Scratch => self.addr_scratch(bus, 0),
            Mode::ScratchX => self.addr_scratch(bus, self.regs.x.q()),
            Mode::ScratchY => self.addr_scratch(bus, self.regs.y.q()),
            Mode::ScratchIndirect => self.addr_scratch_indirect(bus, 0),
            Mode::ScratchIndexedIndirect => self.addr_scratch_indexed_indirect(bus),
            Mode::ScratchIndirectY => self.addr_scratch_indirect(bus, self.regs.y.q()),
        }
    }

    /// Immediate: the operand is the next `width` bytes of the stream.
    fn addr_immediate(&mut self, width: Width) -> Operand {
        let address = self.regs.pc;
        self.regs.pc = address.wrapping_add(width.bytes());
        self.cycles += u64::from(width != Width::Byte);
        Operand::Memory(address)
    }

    /// Absolute, optionally indexed.
    fn addr_absolute(&mut self, bus: &mut impl Bus, index: u64) -> Operand {
        let base = self.fetch_sized(bus, Width::QWord);
        self.cycles += 2;
        Operand::Memory(base.wrapping_add(index))
    }

    /// (Absolute) and (Absolute,X): the index applies before the pointer read.
    fn addr_absolute_indirect(&mut self, bus: &mut impl Bus, index: u64) -> Operand {
        let base = self.fetch_sized(bus, Width::QWord);
        let pointer = bus.read_qword(base.wrapping_add(index));
        self.cycles += 4;
        Operand::Memory(pointer)
    }

    /// Relative: signed displacement from the PC after the operand.
    fn addr_relative(&mut self, bus: &mut impl Bus, width: Width) -> Operand {
        let raw = self.fetch_sized(bus, width);
        let displacement = match width {
            Width::Word => i64::from(raw as u16 as i16),
            _ => i64::from(raw as u32 as i32),
        };
        self.cycles += 1;
        Operand::Memory(self.regs.pc.wrapping_add_signed(displacement))
    }

    /// Stack relative: n,S.
    fn addr_stack_relative(&mut self, bus: &mut impl Bus) -> Operand {
        let displacement = self.fetch_byte(bus);
        self.cycles += 1;
        Operand::Memory(self.regs.sp.q().wrapping_add(u64::from(displacement)))
    }

    /// (Stack relative),Y.
    fn addr_stack_relative_indirect_y(&mut self, bus: &mut impl Bus) -> Operand {
        let displacement = self.fetch_byte(bus);
        let pointer = bus.read_qword(self.regs.sp.q().wrapping_add(u64::from(displacement)));
        self.cycles += 3;
        Operand::Memory(pointer.wrapping_add(self.regs.y.q()))
    }

    /// Scratch: the Z register holds the address, optionally indexed.
    fn addr_scratch(&mut self, bus: &mut impl Bus, index: u64) -> Operand {
        let n = self.fetch_byte(bus);
        self.cycles += 1;
        Operand::Memory(self.regs.scratch(n).q().wrapping_add(index))
    }

    /// (Scratch) and (Scratch),Y: the Z register points at a qword pointer;
    /// the index applies after the pointer read.
    fn addr_scratch_indirect(&mut self, bus: &mut impl Bus, index: u64) -> Operand {
        let n = self.fetch_byte(bus);
        let pointer = bus.read_qword(self.regs.scratch(n).q());
        self.cycles += 5;
        Operand::Memory(pointer.wrapping_add(index))
    }

    /// (Scratch,X): X selects the Z register, wrapping within the bank.
    fn addr_scratch_indexed_indirect(&mut self, bus: &mut impl Bus) -> Operand {
        let n = self.fetch_byte(bus).wrapping_add(self.regs.x.b());
        let pointer = bus.read_qword(self.regs.scratch(n).q());
        self.cycles += 5;
        Operand::Memory(pointer)
    }
}

#[cfg(test)]
mod tests {
    use emu_core::SimpleBus;

    use super::*;
    use crate::Reg;

    fn cpu_at(pc: u64) -> Emu65x64 {
        let mut cpu = Emu65x64::new();
        cpu.regs.pc = pc;
        cpu
    }

    #[test]
    fn push_is_high_byte_first() {
        let mut cpu = cpu_at(0);
        let mut bus = SimpleBus::new();
        cpu.push_sized(&mut bus, Width::Word, 0x1234);

        assert_eq!(bus.peek(0x100), 0x12);
        assert_eq!(bus.peek(0xFF), 0x34);
        assert_eq!(cpu.regs.sp.q(), 0xFE);
        assert_eq!(bus.read_word(0xFF), 0x1234);

        assert_eq!(cpu.pull_sized(&mut bus, Width::Word), 0x1234);
        assert_eq!(cpu.regs.sp.q(), 0x100);
    }

    #[test]
    fn qword_stack_round_trip() {
        let mut cpu = cpu_at(0);
        let mut bus = SimpleBus::new();
        cpu.push_qword(&mut bus, 0x0102_0304_0506_0708);
        assert_eq!(cpu.regs.sp.q(), 0xF8);
        assert_eq!(bus.peek_qword(0xF9), 0x0102_0304_0506_0708);
        assert_eq!(cpu.pull_qword(&mut bus), 0x0102_0304_0506_0708);
    }

    #[test]
    fn immediate_points_at_operand() {
        let mut cpu = cpu_at(0x208);
        let mut bus = SimpleBus::new();

        let op = cpu.resolve(&mut bus, Mode::Immediate, Width::DWord);
        assert_eq!(op, Operand::Memory(0x208));
        assert_eq!(cpu.regs.pc, 0x20C);
        assert_eq!(cpu.cycles, 1);

        let op = cpu.resolve(&mut bus, Mode::ImmediateByte, Width::QWord);
        assert_eq!(op, Operand::Memory(0x20C));
        assert_eq!(cpu.regs.pc, 0x20D);
        assert_eq!(cpu.cycles, 1);
    }

    #[test]
    fn absolute_forms() {
        let mut cpu = cpu_at(0x10);
        let mut bus = SimpleBus::new();
        bus.write_qword(0x10, 0x4000);
        bus.write_qword(0x18, 0x4000);
        bus.write_qword(0x4000, 0xBEEF);
        bus.write_qword(0x4004, 0xCAFE);
        cpu.regs.x = Reg(4);

        assert_eq!(cpu.resolve(&mut bus, Mode::AbsoluteX, Width::Byte), Operand::Memory(0x4004));
        assert_eq!(cpu.cycles, 2);
        assert_eq!(
            cpu.resolve(&mut bus, Mode::AbsoluteIndexedIndirect, Width::Byte),
            Operand::Memory(0xCAFE)
        );
        assert_eq!(cpu.cycles, 6);
        assert_eq!(cpu.regs.pc, 0x20);
    }

    #[test]
    fn relative_is_signed_from_following_byte() {
        let mut cpu = cpu_at(0x1000);
        let mut bus = SimpleBus::new();
        bus.write_word(0x1000, (-4i16) as u16);

        assert_eq!(cpu.resolve(&mut bus, Mode::Relative, Width::Byte), Operand::Memory(0xFFE));
        assert_eq!(cpu.regs.pc, 0x1002);

        bus.write_dword(0x1002, 0x10_0000);
        assert_eq!(
            cpu.resolve(&mut bus, Mode::RelativeLong, Width::Byte),
            Operand::Memory(0x10_1006)
        );
    }

    #[test]
    fn stack_relative_forms() {
        let mut cpu = cpu_at(0);
        let mut bus = SimpleBus::new();
        cpu.regs.sp = Reg(0x80);
        cpu.regs.y = Reg(2);
        bus.write_byte(0, 0x10);
        bus.write_byte(1, 0x10);
        bus.write_qword(0x90, 0x7000);

        assert_eq!(cpu.resolve(&mut bus, Mode::StackRelative, Width::Byte), Operand::Memory(0x90));
        assert_eq!(
            cpu.resolve(&mut bus, Mode::StackRelativeIndirectY, Width::Byte),
            Operand::Memory(0x7002)
        );
        assert_eq!(cpu.cycles, 4);
    }

    #[test]
    fn scratch_forms() {
        let mut cpu = cpu_at(0);
        let mut bus = SimpleBus::new();
        cpu.regs.z[3] = Reg(0x5000);
        cpu.regs.z[5] = Reg(0x6000);
        cpu.regs.x = Reg(2);
        cpu.regs.y = Reg(1);
        bus.write_qword(0x5000, 0x9000);
        bus.write_qword(0x6000, 0xA000);
        bus.load(0, &[0x83, 0x03, 0x03, 0x03, 0x03]);

        assert_eq!(cpu.resolve(&mut bus, Mode::Scratch, Width::Byte), Operand::Memory(0x5000));
        assert_eq!(cpu.resolve(&mut bus, Mode::ScratchX, Width::Byte), Operand::Memory(0x5002));
        assert_eq!(
            cpu.resolve(&mut bus, Mode::ScratchIndirect, Width::Byte),
            Operand::Memory(0x9000)
        );
        assert_eq!(
            cpu.resolve(&mut bus, Mode::ScratchIndexedIndirect, Width::Byte),
            Operand::Memory(0xA000)
        );
        assert_eq!(
            cpu.resolve(&mut bus, Mode::ScratchIndirectY, Width::Byte),
            Operand::Memory(0x9001)
        );
        assert_eq!(cpu.cycles, 1 + 1 + 5 + 5 + 5);
    }

    #[test]
    fn implied_forms_consume_nothing() {
        let mut cpu = cpu_at(0x40);
        let mut bus = SimpleBus::new();
        assert_eq!(cpu.resolve(&mut bus, Mode::Implied, Width::QWord).address(), 0);
        assert_eq!(cpu.resolve(&mut bus, Mode::Accumulator, Width::QWord), Operand::Accumulator);
        assert_eq!(cpu.regs.pc, 0x40);
        assert_eq!(cpu.cycles, 0);
    }
}
