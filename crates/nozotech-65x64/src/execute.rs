//! 65x64 instruction handlers.
//!
//! Each handler receives the resolved operand and the operative width.
//! Addressing cost has already been charged by the resolver; handlers add
//! the cost of the operation itself.

use emu_core::bits::{dswap, qswap, swap};
use emu_core::{Bus, Width};

use crate::addressing::Operand;
use crate::config::BRK_VECTOR;
use crate::cpu::StopReason;
use crate::decode::Instr;
use crate::flags::{C, D, I, N, V, Z};
use crate::{CopPayload, Emu65x64, Reg, alu};

/// Whether the rest of the bundle runs after a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    /// Control left the bundle (transfer, halt or trap).
    EndBundle,
}

/// Register named by a load, transfer or stack instruction.
#[derive(Debug, Clone, Copy)]
enum Target {
    A,
    X,
    Y,
}

/// Extra cycle for instructions whose cost grows past byte width.
fn wide(width: Width) -> u64 {
    u64::from(width != Width::Byte)
}

impl Emu65x64 {
    /// Execute one decoded slot.
    pub(crate) fn execute(
        &mut self,
        bus: &mut impl Bus,
        instr: Instr,
        operand: Operand,
        width: Width,
    ) -> Flow {
        match instr {
            // Loads and stores
            Instr::Lda => self.op_load(bus, Target::A, operand, width),
            Instr::Ldx => self.op_load(bus, Target::X, operand, width),
            Instr::Ldy => self.op_load(bus, Target::Y, operand, width),
            Instr::Sta => self.op_store(bus, operand, width, self.regs.a.q()),
            Instr::Stx => self.op_store(bus, operand, width, self.regs.x.q()),
            Instr::Sty => self.op_store(bus, operand, width, self.regs.y.q()),
            Instr::Stz => self.op_store(bus, operand, width, 0),

            // Logic and arithmetic
            Instr::And => self.op_logic(bus, operand, width, |a, m| a & m),
            Instr::Ora => self.op_logic(bus, operand, width, |a, m| a | m),
            Instr::Eor => self.op_logic(bus, operand, width, |a, m| a ^ m),
            Instr::Adc => self.op_adc(bus, operand, width),
            Instr::Sbc => self.op_sbc(bus, operand, width),
            Instr::Cmp => self.op_compare(bus, self.regs.a, operand, width),
            Instr::Cpx => self.op_compare(bus, self.regs.x, operand, width),
            Instr::Cpy => self.op_compare(bus, self.regs.y, operand, width),
            Instr::Bit => self.op_bit(bus, operand, width),
            Instr::BitImm => self.op_bit_immediate(bus, operand, width),
            Instr::Tsb => self.op_test_bits(bus, operand, width, true),
            Instr::Trb => self.op_test_bits(bus, operand, width, false),

            // Read-modify-write
            Instr::Inc | Instr::IncA => {
                self.op_modify(bus, operand, width, |_, v, w| w.truncate(v.wrapping_add(1)));
            }
            Instr::Dec | Instr::DecA => {
                self.op_modify(bus, operand, width, |_, v, w| w.truncate(v.wrapping_sub(1)));
            }
            Instr::Asl | Instr::AslA => {
                self.op_modify(bus, operand, width, |cpu, v, w| {
                    cpu.regs.p.set_if(C, v & w.sign_bit() != 0);
                    w.truncate(v << 1)
                });
            }
            Instr::Lsr | Instr::LsrA => {
                self.op_modify(bus, operand, width, |cpu, v, _| {
                    cpu.regs.p.set_if(C, v & 1 != 0);
                    v >> 1
                });
            }
            Instr::Rol | Instr::RolA => {
                self.op_modify(bus, operand, width, |cpu, v, w| {
                    let carry_in = cpu.regs.p.carry();
                    cpu.regs.p.set_if(C, v & w.sign_bit() != 0);
                    w.truncate(v << 1) | carry_in
                });
            }
            Instr::Ror | Instr::RorA => {
                self.op_modify(bus, operand, width, |cpu, v, w| {
                    let carry_in = if cpu.regs.p.is_set(C) { w.sign_bit() } else { 0 };
                    cpu.regs.p.set_if(C, v & 1 != 0);
                    (v >> 1) | carry_in
                });
            }

            // Index arithmetic
            Instr::Inx => self.op_step_register(Target::X, width, 1),
            Instr::Iny => self.op_step_register(Target::Y, width, 1),
            Instr::Dex => self.op_step_register(Target::X, width, u64::MAX),
            Instr::Dey => self.op_step_register(Target::Y, width, u64::MAX),

            // Transfers
            Instr::Tax => self.op_transfer(Target::A, Target::X, width),
            Instr::Tay => self.op_transfer(Target::A, Target::Y, width),
            Instr::Txa => self.op_transfer(Target::X, Target::A, width),
            Instr::Tya => self.op_transfer(Target::Y, Target::A, width),
            Instr::Txy => self.op_transfer(Target::X, Target::Y, width),
            Instr::Tyx => self.op_transfer(Target::Y, Target::X, width),
            Instr::Tsx => {
                self.regs.x = self.regs.sp;
                self.regs.p.update_nz(self.regs.x.q(), Width::QWord);
                self.cycles += 2;
            }
            Instr::Tsa => {
                self.regs.a = self.regs.sp;
                self.regs.p.update_nz(self.regs.a.q(), Width::QWord);
                self.cycles += 2;
            }
            Instr::Txs => {
                self.regs.sp = self.regs.x;
                self.cycles += 2;
            }
            Instr::Tas => {
                self.regs.sp = self.regs.a;
                self.cycles += 2;
            }
            Instr::Xba => self.op_xba(width),
            Instr::Xce => {
                let carry = self.regs.p.is_set(C);
                self.regs.p.set_if(C, self.regs.e);
                self.regs.e = carry;
                self.cycles += 2;
            }

            // Status register
            Instr::Clc => self.op_flag(C, false),
            Instr::Sec => self.op_flag(C, true),
            Instr::Cli => self.op_flag(I, false),
            Instr::Sei => self.op_flag(I, true),
            Instr::Cld => self.op_flag(D, false),
            Instr::Sed => self.op_flag(D, true),
            Instr::Clv => self.op_flag(V, false),
            Instr::Rep => {
                let mask = bus.read_byte(operand.address());
                self.regs.p.clear(mask);
                self.cycles += 3;
            }
            Instr::Sep => {
                let mask = bus.read_byte(operand.address());
                self.regs.p.set(mask);
                self.cycles += 3;
            }

            // Branches
            Instr::Bpl => return self.op_branch(!self.regs.p.is_set(N), operand),
            Instr::Bmi => return self.op_branch(self.regs.p.is_set(N), operand),
            Instr::Bvc => return self.op_branch(!self.regs.p.is_set(V), operand),
            Instr::Bvs => return self.op_branch(self.regs.p.is_set(V), operand),
            Instr::Bcc => return self.op_branch(!self.regs.p.is_set(C), operand),
            Instr::Bcs => return self.op_branch(self.regs.p.is_set(C), operand),
            Instr::Bne => return self.op_branch(!self.regs.p.is_set(Z), operand),
            Instr::Beq => return self.op_branch(self.regs.p.is_set(Z), operand),
            Instr::Bra | Instr::Brl => return self.op_branch(true, operand),

            // Jumps and subroutines
            Instr::Jmp => {
                self.regs.pc = operand.address();
                self.cycles += 1;
                return Flow::EndBundle;
            }
            Instr::Jsr => {
                self.push_qword(bus, self.regs.pc.wrapping_sub(1));
                self.regs.pc = operand.address();
                self.cycles += 4;
                return Flow::EndBundle;
            }
            Instr::Rts => {
                self.regs.pc = self.pull_qword(bus).wrapping_add(1);
                self.cycles += 6;
                return Flow::EndBundle;
            }
            Instr::Rti => {
                let p = self.pull_qword(bus);
                self.regs.p.set_sized(Width::QWord, p);
                self.regs.pc = self.pull_qword(bus);
                self.cycles += 7;
                return Flow::EndBundle;
            }
            Instr::Brk => {
                self.enter_vector(bus, BRK_VECTOR);
                return Flow::EndBundle;
            }

            // Traps and halts
            Instr::Cop => {
                self.op_cop(bus, operand);
                return Flow::EndBundle;
            }
            Instr::Wai => {
                self.cycles += 3;
                self.halt(StopReason::Wait);
                return Flow::EndBundle;
            }
            Instr::Stp => {
                self.cycles += 3;
                self.halt(StopReason::Stop);
                return Flow::EndBundle;
            }
            Instr::Nop => self.cycles += 2,

            // Stack
            Instr::Pha => self.op_push(bus, self.regs.a.get(width), width),
            Instr::Phx => self.op_push(bus, self.regs.x.get(width), width),
            Instr::Phy => self.op_push(bus, self.regs.y.get(width), width),
            Instr::Php => self.op_push(bus, self.regs.p.get(width), width),
            Instr::Pla => self.op_pull(bus, Target::A, width),
            Instr::Plx => self.op_pull(bus, Target::X, width),
            Instr::Ply => self.op_pull(bus, Target::Y, width),
            Instr::Plp => {
                let value = self.pull_sized(bus, width);
                self.regs.p.set_sized(width, value);
                self.cycles += 4 + wide(width);
            }
            Instr::Pea => {
                let value = bus.read_sized(operand.address(), width);
                self.push_sized(bus, width, value);
                self.cycles += 5;
            }
            Instr::Pei => {
                let value = bus.read_sized(operand.address(), width);
                self.push_sized(bus, width, value);
                self.cycles += 6;
            }
            Instr::Per => {
                self.push_qword(bus, operand.address());
                self.cycles += 6;
            }

            // Block moves
            Instr::Mvn => return self.op_block_move(bus, width, 1),
            Instr::Mvp => return self.op_block_move(bus, width, u64::MAX),
        }
        Flow::Continue
    }

    fn register_mut(&mut self, target: Target) -> &mut Reg {
        match target {
            Target::A => &mut self.regs.a,
            Target::X => &mut self.regs.x,
            Target::Y => &mut self.regs.y,
        }
    }

    fn read_operand(&self, bus: &mut impl Bus, operand: Operand, width: Width) -> u64 {
        match operand {
            Operand::Memory(address) => bus.read_sized(address, width),
            Operand::Accumulator => self.regs.a.get(width),
            Operand::Implied => 0,
        }
    }

    fn write_operand(&mut self, bus: &mut impl Bus, operand: Operand, width: Width, value: u64) {
        match operand {
            Operand::Memory(address) => bus.write_sized(address, value, width),
            Operand::Accumulator => self.regs.a.set(width, value),
            Operand::Implied => {}
        }
    }

    // =========================================================================
    // Loads, stores, logic, arithmetic
    // =========================================================================

    fn op_load(&mut self, bus: &mut impl Bus, target: Target, operand: Operand, width: Width) {
        let value = self.read_operand(bus, operand, width);
        self.register_mut(target).set(width, value);
        self.regs.p.update_nz(value, width);
        self.cycles += 2 + wide(width);
    }

    fn op_store(&mut self, bus: &mut impl Bus, operand: Operand, width: Width, value: u64) {
        self.write_operand(bus, operand, width, value);
        self.cycles += 2 + wide(width);
    }

    fn op_logic(
        &mut self,
        bus: &mut impl Bus,
        operand: Operand,
        width: Width,
        f: impl Fn(u64, u64) -> u64,
    ) {
        let m = self.read_operand(bus, operand, width);
        let value = f(self.regs.a.get(width), m);
        self.regs.a.set(width, value);
        self.regs.p.update_nz(value, width);
        self.cycles += 2 + wide(width);
    }

    fn op_adc(&mut self, bus: &mut impl Bus, operand: Operand, width: Width) {
        let m = self.read_operand(bus, operand, width);
        let p = self.regs.p;
        let r = alu::add(self.regs.a.q(), m, p.is_set(C), width, p.is_set(D));
        self.finish_arithmetic(r, width);
    }

    fn op_sbc(&mut self, bus: &mut impl Bus, operand: Operand, width: Width) {
        let m = self.read_operand(bus, operand, width);
        let p = self.regs.p;
        let r = alu::sub(self.regs.a.q(), m, p.is_set(C), width, p.is_set(D));
        self.finish_arithmetic(r, width);
    }

    fn finish_arithmetic(&mut self, r: alu::AluResult, width: Width) {
        self.regs.a.set(width, r.value);
        self.regs.p.set_if(C, r.carry);
        self.regs.p.set_if(V, r.overflow);
        self.regs.p.update_nz(r.value, width);
        self.cycles += 2 + wide(width);
    }

    fn op_compare(&mut self, bus: &mut impl Bus, reg: Reg, operand: Operand, width: Width) {
        let m = self.read_operand(bus, operand, width);
        let (difference, carry) = alu::compare(reg.q(), m, width);
        self.regs.p.set_if(C, carry);
        self.regs.p.update_nz(difference, width);
        self.cycles += 2 + wide(width);
    }

    /// BIT: Z from A AND M; N and V copy the two top bits of M.
    fn op_bit(&mut self, bus: &mut impl Bus, operand: Operand, width: Width) {
        let m = self.read_operand(bus, operand, width);
        let sign = width.sign_bit();
        self.regs.p.set_if(Z, self.regs.a.get(width) & m == 0);
        self.regs.p.set_if(N, m & sign != 0);
        self.regs.p.set_if(V, m & (sign >> 1) != 0);
        self.cycles += 2 + wide(width);
    }

    /// BIT #imm only affects Z.
    fn op_bit_immediate(&mut self, bus: &mut impl Bus, operand: Operand, width: Width) {
        let m = self.read_operand(bus, operand, width);
        self.regs.p.set_if(Z, self.regs.a.get(width) & m == 0);
        self.cycles += 2;
    }

    /// TSB/TRB: Z from A AND M, then set or reset the A bits in M.
    fn op_test_bits(&mut self, bus: &mut impl Bus, operand: Operand, width: Width, set: bool) {
        let m = self.read_operand(bus, operand, width);
        let a = self.regs.a.get(width);
        self.regs.p.set_if(Z, a & m == 0);
        let value = if set { m | a } else { m & !a };
        self.write_operand(bus, operand, width, value);
        self.cycles += 5;
    }

    /// Shared read-modify-write path for INC/DEC and the shifts. The
    /// accumulator form is cheaper than the memory form.
    fn op_modify(
        &mut self,
        bus: &mut impl Bus,
        operand: Operand,
        width: Width,
        f: impl FnOnce(&mut Self, u64, Width) -> u64,
    ) {
        let value = self.read_operand(bus, operand, width);
        let result = f(self, value, width);
        self.write_operand(bus, operand, width, result);
        self.regs.p.update_nz(result, width);
        self.cycles += match operand {
            Operand::Memory(_) => 4 + wide(width),
            Operand::Accumulator | Operand::Implied => 2,
        };
    }

    fn op_step_register(&mut self, target: Target, width: Width, delta: u64) {
        let reg = self.register_mut(target);
        let value = width.truncate(reg.get(width).wrapping_add(delta));
        reg.set(width, value);
        self.regs.p.update_nz(value, width);
        self.cycles += 2;
    }

    // =========================================================================
    // Register and status operations
    // =========================================================================

    fn op_transfer(&mut self, from: Target, to: Target, width: Width) {
        let value = self.register_mut(from).get(width);
        self.register_mut(to).set(width, value);
        self.regs.p.update_nz(value, width);
        self.cycles += 2;
    }

    /// XBA: exchange the two halves of A at the operative width.
    fn op_xba(&mut self, width: Width) {
        let a = self.regs.a.get(width);
        let value = match width {
            Width::Byte => ((a & 0x0F) << 4) | (a >> 4),
            Width::Word => u64::from(swap(a as u16)),
            Width::DWord => u64::from(dswap(a as u32)),
            Width::QWord => qswap(a),
        };
        self.regs.a.set(width, value);
        self.regs.p.update_nz(value, width);
        self.cycles += 3;
    }

    fn op_flag(&mut self, flag: u8, set: bool) {
        self.regs.p.set_if(flag, set);
        self.cycles += 2;
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn op_branch(&mut self, taken: bool, operand: Operand) -> Flow {
        if !taken {
            self.cycles += 2;
            return Flow::Continue;
        }
        let target = operand.address();
        self.cycles += 3;
        if self.regs.e && (self.regs.pc ^ target) & 0xFF00 != 0 {
            self.cycles += 1;
        }
        self.regs.pc = target;
        Flow::EndBundle
    }

    /// Push PC and P, mask interrupts, leave decimal mode and jump through
    /// a 64-bit vector. Shared by BRK and interrupt entry.
    pub(crate) fn enter_vector(&mut self, bus: &mut impl Bus, vector: u64) {
        self.push_qword(bus, self.regs.pc);
        self.push_qword(bus, self.regs.p.get(Width::QWord));
        self.regs.p.set(I);
        self.regs.p.clear(D);
        self.regs.pc = bus.read_qword(vector);
        self.cycles += 8;
    }

    /// COP: capture a coprocessor instruction and trap to the host.
    ///
    /// Layout at the operand: length byte N, opcode byte, then N payload
    /// words. The length byte was consumed by the resolver.
    fn op_cop(&mut self, bus: &mut impl Bus, operand: Operand) {
        let start = operand.address();
        let length = bus.read_byte(start);
        let opcode = bus.read_byte(start.wrapping_add(1));
        let words = (0..u64::from(length))
            .map(|i| bus.read_word(start.wrapping_add(2 + i * 2)))
            .collect();
        self.regs.pc = self.regs.pc.wrapping_add(1 + 2 * u64::from(length));

        // A pending payload keeps the core halted, so COP cannot run again
        // until the host has taken it.
        debug_assert!(self.cop.is_none(), "COP with a payload pending");
        self.cop = Some(CopPayload::new(opcode, words));
        self.halt(StopReason::Coprocessor);
    }

    // =========================================================================
    // Stack
    // =========================================================================

    fn op_push(&mut self, bus: &mut impl Bus, value: u64, width: Width) {
        self.push_sized(bus, width, value);
        self.cycles += 3 + wide(width);
    }

    fn op_pull(&mut self, bus: &mut impl Bus, target: Target, width: Width) {
        let value = self.pull_sized(bus, width);
        self.register_mut(target).set(width, value);
        self.regs.p.update_nz(value, width);
        self.cycles += 4 + wide(width);
    }

    /// MVN/MVP: copy one byte from [X] to [Y], step both by `delta` and
    /// count A down at the operative width.
    ///
    /// Until A reaches all-ones the bundle is rewound, so the next step runs
    /// it again. A move of A+1 bytes takes A+1 steps.
    fn op_block_move(&mut self, bus: &mut impl Bus, width: Width, delta: u64) -> Flow {
        let byte = bus.read_byte(self.regs.x.q());
        bus.write_byte(self.regs.y.q(), byte);
        self.regs.x.set_q(self.regs.x.q().wrapping_add(delta));
        self.regs.y.set_q(self.regs.y.q().wrapping_add(delta));
        let count = width.truncate(self.regs.a.get(width).wrapping_sub(1));
        self.regs.a.set(width, count);
        self.cycles += 7;
        if count == width.mask() {
            Flow::Continue
        } else {
            self.regs.pc = self.regs.tpc;
            Flow::EndBundle
        }
    }
}
