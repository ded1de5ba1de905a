//! Slot decoding.
//!
//! A slot is a 16-bit word: bits 0-9 select the instruction, bits 10-11
//! carry a width for sized instructions, bits 12-15 are ignored. Selectors
//! 0x000-0x0FF follow the classic 65xx opcode layout; everything else is
//! unassigned.
//!
//! Where the ancestor architecture used the direct page, the 65x64 uses the
//! scratch (Z) bank. Its 24-bit "long" forms collapse onto the flat 64-bit
//! absolute forms.

use emu_core::Width;

/// Mask selecting the instruction selector within a slot.
pub const SELECTOR_MASK: u16 = 0x3FF;

/// Addressing form of a decoded slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Implied,
    Accumulator,
    /// Immediate at the operative width.
    Immediate,
    /// Immediate byte regardless of width.
    ImmediateByte,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    AbsoluteIndirect,
    AbsoluteIndexedIndirect,
    Relative,
    RelativeLong,
    StackRelative,
    StackRelativeIndirectY,
    Scratch,
    ScratchX,
    ScratchY,
    ScratchIndirect,
    ScratchIndexedIndirect,
    ScratchIndirectY,
}

/// Instruction mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    Adc,
    And,
    Asl,
    AslA,
    Bcc,
    Bcs,
    Beq,
    Bit,
    BitImm,
    Bmi,
    Bne,
    Bpl,
    Bra,
    Brk,
    Brl,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cop,
    Cpx,
    Cpy,
    Dec,
    DecA,
    Dex,
    Dey,
    Eor,
    Inc,
    IncA,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    LsrA,
    Mvn,
    Mvp,
    Nop,
    Ora,
    Pea,
    Pei,
    Per,
    Pha,
    Php,
    Phx,
    Phy,
    Pla,
    Plp,
    Plx,
    Ply,
    Rep,
    Rol,
    RolA,
    Ror,
    RorA,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sep,
    Sta,
    Stp,
    Stx,
    Sty,
    Stz,
    Tas,
    Tax,
    Tay,
    Trb,
    Tsa,
    Tsb,
    Tsx,
    Txa,
    Txs,
    Txy,
    Tya,
    Tyx,
    Wai,
    Xba,
    Xce,
}

impl Instr {
    /// Assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Adc => "ADC",
            Self::And => "AND",
            Self::Asl | Self::AslA => "ASL",
            Self::Bcc => "BCC",
            Self::Bcs => "BCS",
            Self::Beq => "BEQ",
            Self::Bit | Self::BitImm => "BIT",
            Self::Bmi => "BMI",
            Self::Bne => "BNE",
            Self::Bpl => "BPL",
            Self::Bra => "BRA",
            Self::Brk => "BRK",
            Self::Brl => "BRL",
            Self::Bvc => "BVC",
            Self::Bvs => "BVS",
            Self::Clc => "CLC",
            Self::Cld => "CLD",
            Self::Cli => "CLI",
            Self::Clv => "CLV",
            Self::Cmp => "CMP",
            Self::Cop => "COP",
            Self::Cpx => "CPX",
            Self::Cpy => "CPY",
            Self::Dec | Self::DecA => "DEC",
            Self::Dex => "DEX",
            Self::Dey => "DEY",
            Self::Eor => "EOR",
            Self::Inc | Self::IncA => "INC",
            Self::Inx => "INX",
            Self::Iny => "INY",
            Self::Jmp => "JMP",
            Self::Jsr => "JSR",
            Self::Lda => "LDA",
            Self::Ldx => "LDX",
            Self::Ldy => "LDY",
            Self::Lsr | Self::LsrA => "LSR",
            Self::Mvn => "MVN",
            Self::Mvp => "MVP",
            Self::Nop => "NOP",
            Self::Ora => "ORA",
            Self::Pea => "PEA",
            Self::Pei => "PEI",
            Self::Per => "PER",
            Self::Pha => "PHA",
            Self::Php => "PHP",
            Self::Phx => "PHX",
            Self::Phy => "PHY",
            Self::Pla => "PLA",
            Self::Plp => "PLP",
            Self::Plx => "PLX",
            Self::Ply => "PLY",
            Self::Rep => "REP",
            Self::Rol | Self::RolA => "ROL",
            Self::Ror | Self::RorA => "ROR",
            Self::Rti => "RTI",
            Self::Rts => "RTS",
            Self::Sbc => "SBC",
            Self::Sec => "SEC",
            Self::Sed => "SED",
            Self::Sei => "SEI",
            Self::Sep => "SEP",
            Self::Sta => "STA",
            Self::Stp => "STP",
            Self::Stx => "STX",
            Self::Sty => "STY",
            Self::Stz => "STZ",
            Self::Tas => "TAS",
            Self::Tax => "TAX",
            Self::Tay => "TAY",
            Self::Trb => "TRB",
            Self::Tsa => "TSA",
            Self::Tsb => "TSB",
            Self::Tsx => "TSX",
            Self::Txa => "TXA",
            Self::Txs => "TXS",
            Self::Txy => "TXY",
            Self::Tya => "TYA",
            Self::Tyx => "TYX",
            Self::Wai => "WAI",
            Self::Xba => "XBA",
            Self::Xce => "XCE",
        }
    }

    /// True for instructions whose operand width follows the slot width
    /// field (or byte width in emulation mode). The rest work on full
    /// 64-bit values or have no data operand.
    #[must_use]
    pub const fn is_sized(self) -> bool {
        !matches!(
            self,
            Self::Bcc
                | Self::Bcs
                | Self::Beq
                | Self::Bmi
                | Self::Bne
                | Self::Bpl
                | Self::Bra
                | Self::Brk
                | Self::Brl
                | Self::Bvc
                | Self::Bvs
                | Self::Clc
                | Self::Cld
                | Self::Cli
                | Self::Clv
                | Self::Cop
                | Self::Jmp
                | Self::Jsr
                | Self::Nop
                | Self::Per
                | Self::Rep
                | Self::Rti
                | Self::Rts
                | Self::Sec
                | Self::Sed
                | Self::Sei
                | Self::Sep
                | Self::Stp
                | Self::Tas
                | Self::Tsa
                | Self::Tsx
                | Self::Txs
                | Self::Wai
                | Self::Xce
        )
    }
}

/// Decoded slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub selector: u16,
    pub width: Width,
}

impl Slot {
    #[must_use]
    pub const fn from_word(word: u16) -> Self {
        Self {
            selector: word & SELECTOR_MASK,
            width: Width::from_field(word >> 10),
        }
    }
}

/// Look up the instruction and addressing form bound to a selector.
///
/// Returns `None` for unassigned selectors.
#[must_use]
pub const fn decode(selector: u16) -> Option<(Instr, Mode)> {
    use Instr::*;
    use Mode::*;

    let entry = match selector {
        0x00 => (Brk, ImmediateByte),
        0x01 => (Ora, ScratchIndexedIndirect),
        0x02 => (Cop, ImmediateByte),
        0x03 => (Ora, StackRelative),
        0x04 => (Tsb, Scratch),
        0x05 => (Ora, Scratch),
        0x06 => (Asl, Scratch),
        0x07 => (Ora, ScratchIndirect),
        0x08 => (Php, Implied),
        0x09 => (Ora, Immediate),
        0x0A => (AslA, Accumulator),
        0x0C => (Tsb, Absolute),
        0x0D => (Ora, Absolute),
        0x0E => (Asl, Absolute),
        0x0F => (Ora, Absolute),

        0x10 => (Bpl, Relative),
        0x11 => (Ora, ScratchIndirectY),
        0x12 => (Ora, ScratchIndirect),
        0x13 => (Ora, StackRelativeIndirectY),
        0x14 => (Trb, Scratch),
        0x15 => (Ora, ScratchX),
        0x16 => (Asl, ScratchX),
        0x17 => (Ora, ScratchIndirectY),
        0x18 => (Clc, Implied),
        0x19 => (Ora, AbsoluteY),
        0x1A => (IncA, Accumulator),
        0x1B => (Tas, Implied),
        0x1C => (Trb, Absolute),
        0x1D => (Ora, AbsoluteX),
        0x1E => (Asl, AbsoluteX),
        0x1F => (Ora, AbsoluteX),

        0x20 => (Jsr, Absolute),
        0x21 => (And, ScratchIndexedIndirect),
        0x22 => (Jsr, Absolute),
        0x23 => (And, StackRelative),
        0x24 => (Bit, Scratch),
        0x25 => (And, Scratch),
        0x26 => (Rol, Scratch),
        0x27 => (And, ScratchIndirect),
        0x28 => (Plp, Implied),
        0x29 => (And, Immediate),
        0x2A => (RolA, Accumulator),
        0x2C => (Bit, Absolute),
        0x2D => (And, Absolute),
        0x2E => (Rol, Absolute),
        0x2F => (And, Absolute),

        0x30 => (Bmi, Relative),
        0x31 => (And, ScratchIndirectY),
        0x32 => (And, ScratchIndirect),
        0x33 => (And, StackRelativeIndirectY),
        0x34 => (Bit, ScratchX),
        0x35 => (And, ScratchX),
        0x36 => (Rol, ScratchX),
        0x37 => (And, ScratchIndirectY),
        0x38 => (Sec, Implied),
        0x39 => (And, AbsoluteY),
        0x3A => (DecA, Accumulator),
        0x3B => (Tsa, Implied),
        0x3C => (Bit, AbsoluteX),
        0x3D => (And, AbsoluteX),
        0x3E => (Rol, AbsoluteX),
        0x3F => (And, AbsoluteX),

        0x40 => (Rti, Implied),
        0x41 => (Eor, ScratchIndexedIndirect),
        0x43 => (Eor, StackRelative),
        0x44 => (Mvp, Implied),
        0x45 => (Eor, Scratch),
        0x46 => (Lsr, Scratch),
        0x47 => (Eor, ScratchIndirect),
        0x48 => (Pha, Implied),
        0x49 => (Eor, Immediate),
        0x4A => (LsrA, Accumulator),
        0x4C => (Jmp, Absolute),
        0x4D => (Eor, Absolute),
        0x4E => (Lsr, Absolute),
        0x4F => (Eor, Absolute),

        0x50 => (Bvc, Relative),
        0x51 => (Eor, ScratchIndirectY),
        0x52 => (Eor, ScratchIndirect),
        0x53 => (Eor, StackRelativeIndirectY),
        0x54 => (Mvn, Implied),
        0x55 => (Eor, ScratchX),
        0x56 => (Lsr, ScratchX),
        0x57 => (Eor, ScratchIndirectY),
        0x58 => (Cli, Implied),
        0x59 => (Eor, AbsoluteY),
        0x5A => (Phy, Implied),
        0x5C => (Jmp, Absolute),
        0x5D => (Eor, AbsoluteX),
        0x5E => (Lsr, AbsoluteX),
        0x5F => (Eor, AbsoluteX),

        0x60 => (Rts, Implied),
        0x61 => (Adc, ScratchIndexedIndirect),
        0x62 => (Per, RelativeLong),
        0x63 => (Adc, StackRelative),
        0x64 => (Stz, Scratch),
        0x65 => (Adc, Scratch),
        0x66 => (Ror, Scratch),
        0x67 => (Adc, ScratchIndirect),
        0x68 => (Pla, Implied),
        0x69 => (Adc, Immediate),
        0x6A => (RorA, Accumulator),
        0x6B => (Rts, Implied),
        0x6C => (Jmp, AbsoluteIndirect),
        0x6D => (Adc, Absolute),
        0x6E => (Ror, Absolute),
        0x6F => (Adc, Absolute),

        0x70 => (Bvs, Relative),
        0x71 => (Adc, ScratchIndirectY),
        0x72 => (Adc, ScratchIndirect),
        0x73 => (Adc, StackRelativeIndirectY),
        0x74 => (Stz, ScratchX),
        0x75 => (Adc, ScratchX),
        0x76 => (Ror, ScratchX),
        0x77 => (Adc, ScratchIndirectY),
        0x78 => (Sei, Implied),
        0x79 => (Adc, AbsoluteY),
        0x7A => (Ply, Implied),
        0x7C => (Jmp, AbsoluteIndexedIndirect),
        0x7D => (Adc, AbsoluteX),
        0x7E => (Ror, AbsoluteX),
        0x7F => (Adc, AbsoluteX),

        0x80 => (Bra, Relative),
        0x81 => (Sta, ScratchIndexedIndirect),
        0x82 => (Brl, RelativeLong),
        0x83 => (Sta, StackRelative),
        0x84 => (Sty, Scratch),
        0x85 => (Sta, Scratch),
        0x86 => (Stx, Scratch),
        0x87 => (Sta, ScratchIndirect),
        0x88 => (Dey, Implied),
        0x89 => (BitImm, Immediate),
        0x8A => (Txa, Implied),
        0x8C => (Sty, Absolute),
        0x8D => (Sta, Absolute),
        0x8E => (Stx, Absolute),
        0x8F => (Sta, Absolute),

        0x90 => (Bcc, Relative),
        0x91 => (Sta, ScratchIndirectY),
        0x92 => (Sta, ScratchIndirect),
        0x93 => (Sta, StackRelativeIndirectY),
        0x94 => (Sty, ScratchX),
        0x95 => (Sta, ScratchX),
        0x96 => (Stx, ScratchY),
        0x97 => (Sta, ScratchIndirectY),
        0x98 => (Tya, Implied),
        0x99 => (Sta, AbsoluteY),
        0x9A => (Txs, Implied),
        0x9B => (Txy, Implied),
        0x9C => (Stz, Absolute),
        0x9D => (Sta, AbsoluteX),
        0x9E => (Stz, AbsoluteX),
        0x9F => (Sta, AbsoluteX),

        0xA0 => (Ldy, Immediate),
        0xA1 => (Lda, ScratchIndexedIndirect),
        0xA2 => (Ldx, Immediate),
        0xA3 => (Lda, StackRelative),
        0xA4 => (Ldy, Scratch),
        0xA5 => (Lda, Scratch),
        0xA6 => (Ldx, Scratch),
        0xA7 => (Lda, ScratchIndirect),
        0xA8 => (Tay, Implied),
        0xA9 => (Lda, Immediate),
        0xAA => (Tax, Implied),
        0xAC => (Ldy, Absolute),
        0xAD => (Lda, Absolute),
        0xAE => (Ldx, Absolute),
        0xAF => (Lda, Absolute),

        0xB0 => (Bcs, Relative),
        0xB1 => (Lda, ScratchIndirectY),
        0xB2 => (Lda, ScratchIndirect),
        0xB3 => (Lda, StackRelativeIndirectY),
        0xB4 => (Ldy, ScratchX),
        0xB5 => (Lda, ScratchX),
        0xB6 => (Ldx, ScratchY),
        0xB7 => (Lda, ScratchIndirectY),
        0xB8 => (Clv, Implied),
        0xB9 => (Lda, AbsoluteY),
        0xBA => (Tsx, Implied),
        0xBB => (Tyx, Implied),
        0xBC => (Ldy, AbsoluteX),
        0xBD => (Lda, AbsoluteX),
        0xBE => (Ldx, AbsoluteY),
        0xBF => (Lda, AbsoluteX),

        0xC0 => (Cpy, Immediate),
        0xC1 => (Cmp, ScratchIndexedIndirect),
        0xC2 => (Rep, ImmediateByte),
        0xC3 => (Cmp, StackRelative),
        0xC4 => (Cpy, Scratch),
        0xC5 => (Cmp, Scratch),
        0xC6 => (Dec, Scratch),
        0xC7 => (Cmp, ScratchIndirect),
        0xC8 => (Iny, Implied),
        0xC9 => (Cmp, Immediate),
        0xCA => (Dex, Implied),
        0xCB => (Wai, Implied),
        0xCC => (Cpy, Absolute),
        0xCD => (Cmp, Absolute),
        0xCE => (Dec, Absolute),
        0xCF => (Cmp, Absolute),

        0xD0 => (Bne, Relative),
        0xD1 => (Cmp, ScratchIndirectY),
        0xD2 => (Cmp, ScratchIndirect),
        0xD3 => (Cmp, StackRelativeIndirectY),
        0xD4 => (Pei, Scratch),
        0xD5 => (Cmp, ScratchX),
        0xD6 => (Dec, ScratchX),
        0xD7 => (Cmp, ScratchIndirectY),
        0xD8 => (Cld, Implied),
        0xD9 => (Cmp, AbsoluteY),
        0xDA => (Phx, Implied),
        0xDB => (Stp, Implied),
        0xDC => (Jmp, AbsoluteIndirect),
        0xDD => (Cmp, AbsoluteX),
        0xDE => (Dec, AbsoluteX),
        0xDF => (Cmp, AbsoluteX),

        0xE0 => (Cpx, Immediate),
        0xE1 => (Sbc, ScratchIndexedIndirect),
        0xE2 => (Sep, ImmediateByte),
        0xE3 => (Sbc, StackRelative),
        0xE4 => (Cpx, Scratch),
        0xE5 => (Sbc, Scratch),
        0xE6 => (Inc, Scratch),
        0xE7 => (Sbc, ScratchIndirect),
        0xE8 => (Inx, Implied),
        0xE9 => (Sbc, Immediate),
        0xEA => (Nop, Implied),
        0xEB => (Xba, Implied),
        0xEC => (Cpx, Absolute),
        0xED => (Sbc, Absolute),
        0xEE => (Inc, Absolute),
        0xEF => (Sbc, Absolute),

        0xF0 => (Beq, Relative),
        0xF1 => (Sbc, ScratchIndirectY),
        0xF2 => (Sbc, ScratchIndirect),
        0xF3 => (Sbc, StackRelativeIndirectY),
        0xF4 => (Pea, Immediate),
        0xF5 => (Sbc, ScratchX),
        0xF6 => (Inc, ScratchX),
        0xF7 => (Sbc, ScratchIndirectY),
        0xF8 => (Sed, Implied),
        0xF9 => (Sbc, AbsoluteY),
        0xFA => (Plx, Implied),
        0xFB => (Xce, Implied),
        0xFC => (Jsr, AbsoluteIndexedIndirect),
        0xFD => (Sbc, AbsoluteX),
        0xFE => (Inc, AbsoluteX),
        0xFF => (Sbc, AbsoluteX),

        _ => return None,
    };
    Some(entry)
}
