//! 65x64 CPU registers.

use emu_core::Width;

use crate::Status;
use crate::config::{RESET_SP, RESET_STATUS};

/// Number of registers in the scratch (Z) bank.
pub const SCRATCH_REGISTERS: usize = 128;

/// A 64-bit register with 8/16/32-bit views of its low-order bits.
///
/// Writing a narrow view leaves the bits above it untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reg(pub u64);

impl Reg {
    #[must_use]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    #[must_use]
    pub const fn w(self) -> u16 {
        self.0 as u16
    }

    #[must_use]
    pub const fn d(self) -> u32 {
        self.0 as u32
    }

    #[must_use]
    pub const fn q(self) -> u64 {
        self.0
    }

    pub fn set_b(&mut self, value: u8) {
        self.set(Width::Byte, u64::from(value));
    }

    pub fn set_w(&mut self, value: u16) {
        self.set(Width::Word, u64::from(value));
    }

    pub fn set_d(&mut self, value: u32) {
        self.set(Width::DWord, u64::from(value));
    }

    pub fn set_q(&mut self, value: u64) {
        self.0 = value;
    }

    /// The view of the given width, zero-extended.
    #[must_use]
    pub const fn get(self, width: Width) -> u64 {
        self.0 & width.mask()
    }

    /// Replace the view of the given width, preserving the bits above it.
    pub fn set(&mut self, width: Width, value: u64) {
        let mask = width.mask();
        self.0 = (self.0 & !mask) | (value & mask);
    }
}

/// 65x64 CPU register set.
///
/// - A: accumulator
/// - X, Y: index registers
/// - SP: stack pointer (descending, points at the next free byte)
/// - Z: 128 scratch registers, addressed by a 7-bit index
/// - PC: address of the next bundle; TPC: address of the bundle in flight
/// - P: processor status
/// - E: emulation flag; when set, sized instructions run at byte width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// Accumulator.
    pub a: Reg,
    /// X index register.
    pub x: Reg,
    /// Y index register.
    pub y: Reg,
    /// Stack pointer.
    pub sp: Reg,
    /// Scratch register bank.
    pub z: [Reg; SCRATCH_REGISTERS],
    /// Program counter.
    pub pc: u64,
    /// Address of the bundle being decoded.
    pub tpc: u64,
    /// Processor status flags.
    pub p: Status,
    /// Emulation ("short register") flag.
    pub e: bool,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Create registers in power-on state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: Reg(0),
            x: Reg(0),
            y: Reg(0),
            sp: Reg(RESET_SP),
            z: [Reg(0); SCRATCH_REGISTERS],
            pc: 0,
            tpc: 0,
            p: Status(RESET_STATUS),
            e: false,
        }
    }

    /// Scratch register selected by the low seven bits of `index`.
    #[must_use]
    pub const fn scratch(&self, index: u8) -> Reg {
        self.z[(index & 0x7F) as usize]
    }
}
