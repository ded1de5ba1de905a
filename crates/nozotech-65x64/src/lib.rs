//! Cycle-counting Nozotech 65x64 CPU emulator.
//!
//! The 65x64 stretches the 65xx register machine to 64 bits. Instructions
//! arrive in 8-byte bundles of four 16-bit slots; each slot carries a 10-bit
//! selector and a 2-bit operand width. Operands follow the bundle in the
//! instruction stream. A 128-entry scratch bank (Z) takes the place of the
//! direct page, and a COP escape hands variable-length payloads to a host
//! coprocessor.
//!
//! The host owns memory (through [`emu_core::Bus`]) and drives the core with
//! [`emu_core::Cpu::step`], polling [`Emu65x64::stop_reason`] in between.

mod addressing;
pub mod alu;
mod config;
mod cop;
mod cpu;
mod decode;
mod error;
mod execute;
pub mod flags;
mod registers;
mod trace;

pub use addressing::Operand;
pub use config::{
    BRK_VECTOR, BUNDLE_BYTES, Config, IRQ_VECTOR, RESET_SP, RESET_STATUS, RESET_VECTOR, SLOTS,
};
pub use cop::CopPayload;
pub use cpu::{Emu65x64, StopReason};
pub use decode::{Instr, Mode, SELECTOR_MASK, Slot, decode};
pub use error::{CpuError, Result};
pub use flags::Status;
pub use registers::{Reg, Registers, SCRATCH_REGISTERS};
pub use trace::{LogSink, TraceRecord, TraceSink};
