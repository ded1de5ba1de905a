//! Architecture constants and core configuration.

/// Address of the 16-bit reset pointer.
pub const RESET_VECTOR: u64 = 0xFFFC;

/// Address of the 64-bit interrupt pointer.
pub const IRQ_VECTOR: u64 = 0xFFEE;

/// Address of the 64-bit BRK pointer.
pub const BRK_VECTOR: u64 = 0xFFE6;

/// Stack pointer established by reset.
pub const RESET_SP: u64 = 0x100;

/// Status register established by reset (I, T and P set).
pub const RESET_STATUS: u8 = 0x34;

/// Size of an instruction bundle in bytes.
pub const BUNDLE_BYTES: u64 = 8;

/// Instruction slots per bundle.
pub const SLOTS: u64 = 4;

/// Core configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Emulation flag established by reset. When set, sized instructions
    /// ignore the slot width field and run at byte width.
    pub emulation: bool,
}
