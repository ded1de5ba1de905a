//! Splitting and joining 8/16/32/64-bit values.
//!
//! Wide values are always little-endian compositions of their halves: the
//! low half occupies the low-order bits.

/// Low byte of a word.
#[must_use]
pub const fn lo(value: u16) -> u8 {
    value as u8
}

/// High byte of a word.
#[must_use]
pub const fn hi(value: u16) -> u8 {
    (value >> 8) as u8
}

/// Low word of a double word.
#[must_use]
pub const fn dlo(value: u32) -> u16 {
    value as u16
}

/// High word of a double word.
#[must_use]
pub const fn dhi(value: u32) -> u16 {
    (value >> 16) as u16
}

/// Low double word of a quad word.
#[must_use]
pub const fn qlo(value: u64) -> u32 {
    value as u32
}

/// High double word of a quad word.
#[must_use]
pub const fn qhi(value: u64) -> u32 {
    (value >> 32) as u32
}

/// Combine two bytes into a word.
#[must_use]
pub const fn join(l: u8, h: u8) -> u16 {
    (l as u16) | ((h as u16) << 8)
}

/// Combine two words into a double word.
#[must_use]
pub const fn djoin(l: u16, h: u16) -> u32 {
    (l as u32) | ((h as u32) << 16)
}

/// Combine two double words into a quad word.
#[must_use]
pub const fn qjoin(l: u32, h: u32) -> u64 {
    (l as u64) | ((h as u64) << 32)
}

/// Exchange the bytes of a word.
#[must_use]
pub const fn swap(value: u16) -> u16 {
    value.rotate_left(8)
}

/// Exchange the words of a double word.
#[must_use]
pub const fn dswap(value: u32) -> u32 {
    value.rotate_left(16)
}

/// Exchange the double words of a quad word.
#[must_use]
pub const fn qswap(value: u64) -> u64 {
    value.rotate_left(32)
}
