//! 65x64 processor status register (P).
//!
//! Eight independent flags. P can also be moved as an operand at any width
//! (PHP/PLP, interrupt entry); wide views are zero-extended and only the low
//! eight bits are ever stored.

use std::fmt;

use emu_core::Width;

/// Carry flag - set on carry out of, or no borrow into, the top bit.
pub const C: u8 = 0x01;

/// Zero flag - set if the result is zero.
pub const Z: u8 = 0x02;

/// Interrupt disable - when set, pending interrupts are not serviced.
pub const I: u8 = 0x04;

/// Decimal mode - enables packed BCD arithmetic for ADC/SBC.
pub const D: u8 = 0x08;

/// Trap flag.
pub const T: u8 = 0x10;

/// Parity flag.
pub const P: u8 = 0x20;

/// Overflow flag - set if signed arithmetic overflowed.
pub const V: u8 = 0x40;

/// Negative flag - set if the top bit of the result is set.
pub const N: u8 = 0x80;

/// Processor status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// Check if a flag is set.
    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Set a flag.
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// Clear a flag.
    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Set or clear a flag based on condition.
    pub fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Update N and Z from a value at the given width.
    pub fn update_nz(&mut self, value: u64, width: Width) {
        self.set_if(N, value & width.sign_bit() != 0);
        self.set_if(Z, width.truncate(value) == 0);
    }

    /// Zero-extended view at the given width.
    #[must_use]
    pub const fn get(self, width: Width) -> u64 {
        (self.0 as u64) & width.mask()
    }

    /// Load from an operand of the given width. Bits above the eight flags
    /// are discarded.
    pub fn set_sized(&mut self, width: Width, value: u64) {
        self.0 = width.truncate(value) as u8;
    }

    /// Carry as 0 or 1, for arithmetic.
    #[must_use]
    pub const fn carry(self) -> u64 {
        (self.0 & C) as u64
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (N, 'N'),
            (V, 'V'),
            (P, 'P'),
            (T, 'T'),
            (D, 'D'),
            (I, 'I'),
            (Z, 'Z'),
            (C, 'C'),
        ];
        for (flag, name) in names {
            write!(f, "{}", if self.is_set(flag) { name } else { '.' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nz_follows_width() {
        let mut p = Status::default();

        p.update_nz(0x80, Width::Byte);
        assert!(p.is_set(N));
        assert!(!p.is_set(Z));

        p.update_nz(0x80, Width::Word);
        assert!(!p.is_set(N));

        p.update_nz(0x1_0000, Width::Word);
        assert!(p.is_set(Z));
    }

    #[test]
    fn wide_views_zero_extend() {
        let mut p = Status(0x34);
        assert_eq!(p.get(Width::QWord), 0x34);

        p.set_sized(Width::QWord, 0xFFFF_FFFF_FFFF_FF01);
        assert_eq!(p.0, 0x01);
        assert_eq!(p.get(Width::QWord), 0x01);
    }

    #[test]
    fn display_lists_set_flags() {
        assert_eq!(Status(0x34).to_string(), "..PT.I..");
        assert_eq!(Status(0xC3).to_string(), "NV....ZC");
    }
}
