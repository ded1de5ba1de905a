//! Memory bus interface.

use std::collections::HashMap;

use crate::Width;
use crate::bits::{dhi, djoin, dlo, hi, join, lo, qhi, qjoin, qlo};

/// Memory bus interface.
///
/// Cores reach their address space only through this trait. The host owns
/// the backing store and decides what an address means (mirroring, bank
/// wraparound, devices). Every access succeeds; cores perform no alignment
/// checks.
///
/// Only the byte accessors are required. Wider accessors are little-endian
/// compositions of byte accesses and may be overridden by hosts that can do
/// better.
pub trait Bus {
    /// Read a byte from the given address.
    fn read_byte(&mut self, address: u64) -> u8;

    /// Write a byte to the given address.
    fn write_byte(&mut self, address: u64, value: u8);

    /// Read a 16-bit word.
    fn read_word(&mut self, address: u64) -> u16 {
        let l = self.read_byte(address);
        let h = self.read_byte(address.wrapping_add(1));
        join(l, h)
    }

    /// Read a 32-bit double word.
    fn read_dword(&mut self, address: u64) -> u32 {
        let l = self.read_word(address);
        let h = self.read_word(address.wrapping_add(2));
        djoin(l, h)
    }

    /// Read a 64-bit quad word.
    fn read_qword(&mut self, address: u64) -> u64 {
        let l = self.read_dword(address);
        let h = self.read_dword(address.wrapping_add(4));
        qjoin(l, h)
    }

    /// Write a 16-bit word.
    fn write_word(&mut self, address: u64, value: u16) {
        self.write_byte(address, lo(value));
        self.write_byte(address.wrapping_add(1), hi(value));
    }

    /// Write a 32-bit double word.
    fn write_dword(&mut self, address: u64, value: u32) {
        self.write_word(address, dlo(value));
        self.write_word(address.wrapping_add(2), dhi(value));
    }

    /// Write a 64-bit quad word.
    fn write_qword(&mut self, address: u64, value: u64) {
        self.write_dword(address, qlo(value));
        self.write_dword(address.wrapping_add(4), qhi(value));
    }

    /// Read a value of the given width, zero-extended.
    fn read_sized(&mut self, address: u64, width: Width) -> u64 {
        match width {
            Width::Byte => u64::from(self.read_byte(address)),
            Width::Word => u64::from(self.read_word(address)),
            Width::DWord => u64::from(self.read_dword(address)),
            Width::QWord => self.read_qword(address),
        }
    }

    /// Write the low bits of `value` at the given width.
    fn write_sized(&mut self, address: u64, value: u64, width: Width) {
        match width {
            Width::Byte => self.write_byte(address, value as u8),
            Width::Word => self.write_word(address, value as u16),
            Width::DWord => self.write_dword(address, value as u32),
            Width::QWord => self.write_qword(address, value),
        }
    }
}

/// Sparse RAM spanning the full 64-bit address space.
///
/// Unwritten addresses read as zero. Intended for tests and hosts without
/// memory-mapped devices.
#[derive(Debug, Default, Clone)]
pub struct SimpleBus {
    memory: HashMap<u64, u8>,
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `data` into memory starting at `address`.
    pub fn load(&mut self, address: u64, data: &[u8]) {
        for (offset, &byte) in (0u64..).zip(data) {
            self.memory.insert(address.wrapping_add(offset), byte);
        }
    }

    /// Read a byte without going through the bus interface.
    #[must_use]
    pub fn peek(&self, address: u64) -> u8 {
        self.memory.get(&address).copied().unwrap_or(0)
    }

    /// Read a little-endian quad word without going through the bus interface.
    #[must_use]
    pub fn peek_qword(&self, address: u64) -> u64 {
        (0..8u64).fold(0, |acc, i| {
            acc | (u64::from(self.peek(address.wrapping_add(i))) << (i * 8))
        })
    }
}

impl Bus for SimpleBus {
    fn read_byte(&mut self, address: u64) -> u8 {
        self.peek(address)
    }

    fn write_byte(&mut self, address: u64, value: u8) {
        self.memory.insert(address, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_accesses_are_little_endian() {
        let mut bus = SimpleBus::new();
        bus.write_qword(0x1000, 0x0807_0605_0403_0201);

        assert_eq!(bus.peek(0x1000), 0x01);
        assert_eq!(bus.peek(0x1007), 0x08);
        assert_eq!(bus.read_word(0x1002), 0x0403);
        assert_eq!(bus.read_dword(0x1004), 0x0807_0605);
        assert_eq!(bus.read_sized(0x1001, Width::Word), 0x0302);
    }

    #[test]
    fn sized_write_truncates() {
        let mut bus = SimpleBus::new();
        bus.write_sized(0x20, 0xAABB_CCDD, Width::Word);

        assert_eq!(bus.peek(0x20), 0xDD);
        assert_eq!(bus.peek(0x21), 0xCC);
        assert_eq!(bus.peek(0x22), 0x00);
    }

    #[test]
    fn addresses_wrap_at_the_top_of_the_space() {
        let mut bus = SimpleBus::new();
        bus.write_word(u64::MAX, 0x1234);

        assert_eq!(bus.peek(u64::MAX), 0x34);
        assert_eq!(bus.peek(0), 0x12);
    }
}
