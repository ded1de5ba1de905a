//! Shared helpers for assembling bundles into a test bus.

#![allow(dead_code)]

use emu_core::{Bus, Cpu, SimpleBus, Width};
use nozotech_65x64::{Config, Emu65x64, RESET_VECTOR};

/// Default program origin.
pub const ORIGIN: u64 = 0x200;

/// NOP slot. Unused slots must be padded with it: a zero slot is BRK.
pub const NOP: u16 = 0x0EA;

/// Encode a slot from a selector and a width field.
pub const fn slot(selector: u16, width: Width) -> u16 {
    selector | ((width as u16) << 10)
}

/// Byte-width slot.
pub const fn op(selector: u16) -> u16 {
    slot(selector, Width::Byte)
}

/// Little-endian operand bytes for a quad word.
pub fn q(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

/// Writes bundles and their operands sequentially into a bus.
pub struct Program {
    pub bus: SimpleBus,
    next: u64,
}

impl Program {
    pub fn new() -> Self {
        Self::at(ORIGIN)
    }

    /// Start a program whose reset vector points at `origin`.
    pub fn at(origin: u64) -> Self {
        let mut bus = SimpleBus::new();
        bus.write_word(RESET_VECTOR, origin as u16);
        Self { bus, next: origin }
    }

    /// Continue assembling at `address`.
    pub fn org(&mut self, address: u64) -> &mut Self {
        self.next = address;
        self
    }

    /// Append a bundle. Missing slots are NOPs. Returns the bundle address.
    pub fn bundle(&mut self, slots: &[u16], operands: &[u8]) -> u64 {
        assert!(slots.len() <= 4, "a bundle has four slots");
        let address = self.next;
        for i in 0..4 {
            let word = slots.get(i).copied().unwrap_or(NOP);
            self.bus.write_word(address + 2 * i as u64, word);
        }
        self.bus.load(address + 8, operands);
        self.next = address + 8 + operands.len() as u64;
        address
    }

    /// Address the next bundle will be written at.
    pub fn here(&self) -> u64 {
        self.next
    }

    pub fn boot(self) -> (Emu65x64, SimpleBus) {
        self.boot_with(Config::default())
    }

    pub fn boot_with(self, config: Config) -> (Emu65x64, SimpleBus) {
        let mut bus = self.bus;
        let mut cpu = Emu65x64::with_config(config);
        cpu.reset(&mut bus, false);
        (cpu, bus)
    }
}

/// Bus that records every write.
pub struct RecordingBus {
    pub inner: SimpleBus,
    pub writes: Vec<(u64, u8)>,
}

impl RecordingBus {
    pub fn new(inner: SimpleBus) -> Self {
        Self {
            inner,
            writes: Vec::new(),
        }
    }
}

impl Bus for RecordingBus {
    fn read_byte(&mut self, address: u64) -> u8 {
        self.inner.read_byte(address)
    }

    fn write_byte(&mut self, address: u64, value: u8) {
        self.writes.push((address, value));
        self.inner.write_byte(address, value);
    }
}
