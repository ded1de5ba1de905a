//! Execution trace hook.
//!
//! When tracing is enabled at reset, the core reports every fetched bundle
//! and every executed slot to a [`TraceSink`]. Sinks observe only; nothing
//! they do can reach register state or the cycle counter.

use std::fmt;

use emu_core::Width;

use crate::Status;

/// Receiver for trace events.
///
/// The core owns its sink and may be moved between threads.
pub trait TraceSink: Send {
    /// Called once per step, before decode, with the bundle address and its
    /// raw little-endian contents.
    fn bundle(&mut self, address: u64, raw: u64);

    /// Called after each executed slot.
    fn executed(&mut self, record: &TraceRecord);
}

/// Register dump taken after a slot executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    pub mnemonic: &'static str,
    /// Operative width, for sized instructions only.
    pub width: Option<Width>,
    /// Effective address, or 0 when the instruction has no memory operand.
    pub operand: u64,
    pub p: Status,
    pub a: u64,
    pub x: u64,
    pub y: u64,
    pub sp: u64,
    /// The four qwords above SP, top of stack first.
    pub stack: [u64; 4],
    pub cycles: u64,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = self.width.map_or("  ", Width::suffix);
        write!(
            f,
            "{}{} {:016X}  P:{} A:{:016X} X:{:016X} Y:{:016X} SP:{:016X} [",
            self.mnemonic, suffix, self.operand, self.p, self.a, self.x, self.y, self.sp
        )?;
        for (i, value) in self.stack.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value:016X}")?;
        }
        write!(f, "] CYC:{}", self.cycles)
    }
}

/// Default sink: forwards events to `tracing` at TRACE level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn bundle(&mut self, address: u64, raw: u64) {
        tracing::trace!(target: "nozotech_65x64::trace", "{address:016X}: {raw:016X}");
    }

    fn executed(&mut self, record: &TraceRecord) {
        tracing::trace!(target: "nozotech_65x64::trace", "{record}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_display() {
        let record = TraceRecord {
            mnemonic: "LDA",
            width: Some(Width::Word),
            operand: 0x2000,
            p: Status(0x34),
            a: 0x1234,
            x: 0,
            y: 0,
            sp: 0x100,
            stack: [0; 4],
            cycles: 3,
        };
        let text = record.to_string();
        assert!(text.starts_with("LDA.w 0000000000002000  P:..PT.I.. A:0000000000001234"));
        assert!(text.ends_with("] CYC:3"));
    }

    #[test]
    fn unsized_record_pads_mnemonic() {
        let record = TraceRecord {
            mnemonic: "NOP",
            width: None,
            operand: 0,
            p: Status(0),
            a: 0,
            x: 0,
            y: 0,
            sp: 0,
            stack: [1, 2, 3, 4],
            cycles: 2,
        };
        let text = record.to_string();
        assert!(text.starts_with("NOP   0000000000000000"));
        assert!(text.contains("[0000000000000001 0000000000000002"));
    }
}
