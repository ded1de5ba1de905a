//! 65x64 CPU implementation.
//!
//! Each `step()` gives a pending interrupt one chance to be serviced and
//! otherwise fetches and runs one 8-byte bundle of four instruction slots.
//! Cycle costs are charged per instruction; there is no per-cycle bus
//! model.

use std::fmt;

use emu_core::{Bus, Cpu, Observable, Value, Width};

use crate::config::{BUNDLE_BYTES, Config, IRQ_VECTOR, RESET_SP, RESET_STATUS, RESET_VECTOR, SLOTS};
use crate::decode::{Instr, Slot, decode};
use crate::error::{CpuError, Result};
use crate::execute::Flow;
use crate::flags::{C, D, I, N, P, T, V, Z};
use crate::trace::{LogSink, TraceRecord, TraceSink};
use crate::{CopPayload, Operand, Reg, Registers, Status};

/// Why the core is not running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StopReason {
    #[default]
    Running = 0,
    /// A COP instruction is waiting for the host.
    Coprocessor = 1,
    /// WAI: waiting for an interrupt.
    Wait = 2,
    /// STP: stopped until resumed or reset.
    Stop = 3,
    /// An unassigned selector was decoded.
    Illegal = 4,
}

impl StopReason {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Coprocessor => "Coprocessor",
            Self::Wait => "Wait",
            Self::Stop => "Stop",
            Self::Illegal => "Illegal",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The Nozotech 65x64 CPU.
pub struct Emu65x64 {
    /// CPU registers.
    pub regs: Registers,

    config: Config,

    /// True while `step()` will not fetch.
    halted: bool,

    stop_reason: StopReason,

    /// Latched interrupt request, cleared when serviced.
    interrupt_pending: bool,

    /// Coprocessor instruction awaiting retrieval.
    pub(crate) cop: Option<CopPayload>,

    /// Selector that caused an Illegal stop.
    illegal: Option<u16>,

    /// Cycles charged since reset.
    pub(crate) cycles: u64,

    trace: bool,
    sink: Box<dyn TraceSink>,
}

impl fmt::Debug for Emu65x64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emu65x64")
            .field("regs", &self.regs)
            .field("config", &self.config)
            .field("halted", &self.halted)
            .field("stop_reason", &self.stop_reason)
            .field("interrupt_pending", &self.interrupt_pending)
            .field("cop", &self.cop)
            .field("illegal", &self.illegal)
            .field("cycles", &self.cycles)
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

impl Default for Emu65x64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Emu65x64 {
    /// Create a CPU with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let mut regs = Registers::new();
        regs.e = config.emulation;
        Self {
            regs,
            config,
            halted: false,
            stop_reason: StopReason::Running,
            interrupt_pending: false,
            cop: None,
            illegal: None,
            cycles: 0,
            trace: false,
            sink: Box::new(LogSink),
        }
    }

    #[must_use]
    pub fn config(&self) -> Config {
        self.config
    }

    #[must_use]
    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }

    /// True if halted for any reason.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.halted
    }

    #[must_use]
    pub fn interrupt_pending(&self) -> bool {
        self.interrupt_pending
    }

    /// The selector that caused the current Illegal stop, if any.
    #[must_use]
    pub fn illegal_opcode(&self) -> Option<u16> {
        self.illegal
    }

    /// Leave a Wait, Stop or Illegal halt and continue at the next bundle.
    ///
    /// A coprocessor trap can only be resumed once its payload has been
    /// retrieved.
    pub fn resume(&mut self) -> Result<()> {
        if let Some(payload) = &self.cop {
            return Err(CpuError::PayloadPending {
                size: payload.size(),
            });
        }
        if self.halted {
            tracing::debug!(reason = %self.stop_reason, pc = self.regs.pc, "resume");
        }
        self.halted = false;
        self.stop_reason = StopReason::Running;
        self.illegal = None;
        Ok(())
    }

    /// Payload words of the pending coprocessor instruction, or 0.
    #[must_use]
    pub fn cop_inst_size(&self) -> u8 {
        self.cop.as_ref().map_or(0, CopPayload::size)
    }

    /// Copy the pending coprocessor instruction into `dest` and release it.
    ///
    /// Returns the coprocessor opcode. `dest` must hold at least
    /// `cop_inst_size()` words; if it does not, the payload stays pending.
    pub fn take_cop_inst(&mut self, dest: &mut [u16]) -> Result<u8> {
        let payload = self.cop.take().ok_or(CpuError::NoPayload)?;
        let needed = payload.words().len();
        if dest.len() < needed {
            let available = dest.len();
            self.cop = Some(payload);
            return Err(CpuError::BufferTooSmall { needed, available });
        }
        dest[..needed].copy_from_slice(payload.words());
        Ok(payload.opcode())
    }

    /// Move the pending coprocessor instruction out of the core.
    pub fn take_cop_payload(&mut self) -> Option<CopPayload> {
        self.cop.take()
    }

    /// Replace the trace sink. Tracing itself is switched on by `reset`.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = sink;
    }

    pub(crate) fn halt(&mut self, reason: StopReason) {
        self.halted = true;
        self.stop_reason = reason;
        tracing::debug!(%reason, pc = self.regs.pc, tpc = self.regs.tpc, "halt");
    }

    fn service_interrupt<B: Bus>(&mut self, bus: &mut B) {
        self.interrupt_pending = false;
        let from = self.regs.pc;
        self.enter_vector(bus, IRQ_VECTOR);
        tracing::debug!(from, to = self.regs.pc, "interrupt");
    }

    /// Fetch and run one bundle.
    fn run_bundle<B: Bus>(&mut self, bus: &mut B) {
        let tpc = self.regs.pc;
        self.regs.tpc = tpc;
        let words: [u16; SLOTS as usize] =
            std::array::from_fn(|i| bus.read_word(tpc.wrapping_add(2 * i as u64)));
        self.regs.pc = tpc.wrapping_add(BUNDLE_BYTES);

        if self.trace {
            let raw = words
                .iter()
                .rev()
                .fold(0u64, |raw, &word| (raw << 16) | u64::from(word));
            self.sink.bundle(tpc, raw);
        }

        for word in words {
            let slot = Slot::from_word(word);
            let Some((instr, mode)) = decode(slot.selector) else {
                self.illegal = Some(slot.selector);
                tracing::warn!(selector = slot.selector, tpc, "illegal opcode");
                self.halt(StopReason::Illegal);
                return;
            };

            let width = self.operative_width(instr, slot.width);
            let operand = self.resolve(bus, mode, width);
            let flow = self.execute(bus, instr, operand, width);

            if self.trace {
                self.emit_trace(bus, instr, width, operand);
            }
            if flow == Flow::EndBundle {
                break;
            }
        }
    }

    /// Sized instructions run at byte width in emulation mode and at the
    /// slot width otherwise. Unsized instructions work on full registers.
    fn operative_width(&self, instr: Instr, slot_width: Width) -> Width {
        match (instr.is_sized(), self.regs.e) {
            (false, _) => Width::QWord,
            (true, true) => Width::Byte,
            (true, false) => slot_width,
        }
    }

    fn emit_trace<B: Bus>(&mut self, bus: &mut B, instr: Instr, width: Width, operand: Operand) {
        let sp = self.regs.sp.q();
        let stack: [u64; 4] =
            std::array::from_fn(|i| bus.read_qword(sp.wrapping_add(1 + 8 * i as u64)));
        let record = TraceRecord {
            mnemonic: instr.mnemonic(),
            width: instr.is_sized().then_some(width),
            operand: operand.address(),
            p: self.regs.p,
            a: self.regs.a.q(),
            x: self.regs.x.q(),
            y: self.regs.y.q(),
            sp,
            stack,
            cycles: self.cycles,
        };
        self.sink.executed(&record);
    }
}

impl Cpu for Emu65x64 {
    type Registers = Registers;

    /// Load PC from the reset vector and return to the power-on status.
    ///
    /// A, X, Y and the scratch bank keep their contents. A pending
    /// coprocessor payload is dropped.
    fn reset<B: Bus>(&mut self, bus: &mut B, trace: bool) {
        if let Some(payload) = self.cop.take() {
            tracing::debug!(size = payload.size(), "reset dropped coprocessor instruction");
        }
        self.regs.sp = Reg(RESET_SP);
        self.regs.p = Status(RESET_STATUS);
        self.regs.e = self.config.emulation;
        self.regs.pc = u64::from(bus.read_word(RESET_VECTOR));
        self.regs.tpc = self.regs.pc;
        self.halted = false;
        self.stop_reason = StopReason::Running;
        self.interrupt_pending = false;
        self.illegal = None;
        self.cycles = 0;
        self.trace = trace;
        tracing::debug!(pc = self.regs.pc, emulation = self.regs.e, "reset");
    }

    fn step<B: Bus>(&mut self, bus: &mut B) {
        if self.halted {
            // Only a waiting core reacts, and only to a pending interrupt,
            // masked or not.
            if self.stop_reason != StopReason::Wait || !self.interrupt_pending {
                return;
            }
            self.halted = false;
            self.stop_reason = StopReason::Running;
            tracing::debug!(pc = self.regs.pc, "wake");
        }

        if self.interrupt_pending && !self.regs.p.is_set(I) {
            self.service_interrupt(bus);
            return;
        }

        self.run_bundle(bus);
    }

    fn pc(&self) -> u64 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    fn interrupt(&mut self) -> bool {
        self.interrupt_pending = true;
        !self.regs.p.is_set(I)
    }

    fn cycles(&self) -> u64 {
        self.cycles
    }
}

impl Observable for Emu65x64 {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(index) = path.strip_prefix("z.") {
            let index: usize = index.parse().ok()?;
            return self.regs.z.get(index).map(|r| r.q().into());
        }
        let flag = |f: u8| Some(Value::Bool(self.regs.p.is_set(f)));
        match path {
            "pc" => Some(self.regs.pc.into()),
            "tpc" => Some(self.regs.tpc.into()),
            "a" => Some(self.regs.a.q().into()),
            "x" => Some(self.regs.x.q().into()),
            "y" => Some(self.regs.y.q().into()),
            "sp" => Some(self.regs.sp.q().into()),
            "p" => Some(self.regs.p.0.into()),
            "flags.c" => flag(C),
            "flags.z" => flag(Z),
            "flags.i" => flag(I),
            "flags.d" => flag(D),
            "flags.t" => flag(T),
            "flags.p" => flag(P),
            "flags.v" => flag(V),
            "flags.n" => flag(N),
            "emulation" => Some(self.regs.e.into()),
            "cycles" => Some(self.cycles.into()),
            "halted" => Some(self.halted.into()),
            "stop_reason" => Some(self.stop_reason.name().into()),
            "interrupt_pending" => Some(self.interrupt_pending.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "tpc",
            "a",
            "x",
            "y",
            "sp",
            "p",
            "flags.c",
            "flags.z",
            "flags.i",
            "flags.d",
            "flags.t",
            "flags.p",
            "flags.v",
            "flags.n",
            "emulation",
            "cycles",
            "halted",
            "stop_reason",
            "interrupt_pending",
        ]
    }
}
