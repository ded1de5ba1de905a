//! CPU core trait.

use crate::Bus;

/// A CPU core driven one step at a time by a host.
///
/// The bus is passed in, not owned: the host keeps the backing store and
/// may share it with other components between calls. A core never blocks
/// and never calls back into the host except through the bus.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Reinitialize the core from its reset vector.
    ///
    /// `trace` enables the core's diagnostic trace output.
    fn reset<B: Bus>(&mut self, bus: &mut B, trace: bool);

    /// Execute one unit of work: one interrupt opportunity plus one fetch.
    fn step<B: Bus>(&mut self, bus: &mut B);

    /// Returns the address of the next fetch.
    fn pc(&self) -> u64;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the core is halted and `step` will not fetch.
    fn is_halted(&self) -> bool;

    /// Latch an interrupt request. Returns true if it is currently unmasked.
    fn interrupt(&mut self) -> bool;

    /// Total cycles charged since the last reset.
    fn cycles(&self) -> u64;
}
