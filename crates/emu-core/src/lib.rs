//! Core traits and types shared by the emulator cores.
//!
//! A core owns its registers and nothing else. Memory lives behind [`Bus`],
//! the host drives execution through [`Cpu`], and diagnostics read state
//! through [`Observable`].

pub mod bits;
mod bus;
mod cpu;
mod observable;
mod width;

pub use bus::{Bus, SimpleBus};
pub use cpu::Cpu;
pub use observable::{Observable, Value};
pub use width::Width;
