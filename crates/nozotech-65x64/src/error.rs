//! Errors returned by host calls.

use thiserror::Error;

/// Host-call failures. Execution faults are never reported here; they stop
/// the core and show up in its stop reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("no coprocessor instruction is pending")]
    NoPayload,

    #[error("coprocessor instruction needs {needed} words but the buffer holds {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("coprocessor instruction of {size} words has not been retrieved")]
    PayloadPending { size: u8 },
}

pub type Result<T> = std::result::Result<T, CpuError>;
