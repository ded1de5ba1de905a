//! Coprocessor escape payloads.

/// A coprocessor instruction captured by a COP trap.
///
/// Owned by the core until the host retrieves it; ownership then moves to
/// the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopPayload {
    opcode: u8,
    words: Vec<u16>,
}

impl CopPayload {
    pub(crate) fn new(opcode: u8, words: Vec<u16>) -> Self {
        Self { opcode, words }
    }

    /// The coprocessor opcode byte.
    #[must_use]
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Number of 16-bit payload words. Bounded by the one-byte length field.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.words.len() as u8
    }

    #[must_use]
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    #[must_use]
    pub fn into_words(self) -> Vec<u16> {
        self.words
    }
}
