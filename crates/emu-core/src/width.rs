//! Operand widths.

/// Width of a memory access or register view.
///
/// The discriminants match the 2-bit width field used by instruction
/// encodings that carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Width {
    /// 8 bits.
    Byte = 0,
    /// 16 bits.
    Word = 1,
    /// 32 bits.
    DWord = 2,
    /// 64 bits.
    QWord = 3,
}

impl Width {
    /// All widths, narrowest first.
    pub const ALL: [Self; 4] = [Self::Byte, Self::Word, Self::DWord, Self::QWord];

    /// Decode a 2-bit width field. Higher bits are ignored.
    #[must_use]
    pub const fn from_field(field: u16) -> Self {
        match field & 0x3 {
            0 => Self::Byte,
            1 => Self::Word,
            2 => Self::DWord,
            _ => Self::QWord,
        }
    }

    /// Size in bytes.
    #[must_use]
    pub const fn bytes(self) -> u64 {
        1 << (self as u64)
    }

    /// Size in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        8 << (self as u32)
    }

    /// Number of 4-bit nibbles.
    #[must_use]
    pub const fn nibbles(self) -> u32 {
        self.bits() / 4
    }

    /// Mask selecting the bits of this width.
    #[must_use]
    pub const fn mask(self) -> u64 {
        match self {
            Self::Byte => 0xFF,
            Self::Word => 0xFFFF,
            Self::DWord => 0xFFFF_FFFF,
            Self::QWord => u64::MAX,
        }
    }

    /// The most significant bit of this width.
    #[must_use]
    pub const fn sign_bit(self) -> u64 {
        1 << (self.bits() - 1)
    }

    /// Truncate a value to this width.
    #[must_use]
    pub const fn truncate(self, value: u64) -> u64 {
        value & self.mask()
    }

    /// Mnemonic suffix used in traces (`.b`, `.w`, `.d`, `.q`).
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Byte => ".b",
            Self::Word => ".w",
            Self::DWord => ".d",
            Self::QWord => ".q",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_decoding() {
        assert_eq!(Width::from_field(0), Width::Byte);
        assert_eq!(Width::from_field(3), Width::QWord);
        assert_eq!(Width::from_field(0b110), Width::DWord);
    }

    #[test]
    fn geometry() {
        assert_eq!(Width::Word.bytes(), 2);
        assert_eq!(Width::DWord.bits(), 32);
        assert_eq!(Width::QWord.nibbles(), 16);
        assert_eq!(Width::Byte.sign_bit(), 0x80);
        assert_eq!(Width::QWord.sign_bit(), 0x8000_0000_0000_0000);
        assert_eq!(Width::Word.truncate(0x12_3456), 0x3456);
    }
}
