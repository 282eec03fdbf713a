//! QR code data mode decoders
//!
//! This module contains decoders (and the matching encoders) for the QR data modes:
//! - Numeric: Efficient encoding for digits (0-9)
//! - Alphanumeric: Upper-case letters, digits and nine symbols
//! - Byte: 8-bit data (UTF-8, binary, etc.)
//! - Kanji: 13-bit packed Shift-JIS double-byte characters

/// Alphanumeric mode (45-character table)
pub mod alphanumeric;
/// Byte mode
pub mod byte;
/// Kanji mode (13-bit Shift-JIS)
pub mod kanji;
/// Numeric mode
pub mod numeric;

/// Segment mode indicator (4 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// End of message (0000)
    Terminator,
    /// Digits, 3 per 10 bits (0001)
    Numeric,
    /// 45-character set, 2 per 11 bits (0010)
    Alphanumeric,
    /// Structured append header (0011)
    StructuredAppend,
    /// Raw bytes (0100)
    Byte,
    /// FNC1 in first position (0101)
    Fnc1First,
    /// Extended channel interpretation designator (0111)
    Eci,
    /// Shift-JIS double-byte characters (1000)
    Kanji,
    /// FNC1 in second position (1001)
    Fnc1Second,
}

impl Mode {
    /// Mode for a 4-bit indicator, `None` for reserved values
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0b0000 => Some(Mode::Terminator),
            0b0001 => Some(Mode::Numeric),
            0b0010 => Some(Mode::Alphanumeric),
            0b0011 => Some(Mode::StructuredAppend),
            0b0100 => Some(Mode::Byte),
            0b0101 => Some(Mode::Fnc1First),
            0b0111 => Some(Mode::Eci),
            0b1000 => Some(Mode::Kanji),
            0b1001 => Some(Mode::Fnc1Second),
            _ => None,
        }
    }

    /// 4-bit indicator written before a segment
    pub fn bits(&self) -> u32 {
        match self {
            Mode::Terminator => 0b0000,
            Mode::Numeric => 0b0001,
            Mode::Alphanumeric => 0b0010,
            Mode::StructuredAppend => 0b0011,
            Mode::Byte => 0b0100,
            Mode::Fnc1First => 0b0101,
            Mode::Eci => 0b0111,
            Mode::Kanji => 0b1000,
            Mode::Fnc1Second => 0b1001,
        }
    }

    /// Width of the character count field; zero for modes without one
    pub fn char_count_bits(&self, version: u8) -> usize {
        let class = match version {
            0..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match self {
            Mode::Numeric => [10, 12, 14][class],
            Mode::Alphanumeric => [9, 11, 13][class],
            Mode::Byte => [8, 16, 16][class],
            Mode::Kanji => [8, 10, 12][class],
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_count_bits() {
        assert_eq!(Mode::Numeric.char_count_bits(1), 10);
        assert_eq!(Mode::Numeric.char_count_bits(10), 12);
        assert_eq!(Mode::Alphanumeric.char_count_bits(27), 13);
        assert_eq!(Mode::Byte.char_count_bits(9), 8);
        assert_eq!(Mode::Byte.char_count_bits(40), 16);
        assert_eq!(Mode::Kanji.char_count_bits(26), 10);
        assert_eq!(Mode::Eci.char_count_bits(5), 0);
    }

    #[test]
    fn test_mode_bits() {
        for bits in 0..16 {
            if let Some(mode) = Mode::from_bits(bits) {
                assert_eq!(mode.bits(), bits);
            }
        }
        assert_eq!(Mode::from_bits(0b0110), None);
    }
}
