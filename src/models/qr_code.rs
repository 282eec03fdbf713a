/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    H,
}

impl ECLevel {
    /// Get error correction level from the two format bits (01=L, 00=M, 11=Q, 10=H)
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// Two-bit value stored in the format information
    pub fn format_bits(&self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }

    /// Row index into the block tables
    pub fn ordinal(&self) -> usize {
        match self {
            ECLevel::L => 0,
            ECLevel::M => 1,
            ECLevel::Q => 2,
            ECLevel::H => 3,
        }
    }
}

/// Mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskPattern {
    /// (i + j) % 2 == 0
    Pattern0 = 0,
    /// i % 2 == 0
    Pattern1 = 1,
    /// j % 3 == 0
    Pattern2 = 2,
    /// (i + j) % 3 == 0
    Pattern3 = 3,
    /// (i/2 + j/3) % 2 == 0
    Pattern4 = 4,
    /// (i*j)%2 + (i*j)%3 == 0
    Pattern5 = 5,
    /// ((i*j)%2 + (i*j)%3) % 2 == 0
    Pattern6 = 6,
    /// ((i+j)%2 + (i*j)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// Get mask pattern from bits
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => MaskPattern::Pattern0,
            1 => MaskPattern::Pattern1,
            2 => MaskPattern::Pattern2,
            3 => MaskPattern::Pattern3,
            4 => MaskPattern::Pattern4,
            5 => MaskPattern::Pattern5,
            6 => MaskPattern::Pattern6,
            _ => MaskPattern::Pattern7,
        }
    }

    /// Three-bit value stored in the format information
    pub fn bits(&self) -> u8 {
        *self as u8
    }

    /// Check if module at row `i`, column `j` is inverted by this mask
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => ((i * j) % 2 + (i * j) % 3) == 0,
            MaskPattern::Pattern6 => (((i * j) % 2) + ((i * j) % 3)) % 2 == 0,
            MaskPattern::Pattern7 => (((i + j) % 2) + ((i * j) % 3)) % 2 == 0,
        }
    }
}

/// Side length in modules of a Model 2 symbol
pub fn dimension_for_version(version: u8) -> usize {
    17 + 4 * version as usize
}

/// Version implied by a side length, if it is a valid Model 2 size
pub fn version_for_dimension(dimension: usize) -> Option<u8> {
    if dimension < 21 || (dimension - 17) % 4 != 0 {
        return None;
    }
    let version = (dimension - 17) / 4;
    (1..=40).contains(&version).then_some(version as u8)
}
