/// Format information extraction from QR code
use super::bch::BchDecoder;
use crate::error::{Result, ScanError};
use crate::models::{BitMatrix, ECLevel, MaskPattern};

/// Format info is 15 bits (5 data + 10 ECC), stored twice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Error correction level
    pub ec_level: ECLevel,
    /// Data mask applied by the encoder
    pub mask_pattern: MaskPattern,
}

impl FormatInfo {
    /// Extract format info from a sampled module grid
    pub fn extract(grid: &BitMatrix) -> Result<Self> {
        let size = grid.width();
        if size < 21 {
            return Err(ScanError::FormatError("grid too small for format info"));
        }
        let [first, second] = format_positions(size);
        let copies = [read_bits(grid, &first), read_bits(grid, &second)];

        let (ec_bits, mask_bits) = BchDecoder::decode_format(&copies)
            .ok_or(ScanError::FormatError("unreadable format information"))?;
        Ok(Self {
            ec_level: ECLevel::from_format_bits(ec_bits),
            mask_pattern: MaskPattern::from_bits(mask_bits),
        })
    }

    /// Masked 15-bit codeword for this format
    pub fn codeword(&self) -> u16 {
        BchDecoder::encode_format(self.ec_level.format_bits() << 3 | self.mask_pattern.bits())
    }
}

/// Module `(x, y)` of every format bit, least significant first, for both copies
pub fn format_positions(size: usize) -> [[(usize, usize); 15]; 2] {
    let mut first = [(0usize, 0usize); 15];
    let mut second = [(0usize, 0usize); 15];
    for (i, slot) in first.iter_mut().enumerate() {
        *slot = match i {
            0..=5 => (8, i),
            6 => (8, 7),
            7 => (8, 8),
            8 => (7, 8),
            _ => (14 - i, 8),
        };
    }
    for (i, slot) in second.iter_mut().enumerate() {
        *slot = if i < 8 {
            (size - 1 - i, 8)
        } else {
            (8, size - 15 + i)
        };
    }
    [first, second]
}

fn read_bits(grid: &BitMatrix, positions: &[(usize, usize); 15]) -> u16 {
    positions
        .iter()
        .enumerate()
        .fold(0u16, |bits, (i, &(x, y))| bits | (grid.get(x, y) as u16) << i)
}
