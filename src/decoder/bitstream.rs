/// Bitstream extraction from QR code matrix
use crate::decoder::function_mask::FunctionMask;
use crate::models::BitMatrix;

/// Data module coordinates `(x, y)` in placement order
///
/// Two-column strips from the right edge, alternating upward and downward,
/// skipping the vertical timing column.
pub fn data_module_positions(func: &FunctionMask) -> Vec<(usize, usize)> {
    let dimension = func.size();
    let mut positions = Vec::with_capacity(func.data_modules_count());

    let mut upward = true;
    let mut col = dimension as isize - 1;
    while col > 0 {
        if col == 6 {
            col -= 1;
            continue;
        }

        for step in 0..dimension {
            let row = if upward { dimension - 1 - step } else { step };
            for x in [col as usize, col as usize - 1] {
                if !func.is_function(x, row) {
                    positions.push((x, row));
                }
            }
        }

        upward = !upward;
        col -= 2;
    }

    positions
}

/// Read the data bits of an unmasked grid
pub fn extract_bits(grid: &BitMatrix, func: &FunctionMask) -> Vec<bool> {
    data_module_positions(func)
        .into_iter()
        .map(|(x, y)| grid.get(x, y))
        .collect()
}

/// Pack bits MSB first; trailing remainder bits are dropped
pub fn bits_to_codewords(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | bit as u8))
        .collect()
}

/// Sequential reader over a byte slice, most significant bit first
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Reader positioned at the first bit of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bits not yet consumed
    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.position
    }

    /// Read `count` bits (at most 32) as an unsigned integer
    pub fn read(&mut self, count: usize) -> Option<u32> {
        if count > 32 || count > self.remaining() {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..count {
            let byte = self.data[self.position / 8];
            let bit = (byte >> (7 - self.position % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.position += 1;
        }
        Some(value)
    }
}

/// Growable bit sequence used when building a symbol
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bits: Vec<bool>,
}

impl BitBuffer {
    /// Empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `count` bits of `value`, most significant first
    pub fn push(&mut self, value: u32, count: usize) {
        for i in (0..count).rev() {
            self.bits.push((value >> i) & 1 == 1);
        }
    }

    /// Number of bits written
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True when nothing has been written
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bits written so far
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Pack into bytes, zero-padding the final byte
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |byte, (i, &bit)| byte | (bit as u8) << (7 - i))
            })
            .collect()
    }
}
