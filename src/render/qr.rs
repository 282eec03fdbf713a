/// QR Model 2 symbol construction
use crate::decoder::bch::BchDecoder;
use crate::decoder::bitstream::{BitBuffer, data_module_positions};
use crate::decoder::format::{FormatInfo, format_positions};
use crate::decoder::function_mask::{FunctionMask, alignment_centers};
use crate::decoder::modes::{Mode, alphanumeric, byte, numeric};
use crate::decoder::reed_solomon::ReedSolomonEncoder;
use crate::decoder::tables::{EcBlockInfo, ec_block_info};
use crate::decoder::unmask::apply_mask;
use crate::decoder::version::version_positions;
use crate::error::{Result, ScanError};
use crate::models::qr_code::dimension_for_version;
use crate::models::{BitMatrix, ECLevel, MaskPattern};

/// Builds QR module grids for a single-segment payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrEncoder {
    ec_level: ECLevel,
    version: Option<u8>,
    mask: MaskPattern,
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new(ECLevel::M)
    }
}

impl QrEncoder {
    /// Encoder at `ec_level`, smallest fitting version, mask 0
    pub fn new(ec_level: ECLevel) -> Self {
        Self {
            ec_level,
            version: None,
            mask: MaskPattern::Pattern0,
        }
    }

    /// Force a version instead of picking the smallest that fits
    pub fn with_version(mut self, version: u8) -> Self {
        self.version = Some(version);
        self
    }

    /// Data mask to apply
    pub fn with_mask(mut self, mask: MaskPattern) -> Self {
        self.mask = mask;
        self
    }

    /// Module grid for `data`, `true` = dark, without quiet zone
    ///
    /// The mode is numeric, alphanumeric or byte, whichever is the most
    /// compact for the whole payload.
    pub fn encode(&self, data: &[u8]) -> Result<BitMatrix> {
        if data.is_empty() {
            return Err(ScanError::FormatError("nothing to encode"));
        }
        let mode = if numeric::is_numeric(data) {
            Mode::Numeric
        } else if alphanumeric::is_alphanumeric(data) {
            Mode::Alphanumeric
        } else {
            Mode::Byte
        };

        let version = match self.version {
            Some(v) if self.fits(mode, data.len(), v) => v,
            Some(_) => return Err(ScanError::FormatError("payload does not fit the version")),
            None => (1..=40)
                .find(|&v| self.fits(mode, data.len(), v))
                .ok_or(ScanError::FormatError("payload too large for any version"))?,
        };
        let info = ec_block_info(version, self.ec_level)
            .ok_or(ScanError::FormatError("no block table for version"))?;

        let codewords = self.data_codewords(mode, data, version, &info);
        let interleaved = add_error_correction(&codewords, &info);
        Ok(self.build_grid(version, &interleaved))
    }

    fn fits(&self, mode: Mode, len: usize, version: u8) -> bool {
        let Some(info) = ec_block_info(version, self.ec_level) else {
            return false;
        };
        let count_bits = mode.char_count_bits(version);
        len < 1 << count_bits
            && 4 + count_bits + segment_bits(mode, len) <= info.num_data_codewords() * 8
    }

    fn data_codewords(&self, mode: Mode, data: &[u8], version: u8, info: &EcBlockInfo) -> Vec<u8> {
        let capacity = info.num_data_codewords() * 8;
        let mut buffer = BitBuffer::new();
        buffer.push(mode.bits(), 4);
        buffer.push(data.len() as u32, mode.char_count_bits(version));
        match mode {
            Mode::Numeric => numeric::encode(data, &mut buffer),
            Mode::Alphanumeric => alphanumeric::encode(data, &mut buffer),
            _ => byte::encode(data, &mut buffer),
        }

        buffer.push(0, (capacity - buffer.len()).min(4));
        let mut codewords = buffer.to_bytes();
        for pad in [0xEC, 0x11].into_iter().cycle() {
            if codewords.len() >= info.num_data_codewords() {
                break;
            }
            codewords.push(pad);
        }
        codewords
    }

    fn build_grid(&self, version: u8, codewords: &[u8]) -> BitMatrix {
        let size = dimension_for_version(version);
        let func = FunctionMask::new(version);
        let mut grid = BitMatrix::new(size, size);

        for (fx, fy) in [(0, 0), (size - 7, 0), (0, size - 7)] {
            draw_square(&mut grid, fx + 3, fy + 3, 3);
        }
        for i in 8..size - 8 {
            grid.set(i, 6, i % 2 == 0);
            grid.set(6, i, i % 2 == 0);
        }
        for (cx, cy) in alignment_centers(version) {
            draw_square(&mut grid, cx, cy, 2);
        }
        grid.set(8, size - 8, true);

        for (i, (x, y)) in data_module_positions(&func).into_iter().enumerate() {
            let bit = codewords
                .get(i / 8)
                .is_some_and(|&cw| (cw >> (7 - i % 8)) & 1 == 1);
            grid.set(x, y, bit);
        }
        apply_mask(&mut grid, self.mask, &func);

        let format = FormatInfo {
            ec_level: self.ec_level,
            mask_pattern: self.mask,
        }
        .codeword();
        for copy in format_positions(size) {
            for (i, (x, y)) in copy.into_iter().enumerate() {
                grid.set(x, y, (format >> i) & 1 == 1);
            }
        }

        if version >= 7 {
            let bits = BchDecoder::encode_version(version);
            for block in version_positions(size) {
                for (i, (x, y)) in block.into_iter().enumerate() {
                    grid.set(x, y, (bits >> i) & 1 == 1);
                }
            }
        }
        grid
    }
}

/// Bits taken by the data of a segment of `len` characters
fn segment_bits(mode: Mode, len: usize) -> usize {
    match mode {
        Mode::Numeric => len / 3 * 10 + [0, 4, 7][len % 3],
        Mode::Alphanumeric => len / 2 * 11 + (len % 2) * 6,
        _ => len * 8,
    }
}

/// Split data into blocks, append check codewords and interleave
fn add_error_correction(data: &[u8], info: &EcBlockInfo) -> Vec<u8> {
    let encoder = ReedSolomonEncoder::new(info.ecc_per_block);
    let mut blocks = Vec::with_capacity(info.num_blocks);
    let mut offset = 0;
    for b in 0..info.num_blocks {
        let len = info.data_len(b);
        let block = &data[offset..offset + len];
        blocks.push((block, encoder.remainder(block)));
        offset += len;
    }

    let mut out = Vec::with_capacity(info.total_codewords);
    for i in 0..info.data_len(info.num_blocks - 1) {
        out.extend(blocks.iter().filter_map(|(d, _)| d.get(i)));
    }
    for i in 0..info.ecc_per_block {
        out.extend(blocks.iter().map(|(_, ecc)| ecc[i]));
    }
    out
}

/// Finder or alignment pattern: dark except for the ring just inside the border
fn draw_square(grid: &mut BitMatrix, cx: usize, cy: usize, radius: usize) {
    for y in cy - radius..=cy + radius {
        for x in cx - radius..=cx + radius {
            let ring = x.abs_diff(cx).max(y.abs_diff(cy));
            grid.set(x, y, ring + 1 != radius);
        }
    }
}
