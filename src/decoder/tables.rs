//! Error correction block tables (ISO/IEC 18004 Model 2)

use super::function_mask::num_raw_data_modules;
use crate::models::ECLevel;

/// Block structure of one version / EC level combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcBlockInfo {
    /// Number of RS blocks
    pub num_blocks: usize,
    /// Check codewords in every block
    pub ecc_per_block: usize,
    /// Total codewords (data + check) in the symbol
    pub total_codewords: usize,
}

impl EcBlockInfo {
    /// Blocks with one fewer data codeword; they come first
    pub fn num_short_blocks(&self) -> usize {
        self.num_blocks - self.total_codewords % self.num_blocks
    }

    /// Codewords (data + check) in a short block
    pub fn short_block_len(&self) -> usize {
        self.total_codewords / self.num_blocks
    }

    /// Data codewords in block `index`
    pub fn data_len(&self, index: usize) -> usize {
        let short = self.short_block_len() - self.ecc_per_block;
        if index < self.num_short_blocks() { short } else { short + 1 }
    }

    /// Data codewords across all blocks
    pub fn num_data_codewords(&self) -> usize {
        self.total_codewords - self.num_blocks * self.ecc_per_block
    }
}

// Index: [ec_level][version]; column 0 is unused
const ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

const NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Block structure for `version` at `ec_level`, `None` outside 1..=40
pub fn ec_block_info(version: u8, ec_level: ECLevel) -> Option<EcBlockInfo> {
    if !(1..=40).contains(&version) {
        return None;
    }
    let idx = ec_level.ordinal();
    let ecc = ECC_CODEWORDS_PER_BLOCK[idx][version as usize];
    let blocks = NUM_ERROR_CORRECTION_BLOCKS[idx][version as usize];
    if ecc <= 0 || blocks <= 0 {
        return None;
    }
    Some(EcBlockInfo {
        num_blocks: blocks as usize,
        ecc_per_block: ecc as usize,
        total_codewords: num_raw_data_modules(version) / 8,
    })
}

/// Data codewords available at `version` / `ec_level`
pub fn num_data_codewords(version: u8, ec_level: ECLevel) -> Option<usize> {
    ec_block_info(version, ec_level).map(|info| info.num_data_codewords())
}
