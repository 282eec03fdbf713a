/// Version information extraction for QR codes v7+
use super::bch::BchDecoder;
use crate::error::{Result, ScanError};
use crate::models::BitMatrix;
use crate::models::qr_code::version_for_dimension;

/// Version info is 18 bits (6 data + 12 ECC) for versions 7-40
pub struct VersionInfo;

impl VersionInfo {
    /// Version of a sampled grid
    ///
    /// Versions below 7 come from the dimension alone. Larger symbols read
    /// both version blocks, and the decoded version must agree with the
    /// grid size.
    pub fn extract(grid: &BitMatrix) -> Result<u8> {
        let size = grid.width();
        let provisional = version_for_dimension(size)
            .ok_or(ScanError::FormatError("grid size is not 17 + 4v"))?;
        if provisional < 7 {
            return Ok(provisional);
        }

        let [top_right, bottom_left] = version_positions(size);
        let copies = [read_bits(grid, &top_right), read_bits(grid, &bottom_left)];
        let version = BchDecoder::decode_version(&copies)
            .ok_or(ScanError::FormatError("unreadable version information"))?;
        if version != provisional {
            return Err(ScanError::FormatError("version information disagrees with grid size"));
        }
        Ok(version)
    }
}

/// Module `(x, y)` of every version bit, least significant first, for both blocks
pub fn version_positions(size: usize) -> [[(usize, usize); 18]; 2] {
    let mut top_right = [(0usize, 0usize); 18];
    let mut bottom_left = [(0usize, 0usize); 18];
    for i in 0..18 {
        let a = size - 11 + i % 3;
        let b = i / 3;
        top_right[i] = (a, b);
        bottom_left[i] = (b, a);
    }
    [top_right, bottom_left]
}

fn read_bits(grid: &BitMatrix, positions: &[(usize, usize); 18]) -> u32 {
    positions
        .iter()
        .enumerate()
        .fold(0u32, |bits, (i, &(x, y))| bits | (grid.get(x, y) as u32) << i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::qr_code::dimension_for_version;

    fn grid_with_version(version: u8) -> BitMatrix {
        let size = dimension_for_version(version);
        let mut grid = BitMatrix::new(size, size);
        let codeword = BchDecoder::encode_version(version);
        for block in version_positions(size) {
            for (i, (x, y)) in block.into_iter().enumerate() {
                grid.set(x, y, (codeword >> i) & 1 == 1);
            }
        }
        grid
    }

    #[test]
    fn test_small_versions_from_dimension() {
        assert_eq!(VersionInfo::extract(&BitMatrix::new(21, 21)), Ok(1));
        assert_eq!(VersionInfo::extract(&BitMatrix::new(41, 41)), Ok(6));
        assert!(VersionInfo::extract(&BitMatrix::new(22, 22)).is_err());
    }

    #[test]
    fn test_reads_version_blocks() {
        for version in [7u8, 12, 40] {
            assert_eq!(VersionInfo::extract(&grid_with_version(version)), Ok(version));
        }
    }

    #[test]
    fn test_version_mismatch() {
        let v8 = grid_with_version(8);
        // Re-encode as version 9 inside a version 8 sized grid
        let mut grid = v8.clone();
        let codeword = BchDecoder::encode_version(9);
        for block in version_positions(grid.width()) {
            for (i, (x, y)) in block.into_iter().enumerate() {
                grid.set(x, y, (codeword >> i) & 1 == 1);
            }
        }
        assert!(VersionInfo::extract(&grid).is_err());
        assert_eq!(VersionInfo::extract(&v8), Ok(8));
    }
}
