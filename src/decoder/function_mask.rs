use crate::models::BitMatrix;
use crate::models::qr_code::dimension_for_version;

/// Function module mask for a specific QR version.
/// true = function module (not data), false = data module.
pub struct FunctionMask {
    mask: BitMatrix,
    version: u8,
}

impl FunctionMask {
    /// Mask marking finders, separators, timing, alignment, format, dark and version modules
    pub fn new(version: u8) -> Self {
        let size = dimension_for_version(version);
        let mut mask = BitMatrix::new(size, size);

        // Finder patterns + separators (8x8 areas, clipped to bounds)
        Self::mark_finder_area(&mut mask, 0, 0);
        Self::mark_finder_area(&mut mask, size - 7, 0);
        Self::mark_finder_area(&mut mask, 0, size - 7);

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        for (cx, cy) in alignment_centers(version) {
            for y in cy - 2..=cy + 2 {
                for x in cx - 2..=cx + 2 {
                    mask.set(x, y, true);
                }
            }
        }

        // Format info areas
        for i in 0..9 {
            mask.set(8, i, true);
            mask.set(i, 8, true);
        }
        for i in 0..8 {
            mask.set(size - 1 - i, 8, true);
            mask.set(8, size - 1 - i, true);
        }

        // Dark module
        mask.set(8, size - 8, true);

        // Version info (v7+): 6x3 above bottom-left finder, 3x6 left of top-right
        if version >= 7 {
            for long in 0..6 {
                for short in 0..3 {
                    mask.set(size - 11 + short, long, true);
                    mask.set(long, size - 11 + short, true);
                }
            }
        }

        Self { mask, version }
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.mask.width()
    }

    /// Version the mask was built for
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Whether module at column `x`, row `y` is a function module
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Modules left for data and error correction
    pub fn data_modules_count(&self) -> usize {
        let size = self.size();
        size * size - self.mask.count_set()
    }

    fn mark_finder_area(mask: &mut BitMatrix, x: usize, y: usize) {
        let size = mask.width();
        let start_x = x.saturating_sub(1);
        let start_y = y.saturating_sub(1);
        let end_x = (x + 8).min(size);
        let end_y = (y + 8).min(size);
        for yy in start_y..end_y {
            for xx in start_x..end_x {
                mask.set(xx, yy, true);
            }
        }
    }
}

/// Alignment pattern center coordinates (one axis) for a given version.
pub fn alignment_pattern_positions(version: u8) -> Vec<usize> {
    if version <= 1 {
        return Vec::new();
    }
    let num_align = version as usize / 7 + 2;
    let size = dimension_for_version(version);
    let step = if version == 32 {
        26
    } else {
        (version as usize * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };

    let mut positions = vec![6usize; num_align];
    for (i, slot) in positions.iter_mut().skip(1).rev().enumerate() {
        *slot = size - 7 - i * step;
    }
    positions
}

/// Every alignment pattern center `(x, y)`, skipping the three finder corners
pub fn alignment_centers(version: u8) -> Vec<(usize, usize)> {
    let positions = alignment_pattern_positions(version);
    let last = positions.len().saturating_sub(1);
    let mut centers = Vec::new();
    for (i, &y) in positions.iter().enumerate() {
        for (j, &x) in positions.iter().enumerate() {
            let corner = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
            if !corner {
                centers.push((x, y));
            }
        }
    }
    centers
}

/// Number of modules available for data and EC codewords (remainder bits included)
pub fn num_raw_data_modules(version: u8) -> usize {
    let v = version as usize;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_positions() {
        assert!(alignment_pattern_positions(1).is_empty());
        assert_eq!(alignment_pattern_positions(2), vec![6, 18]);
        assert_eq!(alignment_pattern_positions(7), vec![6, 22, 38]);
        assert_eq!(alignment_pattern_positions(14), vec![6, 26, 46, 66]);
        assert_eq!(alignment_pattern_positions(32), vec![6, 34, 60, 86, 112, 138]);
        assert_eq!(alignment_pattern_positions(40), vec![6, 30, 58, 86, 114, 142, 170]);
        assert_eq!(alignment_centers(2), vec![(18, 18)]);
        assert_eq!(alignment_centers(7).len(), 6);
    }

    #[test]
    fn test_data_module_counts_match_formula() {
        for version in 1..=40u8 {
            let mask = FunctionMask::new(version);
            assert_eq!(
                mask.data_modules_count(),
                num_raw_data_modules(version),
                "version {version}"
            );
        }
    }

    #[test]
    fn test_version_1_layout() {
        let mask = FunctionMask::new(1);
        assert_eq!(mask.size(), 21);
        assert!(mask.is_function(0, 0));
        assert!(mask.is_function(7, 7));
        assert!(mask.is_function(8, 13));
        assert!(!mask.is_function(9, 9));
        assert!(!mask.is_function(20, 20));
        assert_eq!(mask.data_modules_count(), 208);
    }
}
