/// Finder pattern detection using 1:1:3:1:1 ratio scanning with a vertical cross-check
use crate::models::{BitMatrix, Point};

use super::runs::row_runs;

/// A confirmed finder pattern center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderPattern {
    /// Center of the 3x3 module core
    pub center: Point,
    /// Estimated module size in pixels
    pub module_size: f32,
    /// Number of row hits merged into this pattern
    pub hits: usize,
}

impl FinderPattern {
    /// Pattern from a single confirmed hit
    pub fn new(x: f32, y: f32, module_size: f32) -> Self {
        Self {
            center: Point::new(x, y),
            module_size,
            hits: 1,
        }
    }
}

/// Row scanner for QR finder patterns
pub struct FinderDetector;

impl FinderDetector {
    /// Minimum merged hits for a pattern to be reported
    const MIN_HITS: usize = 2;

    /// Scan every row, confirm hits along the column and merge nearby centers
    pub fn detect(matrix: &BitMatrix) -> Vec<FinderPattern> {
        let mut candidates = Vec::new();

        for y in 0..matrix.height() {
            // Early termination: skip rows with no edges worth scanning
            if !Self::has_significant_edges(matrix, y) {
                continue;
            }
            Self::scan_row(matrix, y, &mut candidates);
        }

        let mut merged = Self::merge_candidates(candidates);
        merged.retain(|p| p.hits >= Self::MIN_HITS);
        merged
    }

    /// Check if row has enough edge transitions to potentially contain patterns
    fn has_significant_edges(matrix: &BitMatrix, y: usize) -> bool {
        let width = matrix.width();
        if width == 0 {
            return false;
        }
        let mut transitions = 0;
        let mut prev_color = matrix.get(0, y);

        for x in 1..width {
            let color = matrix.get(x, y);
            if color != prev_color {
                transitions += 1;
                prev_color = color;
                if transitions >= 4 {
                    return true;
                }
            }
        }

        false
    }

    fn scan_row(matrix: &BitMatrix, y: usize, out: &mut Vec<FinderPattern>) {
        let runs = row_runs(matrix, y);
        if runs.len() < 5 {
            return;
        }

        for window in runs.windows(5) {
            // Pattern should be: dark-light-dark-light-dark
            if !(window[0].dark && !window[1].dark && window[2].dark && !window[3].dark && window[4].dark) {
                continue;
            }
            let lengths = [
                window[0].len,
                window[1].len,
                window[2].len,
                window[3].len,
                window[4].len,
            ];
            if !Self::quick_ratio_check(&lengths) || !Self::check_ratios(&lengths) {
                continue;
            }

            let center_x = window[2].start as f32 + window[2].len as f32 / 2.0;
            let unit = lengths.iter().sum::<usize>() as f32 / 7.0;
            if let Some((center_y, v_unit)) =
                Self::cross_check_vertical(matrix, center_x as usize, y, lengths.iter().sum())
            {
                out.push(FinderPattern::new(center_x, center_y, (unit + v_unit) / 2.0));
            }
        }
    }

    /// Quick ratio validation - rough integer check before floating-point math
    fn quick_ratio_check(lengths: &[usize; 5]) -> bool {
        let [b1, w1, b2, w2, b3] = *lengths;
        let total = b1 + w1 + b2 + w2 + b3;

        // Minimum 7 modules at 2 pixels each
        if total < 14 {
            return false;
        }

        // Center black should be roughly 2-5x the outer blacks
        let b2_min = b1.min(b3);
        if b2 < b2_min * 2 || b2 > b2_min * 5 {
            return false;
        }

        let outer_avg = (b1 + b3 + w1 + w2) / 4;
        let w1_ok = w1 * 2 >= outer_avg && w1 <= outer_avg * 2;
        let w2_ok = w2 * 2 >= outer_avg && w2 <= outer_avg * 2;

        w1_ok && w2_ok
    }

    /// Each element within half a module of 1:1:3:1:1
    fn check_ratios(lengths: &[usize; 5]) -> bool {
        let total: usize = lengths.iter().sum();
        if total < 7 {
            return false;
        }
        let unit = total as f32 / 7.0;
        const TOL: f32 = 0.5;
        const EXPECTED: [f32; 5] = [1.0, 1.0, 3.0, 1.0, 1.0];
        lengths
            .iter()
            .zip(EXPECTED)
            .all(|(&len, e)| (len as f32 / unit - e).abs() <= TOL)
    }

    /// Walk the column through a row hit and confirm the same pattern vertically
    ///
    /// Returns the refined center row and the vertical module estimate.
    fn cross_check_vertical(
        matrix: &BitMatrix,
        x: usize,
        y: usize,
        row_total: usize,
    ) -> Option<(f32, f32)> {
        let height = matrix.height() as isize;
        let max_count = row_total;
        let mut counts = [0usize; 5];
        let dark = |row: isize| matrix.get_signed(x as isize, row);

        // Upwards through the core, the light ring and the outer dark ring
        let mut row = y as isize;
        while row >= 0 && dark(row) {
            counts[2] += 1;
            row -= 1;
        }
        while row >= 0 && !dark(row) && counts[1] <= max_count {
            counts[1] += 1;
            row -= 1;
        }
        while row >= 0 && dark(row) && counts[0] <= max_count {
            counts[0] += 1;
            row -= 1;
        }

        // Downwards
        let mut row = y as isize + 1;
        while row < height && dark(row) {
            counts[2] += 1;
            row += 1;
        }
        while row < height && !dark(row) && counts[3] <= max_count {
            counts[3] += 1;
            row += 1;
        }
        while row < height && dark(row) && counts[4] <= max_count {
            counts[4] += 1;
            row += 1;
        }

        if counts.iter().any(|&c| c == 0) {
            return None;
        }
        let total: usize = counts.iter().sum();
        // Vertical extent must agree with the horizontal one
        if 5 * total.abs_diff(row_total) >= 2 * row_total {
            return None;
        }
        if !Self::check_ratios(&counts) {
            return None;
        }

        let end = row as f32;
        let center_y = end - counts[4] as f32 - counts[3] as f32 - counts[2] as f32 / 2.0;
        Some((center_y, total as f32 / 7.0))
    }

    fn merge_candidates(candidates: Vec<FinderPattern>) -> Vec<FinderPattern> {
        let mut merged: Vec<FinderPattern> = Vec::new();

        for candidate in candidates {
            let existing = merged.iter_mut().find(|existing| {
                let radius = 2.0 * existing.module_size.max(candidate.module_size);
                existing.center.distance_squared(&candidate.center) < radius * radius
            });

            match existing {
                Some(existing) => {
                    // Running average weighted by hit count
                    let n = existing.hits as f32;
                    let w = 1.0 / (n + 1.0);
                    existing.center = Point::new(
                        (existing.center.x * n + candidate.center.x) * w,
                        (existing.center.y * n + candidate.center.y) * w,
                    );
                    existing.module_size = (existing.module_size * n + candidate.module_size) * w;
                    existing.hits += 1;
                }
                None => merged.push(candidate),
            }
        }

        merged
    }
}
