/// Code 128 start/stop pattern scanning along image rows
use std::collections::VecDeque;

use super::FinderCandidate;
use super::runs::{Run, row_runs};
use crate::decoder::code128::{PATTERNS, START_A, START_C, STOP_PATTERN};
use crate::models::BitMatrix;

/// Minimum light run before the start and after the stop, in modules
pub const QUIET_ZONE_MODULES: f32 = 5.0;

/// Modules in start + check character + stop, before any data characters
const FIXED_MODULES: f32 = 35.0;

/// Lazily scans rows top to bottom, yielding every start/stop pair found
pub struct LinearCandidates<'a> {
    binary: &'a BitMatrix,
    row: usize,
    pending: VecDeque<FinderCandidate>,
}

impl<'a> LinearCandidates<'a> {
    /// Scanner over every row of `binary`
    pub fn new(binary: &'a BitMatrix) -> Self {
        Self {
            binary,
            row: 0,
            pending: VecDeque::new(),
        }
    }

    fn scan_row(&mut self, y: usize) {
        let runs = row_runs(self.binary, y);
        if runs.len() < 13 {
            return;
        }
        scan_runs(&runs, y, false, &mut self.pending);

        let reversed: Vec<Run> = runs.iter().rev().copied().collect();
        scan_runs(&reversed, y, true, &mut self.pending);
    }
}

impl Iterator for LinearCandidates<'_> {
    type Item = FinderCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(candidate) = self.pending.pop_front() {
                return Some(candidate);
            }
            if self.row >= self.binary.height() {
                return None;
            }
            let y = self.row;
            self.row += 1;
            self.scan_row(y);
        }
    }
}

/// Scan runs in reading order; `runs` is reversed for right-to-left reading
fn scan_runs(runs: &[Run], y: usize, reversed: bool, out: &mut VecDeque<FinderCandidate>) {
    let mut i = 0;
    while i + 13 <= runs.len() {
        if !runs[i].dark {
            i += 1;
            continue;
        }

        let start = &runs[i..i + 6];
        let module = total_len(start) as f32 / 11.0;
        if !quiet_before(runs, i, module) || !is_start(start, module) {
            i += 1;
            continue;
        }

        let Some(stop) = find_stop(runs, i, module) else {
            i += 1;
            continue;
        };

        let first = runs[i];
        let last = runs[stop + 6];
        let (x_start, x_end) = if reversed {
            (last.start, first.end())
        } else {
            (first.start, last.end())
        };

        if plausible_module_count(x_end - x_start, module) {
            out.push_back(FinderCandidate::Linear {
                row: y,
                x_start,
                x_end,
                module_width: module,
                reversed,
            });
        }
        i = stop + 7;
    }
}

fn total_len(runs: &[Run]) -> usize {
    runs.iter().map(|r| r.len).sum()
}

/// Whether each run is within tolerance of `expected` modules of width `module`
pub(crate) fn matches_widths(runs: &[Run], expected: &[u8], module: f32) -> bool {
    runs.len() == expected.len()
        && runs.iter().zip(expected).all(|(run, &e)| {
            let e = e as f32;
            let tolerance = (0.3 * e).max(0.5) * module;
            (run.len as f32 - e * module).abs() <= tolerance
        })
}

fn is_start(runs: &[Run], module: f32) -> bool {
    (START_A..=START_C).any(|value| matches_widths(runs, &PATTERNS[value], module))
}

fn quiet_before(runs: &[Run], i: usize, module: f32) -> bool {
    if i == 0 {
        return true;
    }
    let space = &runs[i - 1];
    i - 1 == 0 || space.len as f32 >= QUIET_ZONE_MODULES * module
}

fn quiet_after(runs: &[Run], k: usize, module: f32) -> bool {
    if k + 1 >= runs.len() {
        return true;
    }
    runs[k].len as f32 >= QUIET_ZONE_MODULES * module
}

/// Index of the stop pattern's first run, searched at character boundaries
fn find_stop(runs: &[Run], start: usize, module: f32) -> Option<usize> {
    let max_run = QUIET_ZONE_MODULES * module;
    let mut j = start + 6;
    while j + 7 <= runs.len() {
        let stop = &runs[j..j + 7];
        let local = total_len(stop) as f32 / 13.0;
        if matches_widths(stop, &STOP_PATTERN, local) && quiet_after(runs, j + 7, local) {
            return Some(j);
        }
        // A quiet-zone sized gap inside the symbol ends the search
        if runs[j..j + 6].iter().any(|r| r.len as f32 > max_run) {
            return None;
        }
        j += 6;
    }
    None
}

/// Symbol widths must be `35 + 11k` modules, within 1.5 modules
fn plausible_module_count(width_px: usize, module: f32) -> bool {
    if module <= 0.0 {
        return false;
    }
    let modules = width_px as f32 / module;
    if modules < FIXED_MODULES - 1.5 {
        return false;
    }
    let k = ((modules - FIXED_MODULES) / 11.0).round().max(0.0);
    (modules - (FIXED_MODULES + 11.0 * k)).abs() <= 1.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::code128::encode;

    fn matrix_from_widths(widths: &[u8], module: usize, quiet: usize, reverse: bool) -> BitMatrix {
        let total: usize = widths.iter().map(|&w| w as usize).sum::<usize>() + 2 * quiet;
        let mut matrix = BitMatrix::new(total * module, 3);
        let mut x = quiet;
        for (i, &w) in widths.iter().enumerate() {
            if i % 2 == 0 {
                for m in x..x + w as usize {
                    for px in m * module..(m + 1) * module {
                        let px = if reverse { total * module - 1 - px } else { px };
                        for y in 0..3 {
                            matrix.set(px, y, true);
                        }
                    }
                }
            }
            x += w as usize;
        }
        matrix
    }

    #[test]
    fn test_finds_start_and_stop() {
        let widths = encode(b"HELLO").unwrap();
        let matrix = matrix_from_widths(&widths, 2, 10, false);
        let candidates: Vec<_> = LinearCandidates::new(&matrix).collect();
        assert_eq!(candidates.len(), 3);
        match &candidates[0] {
            FinderCandidate::Linear {
                row,
                x_start,
                x_end,
                module_width,
                reversed,
            } => {
                assert_eq!(*row, 0);
                assert_eq!(*x_start, 20);
                assert_eq!(*x_end, 20 + 2 * (35 + 11 * 5));
                assert!((module_width - 2.0).abs() < 1e-3);
                assert!(!reversed);
            }
            other => panic!("unexpected candidate {other:?}"),
        }
    }

    #[test]
    fn test_finds_reversed_symbol() {
        let widths = encode(b"Code 128").unwrap();
        let matrix = matrix_from_widths(&widths, 3, 10, true);
        let candidate = LinearCandidates::new(&matrix).next().unwrap();
        assert!(matches!(
            candidate,
            FinderCandidate::Linear { reversed: true, x_start: 30, .. }
        ));
    }

    #[test]
    fn test_missing_quiet_zone_is_rejected() {
        let widths = encode(b"HELLO").unwrap();
        let mut matrix = matrix_from_widths(&widths, 2, 10, false);
        // Bar 4 px before the start pattern leaves a 2 module quiet zone
        for y in 0..3 {
            matrix.set(14, y, true);
            matrix.set(15, y, true);
        }
        assert_eq!(LinearCandidates::new(&matrix).count(), 0);
    }

    #[test]
    fn test_plausible_module_count() {
        assert!(plausible_module_count(2 * 46, 2.0));
        assert!(plausible_module_count(2 * 35, 2.0));
        assert!(plausible_module_count(2 * 90 + 2, 2.0));
        assert!(!plausible_module_count(2 * 90 + 4, 2.0));
        assert!(!plausible_module_count(2 * 41, 2.0));
        assert!(!plausible_module_count(20, 2.0));
    }
}
