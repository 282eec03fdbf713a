/// Code 128 element width sampling along one image row
use crate::detector::runs::{Run, row_runs};
use crate::error::{Result, ScanError};
use crate::models::BitMatrix;

/// Modules in a data, start or check character
const CHARACTER_MODULES: f32 = 11.0;
/// Modules in the stop pattern
const STOP_MODULES: f32 = 13.0;
/// Elements in the stop pattern
const STOP_ELEMENTS: usize = 7;

/// Quantized widths of every element between `x_start` and `x_end` on `row`
///
/// Runs are returned in reading order, so a reversed candidate yields the
/// same widths as an upright one. Each character is quantized against its
/// own width, which absorbs slow drift in module size across the symbol.
pub fn sample_row(
    binary: &BitMatrix,
    row: usize,
    x_start: usize,
    x_end: usize,
    module_width: f32,
    reversed: bool,
) -> Result<Vec<u8>> {
    if module_width.round() < 1.0 || row >= binary.height() || x_end > binary.width() {
        return Err(ScanError::InsufficientGeometry);
    }

    let mut runs: Vec<Run> = row_runs(binary, row)
        .into_iter()
        .filter(|r| r.start >= x_start && r.end() <= x_end)
        .collect();
    if reversed {
        runs.reverse();
    }

    let count = runs.len();
    if count < STOP_ELEMENTS + 6 || (count - STOP_ELEMENTS) % 6 != 0 {
        return Err(ScanError::FormatError("Code 128 element count"));
    }
    if !runs[0].dark {
        return Err(ScanError::FormatError("Code 128 must start with a bar"));
    }

    let (characters, stop) = runs.split_at(count - STOP_ELEMENTS);
    let mut widths = Vec::with_capacity(count);
    for group in characters.chunks_exact(6) {
        quantize(group, CHARACTER_MODULES, &mut widths)?;
    }
    quantize(stop, STOP_MODULES, &mut widths)?;
    Ok(widths)
}

fn quantize(group: &[Run], modules: f32, out: &mut Vec<u8>) -> Result<()> {
    let total: usize = group.iter().map(|r| r.len).sum();
    let local = total as f32 / modules;
    if local.round() < 1.0 {
        return Err(ScanError::InsufficientGeometry);
    }
    out.extend(
        group
            .iter()
            .map(|r| (r.len as f32 / local).round().clamp(1.0, 4.0) as u8),
    );
    Ok(())
}
