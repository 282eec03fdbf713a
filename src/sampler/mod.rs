//! Module sampling
//!
//! Turns a located candidate into the module data its decoder expects:
//! - Linear candidates are re-read as quantized element widths
//! - Matrix candidates are resampled through a perspective transform

/// Perspective grid sampling for QR candidates
pub mod grid;
/// Element width quantization for Code 128 candidates
pub mod linear;

use crate::decoder::RawModules;
use crate::detector::FinderCandidate;
use crate::error::Result;
use crate::models::BitMatrix;

/// Sample the modules of `candidate` from the binarized image
pub fn sample(binary: &BitMatrix, candidate: &FinderCandidate) -> Result<RawModules> {
    match *candidate {
        FinderCandidate::Linear {
            row,
            x_start,
            x_end,
            module_width,
            reversed,
        } => linear::sample_row(binary, row, x_start, x_end, module_width, reversed)
            .map(|widths| RawModules::Linear { widths }),
        FinderCandidate::Matrix {
            top_left,
            top_right,
            bottom_left,
            module_size,
            dimension,
        } => grid::sample_grid(binary, [top_left, top_right, bottom_left], module_size, dimension)
            .map(|grid| RawModules::Matrix { grid }),
    }
}
