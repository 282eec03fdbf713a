//! Symbol location
//!
//! This module finds candidate symbols in a binarized image:
//! - Code 128 start/stop pattern scanning along rows
//! - QR finder pattern detection (the three square markers)
//! - Finder grouping and ordering into candidate symbols
//! - Alignment pattern search used by the grid sampler

/// Alignment pattern search for QR versions 2+
pub mod alignment;
/// QR finder pattern detection using 1:1:3:1:1 ratio scanning
pub mod finder;
/// Finder triple grouping, scoring and ordering
pub mod grouping;
/// Code 128 start/stop pattern scanning
pub mod linear;
/// Row run-length encoding
pub mod runs;

use log::trace;

use crate::models::{BitMatrix, BoundingBox, Point, SymbologyType};

use finder::FinderDetector;
use linear::LinearCandidates;

/// Geometric hint for a located but not yet sampled symbol
#[derive(Debug, Clone, PartialEq)]
pub enum FinderCandidate {
    /// Code 128 symbol found on a single row
    Linear {
        /// Image row the symbol was found on
        row: usize,
        /// Leftmost pixel of the start (or, when reversed, stop) pattern
        x_start: usize,
        /// One past the rightmost pixel of the symbol
        x_end: usize,
        /// Estimated module width in pixels
        module_width: f32,
        /// The symbol reads right-to-left (rotated by 180°)
        reversed: bool,
    },
    /// QR symbol located by its three finder patterns
    Matrix {
        /// Center of the top-left finder
        top_left: Point,
        /// Center of the top-right finder
        top_right: Point,
        /// Center of the bottom-left finder
        bottom_left: Point,
        /// Estimated module size in pixels
        module_size: f32,
        /// Estimated side length in modules (`17 + 4v`)
        dimension: usize,
    },
}

impl FinderCandidate {
    /// Symbology this candidate would decode as
    pub fn symbology(&self) -> SymbologyType {
        match self {
            FinderCandidate::Linear { .. } => SymbologyType::Code128,
            FinderCandidate::Matrix { .. } => SymbologyType::QrCode,
        }
    }

    /// Image-space outline of the candidate
    pub fn bounding_box(&self) -> BoundingBox {
        match *self {
            FinderCandidate::Linear {
                row,
                x_start,
                x_end,
                reversed,
                ..
            } => {
                let y = row as f32;
                let left = Point::new(x_start as f32, y);
                let right = Point::new(x_end as f32, y);
                if reversed {
                    BoundingBox::new([right, left, left, right])
                } else {
                    BoundingBox::new([left, right, right, left])
                }
            }
            FinderCandidate::Matrix {
                top_left,
                top_right,
                bottom_left,
                module_size,
                ..
            } => {
                // Finder centers sit 3.5 modules inside the symbol corners
                let across = unit(top_right.sub(&top_left)).scale(3.5 * module_size);
                let down = unit(bottom_left.sub(&top_left)).scale(3.5 * module_size);
                let tl = top_left.translate(-across.x - down.x, -across.y - down.y);
                let tr = top_right.translate(across.x - down.x, across.y - down.y);
                let bl = bottom_left.translate(down.x - across.x, down.y - across.y);
                let br = tr.translate(bl.x - tl.x, bl.y - tl.y);
                BoundingBox::new([tl, tr, br, bl])
            }
        }
    }
}

fn unit(v: Point) -> Point {
    let len = (v.x * v.x + v.y * v.y).sqrt();
    if len == 0.0 { v } else { v.scale(1.0 / len) }
}

/// Finite, single-pass stream of candidates for one symbology
pub enum Candidates<'a> {
    /// Row-by-row Code 128 scan, produced lazily
    Linear(LinearCandidates<'a>),
    /// Grouped QR finder triples, best-scored first
    Matrix(std::vec::IntoIter<FinderCandidate>),
}

impl Iterator for Candidates<'_> {
    type Item = FinderCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Candidates::Linear(inner) => inner.next(),
            Candidates::Matrix(inner) => inner.next(),
        }
    }
}

/// Locate candidate symbols of one symbology in a binarized image
pub fn locate(binary: &BitMatrix, symbology: SymbologyType) -> Candidates<'_> {
    match symbology {
        SymbologyType::Code128 => Candidates::Linear(LinearCandidates::new(binary)),
        SymbologyType::QrCode => {
            let patterns = FinderDetector::detect(binary);
            let candidates = grouping::group_candidates(&patterns);
            trace!(
                "qr locator: {} finder patterns, {} candidate triples",
                patterns.len(),
                candidates.len()
            );
            Candidates::Matrix(candidates.into_iter())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_image_has_no_candidates() {
        let binary = BitMatrix::new(64, 64);
        for symbology in SymbologyType::ALL {
            assert_eq!(locate(&binary, symbology).count(), 0);
        }
    }

    #[test]
    fn test_linear_bounding_box_orientation() {
        let candidate = FinderCandidate::Linear {
            row: 7,
            x_start: 10,
            x_end: 100,
            module_width: 2.0,
            reversed: true,
        };
        let bbox = candidate.bounding_box();
        assert_eq!(bbox.corners[0], Point::new(100.0, 7.0));
        assert_eq!(bbox.top(), 7.0);
        assert_eq!(bbox.left(), 10.0);
        assert_eq!(candidate.symbology(), SymbologyType::Code128);
    }

    #[test]
    fn test_matrix_bounding_box_encloses_finders() {
        let candidate = FinderCandidate::Matrix {
            top_left: Point::new(14.0, 14.0),
            top_right: Point::new(70.0, 14.0),
            bottom_left: Point::new(14.0, 70.0),
            module_size: 4.0,
            dimension: 21,
        };
        let bbox = candidate.bounding_box();
        assert!(bbox.corners[0].distance(&Point::new(0.0, 0.0)) < 1e-3);
        assert!(bbox.corners[2].distance(&Point::new(84.0, 84.0)) < 1e-3);
    }
}
