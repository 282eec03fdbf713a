/// Perspective sampling of a QR module grid
use log::trace;

use crate::decoder::function_mask::alignment_centers;
use crate::detector::alignment::find_alignment;
use crate::error::{Result, ScanError};
use crate::models::qr_code::version_for_dimension;
use crate::models::{BitMatrix, Point};
use crate::utils::geometry::PerspectiveTransform;

/// Modules of at least this many pixels are read by a 3x3 majority vote
const MAJORITY_MODULE_PX: f32 = 3.0;

/// Resample a `dimension`-square grid from three finder centers
///
/// `finders` are the top-left, top-right and bottom-left centers. The fourth
/// correspondence is the bottom-right alignment pattern when one is found,
/// the parallelogram corner `tr + bl - tl` otherwise.
pub fn sample_grid(
    binary: &BitMatrix,
    finders: [Point; 3],
    module_size: f32,
    dimension: usize,
) -> Result<BitMatrix> {
    if module_size.round() < 1.0 {
        return Err(ScanError::InsufficientGeometry);
    }
    let version = version_for_dimension(dimension).ok_or(ScanError::InsufficientGeometry)?;
    let [top_left, top_right, bottom_left] = finders;

    let parallelogram = build_transform(
        &finders,
        dimension,
        corner_reference(dimension),
        top_right.translate(bottom_left.x - top_left.x, bottom_left.y - top_left.y),
    )
    .ok_or(ScanError::InsufficientGeometry)?;

    let transform = refine_with_alignment(
        binary,
        &parallelogram,
        &finders,
        version,
        dimension,
        module_size,
    )
    .unwrap_or(parallelogram);

    read_modules(binary, &transform, dimension, module_size)
}

/// Module-space position of the parallelogram corner
fn corner_reference(dimension: usize) -> Point {
    let far = dimension as f32 - 3.5;
    Point::new(far, far)
}

/// Transform from module coordinates to image coordinates
fn build_transform(
    finders: &[Point; 3],
    dimension: usize,
    fourth_src: Point,
    fourth_dst: Point,
) -> Option<PerspectiveTransform> {
    let far = dimension as f32 - 3.5;
    let src = [
        Point::new(3.5, 3.5),
        Point::new(far, 3.5),
        Point::new(3.5, far),
        fourth_src,
    ];
    let dst = [finders[0], finders[1], finders[2], fourth_dst];
    PerspectiveTransform::from_points(&src, &dst)
}

/// Replace the parallelogram corner by the located bottom-right alignment pattern
fn refine_with_alignment(
    binary: &BitMatrix,
    parallelogram: &PerspectiveTransform,
    finders: &[Point; 3],
    version: u8,
    dimension: usize,
    module_size: f32,
) -> Option<PerspectiveTransform> {
    let &(ax, ay) = alignment_centers(version).iter().max_by_key(|(x, y)| x + y)?;
    let align_src = Point::new(ax as f32 + 0.5, ay as f32 + 0.5);
    let predicted = parallelogram.transform(&align_src)?;

    let [top_left, top_right, bottom_left] = *finders;
    let span = (dimension - 7) as f32;
    let across = top_right.sub(&top_left).scale(1.0 / span);
    let down = bottom_left.sub(&top_left).scale(1.0 / span);

    let found = find_alignment(binary, predicted, across, down, module_size)?;
    trace!(
        "alignment pattern at ({:.1}, {:.1}), predicted ({:.1}, {:.1})",
        found.x, found.y, predicted.x, predicted.y
    );
    build_transform(finders, dimension, align_src, found)
}

fn read_modules(
    binary: &BitMatrix,
    transform: &PerspectiveTransform,
    dimension: usize,
    module_size: f32,
) -> Result<BitMatrix> {
    let (width, height) = (binary.width() as isize, binary.height() as isize);
    let majority = module_size >= MAJORITY_MODULE_PX;
    let mut grid = BitMatrix::new(dimension, dimension);

    for y in 0..dimension {
        for x in 0..dimension {
            let center = transform
                .transform(&Point::new(x as f32 + 0.5, y as f32 + 0.5))
                .ok_or(ScanError::InsufficientGeometry)?;
            let px = center.x.floor() as isize;
            let py = center.y.floor() as isize;
            if px < 0 || py < 0 || px >= width || py >= height {
                return Err(ScanError::InsufficientGeometry);
            }

            let dark = if majority {
                let mut votes = 0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        votes += binary.get_signed(px + dx, py + dy) as usize;
                    }
                }
                votes >= 5
            } else {
                binary.get(px as usize, py as usize)
            };
            grid.set(x, y, dark);
        }
    }
    Ok(grid)
}
