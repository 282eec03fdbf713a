/// Rasterize module patterns into grayscale pixel buffers
use crate::error::Result;
use crate::models::{BitMatrix, PixelBuffer};

/// Sample value of a dark module
pub const DARK: u8 = 0;
/// Sample value of a light module and of the quiet zone
pub const LIGHT: u8 = 255;

/// Draw Code 128 widths as bars `height` pixels tall
///
/// `quiet` is the light margin on each side, in modules.
pub fn render_linear(
    widths: &[u8],
    module_px: usize,
    height: usize,
    quiet: usize,
) -> Result<PixelBuffer<'static>> {
    let modules: usize = widths.iter().map(|&w| w as usize).sum::<usize>() + 2 * quiet;
    let width = modules * module_px;

    let mut row = vec![LIGHT; width];
    let mut x = quiet * module_px;
    for (i, &w) in widths.iter().enumerate() {
        let len = w as usize * module_px;
        if i % 2 == 0 {
            row[x..x + len].fill(DARK);
        }
        x += len;
    }

    let samples = row.repeat(height);
    PixelBuffer::from_vec(samples, width, height)
}

/// Draw a module grid with `quiet` light modules on every side
pub fn render_matrix(grid: &BitMatrix, module_px: usize, quiet: usize) -> Result<PixelBuffer<'static>> {
    let width = (grid.width() + 2 * quiet) * module_px;
    let height = (grid.height() + 2 * quiet) * module_px;
    let mut samples = vec![LIGHT; width * height];

    for y in 0..height {
        let my = (y / module_px).wrapping_sub(quiet);
        for x in 0..width {
            let mx = (x / module_px).wrapping_sub(quiet);
            if grid.get(mx, my) {
                samples[y * width + x] = DARK;
            }
        }
    }
    PixelBuffer::from_vec(samples, width, height)
}

/// The image turned upside down
pub fn rotate_180(image: &PixelBuffer<'_>) -> Result<PixelBuffer<'static>> {
    let mut samples = image.samples().to_vec();
    samples.reverse();
    PixelBuffer::from_vec(samples, image.width(), image.height())
}
