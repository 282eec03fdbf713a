/// Convert packed colour images to grayscale
/// Y = 0.299*R + 0.587*G + 0.114*B
/// Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
///
/// Images with at least `PARALLEL_MIN_PIXELS` pixels are converted row-parallel
/// with rayon.
use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

const PARALLEL_MIN_PIXELS: usize = 512 * 512;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8;
    lum.min(255) as u8
}

/// Convert RGB image to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(rgb, width, height, 3)
}

/// Convert RGBA image to grayscale (ignores alpha channel)
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(rgba, width, height, 4)
}

fn convert(input: &[u8], width: usize, height: usize, channels: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];
    if pixel_count == 0 {
        return gray;
    }

    let convert_row = |(y, row): (usize, &mut [u8])| {
        let row_start = y * width * channels;
        for (x, out) in row.iter_mut().enumerate() {
            let idx = row_start + x * channels;
            *out = luma(input[idx], input[idx + 1], input[idx + 2]);
        }
    };

    if pixel_count >= PARALLEL_MIN_PIXELS {
        gray.par_chunks_mut(width).enumerate().for_each(convert_row);
    } else {
        gray.chunks_mut(width).enumerate().for_each(convert_row);
    }

    gray
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_grayscale() {
        // Pure white
        let gray = rgb_to_grayscale(&[255, 255, 255], 1, 1);
        assert!(gray[0] >= 254);

        // Pure black
        let gray = rgb_to_grayscale(&[0, 0, 0], 1, 1);
        assert_eq!(gray[0], 0);

        // Pure red
        let gray = rgb_to_grayscale(&[255, 0, 0], 1, 1);
        assert!(gray[0] > 0 && gray[0] < 255);

        // Pure green
        let gray = rgb_to_grayscale(&[0, 255, 0], 1, 1);
        assert!(gray[0] > 100);

        // 2x2 image
        let img = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let gray = rgb_to_grayscale(&img, 2, 2);
        assert_eq!(gray.len(), 4);
    }

    #[test]
    fn test_rgba_to_grayscale() {
        let gray = rgba_to_grayscale(&[255, 128, 64, 0], 1, 1);
        assert_eq!(gray, rgb_to_grayscale(&[255, 128, 64], 1, 1));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let width = 600;
        let height = 500;
        let rgb: Vec<u8> = (0..width * height * 3).map(|i| (i * 7 % 251) as u8).collect();
        let gray = rgb_to_grayscale(&rgb, width, height);
        let idx = 123 * width + 77;
        let p = idx * 3;
        assert_eq!(gray[idx], luma(rgb[p], rgb[p + 1], rgb[p + 2]));
    }
}
