use crate::models::{BitMatrix, PixelBuffer};

/// Tuning for the adaptive local-mean threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinarizerConfig {
    /// Side of the square averaging window in pixels (forced odd, at least 3)
    pub window: usize,
    /// How far below the local mean a sample must be to count as foreground
    pub margin: u8,
}

impl Default for BinarizerConfig {
    fn default() -> Self {
        Self {
            window: 31,
            margin: 10,
        }
    }
}

/// Each retry widens the window by this factor
pub const WINDOW_GROWTH: usize = 3;
/// Binarization passes per scan, counting the configured window
pub const MAX_PASSES: usize = 3;

impl BinarizerConfig {
    /// The configured window followed by wider retries for large modules
    ///
    /// Windows grow by [`WINDOW_GROWTH`] until one spans the longer image side,
    /// at most [`MAX_PASSES`] in total. The margin is kept.
    pub fn window_ladder(&self, width: usize, height: usize) -> Vec<BinarizerConfig> {
        let side = width.max(height);
        let mut ladder = vec![*self];
        let mut window = self.window.max(3);
        while ladder.len() < MAX_PASSES && window < side {
            window *= WINDOW_GROWTH;
            ladder.push(BinarizerConfig { window, ..*self });
        }
        ladder
    }
}

/// Convert grayscale image to binary using a local-mean adaptive threshold
/// Returns a BitMatrix where true = black, false = white
///
/// A pixel is foreground when `sample + margin < mean` over the window centred
/// on it (clipped at the image border). Uniform images produce an
/// all-background bitmap.
pub fn adaptive_binarize(image: &PixelBuffer<'_>, config: &BinarizerConfig) -> BitMatrix {
    let width = image.width();
    let height = image.height();
    let mut binary = BitMatrix::new(width, height);
    if width == 0 || height == 0 {
        return binary;
    }

    let integral = integral_image(image.samples(), width, height);
    let stride = width + 1;
    let radius = config.window.max(3) / 2;
    let margin = config.margin as u64;

    for y in 0..height {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius + 1).min(height);
        let row = image.row(y);
        for (x, &sample) in row.iter().enumerate() {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius + 1).min(width);
            let area = ((x1 - x0) * (y1 - y0)) as u64;
            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            // sample + margin < sum / area, kept in integers
            if (sample as u64 + margin) * area < sum {
                binary.set(x, y, true);
            }
        }
    }

    binary
}

/// Summed-area table with a zero first row and column
fn integral_image(gray: &[u8], width: usize, height: usize) -> Vec<u64> {
    let stride = width + 1;
    let mut integral = vec![0u64; stride * (height + 1)];
    for y in 0..height {
        let mut row_sum = 0u64;
        for x in 0..width {
            row_sum += gray[y * width + x] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }
    integral
}

/// Fraction of foreground pixels, for diagnostics
pub fn foreground_ratio(binary: &BitMatrix) -> f32 {
    let total = binary.width() * binary.height();
    if total == 0 {
        return 0.0;
    }
    binary.count_set() as f32 / total as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(samples: &[u8], width: usize, height: usize) -> PixelBuffer<'_> {
        PixelBuffer::new(samples, width, height).unwrap()
    }

    #[test]
    fn test_uniform_image_is_background() {
        for value in [0u8, 128, 255] {
            let samples = vec![value; 40 * 30];
            let binary = adaptive_binarize(&buffer(&samples, 40, 30), &BinarizerConfig::default());
            assert_eq!(binary.count_set(), 0);
        }
    }

    #[test]
    fn test_single_pixel() {
        let binary = adaptive_binarize(&buffer(&[255], 1, 1), &BinarizerConfig::default());
        assert!(!binary.get(0, 0));
        let binary = adaptive_binarize(&buffer(&[0], 1, 1), &BinarizerConfig::default());
        assert!(!binary.get(0, 0));
    }

    #[test]
    fn test_dark_bar_on_light_background() {
        // 4px dark bar in the middle of a 40px light row
        let width = 40;
        let height = 5;
        let mut samples = vec![220u8; width * height];
        for y in 0..height {
            for x in 18..22 {
                samples[y * width + x] = 20;
            }
        }
        let binary = adaptive_binarize(&buffer(&samples, width, height), &BinarizerConfig::default());
        for x in 0..width {
            assert_eq!(binary.get(x, 2), (18..22).contains(&x), "x={x}");
        }
    }

    #[test]
    fn test_uneven_illumination() {
        // Left-to-right brightness ramp with dark 2px bars every 8px
        let width = 160;
        let height = 4;
        let mut samples = vec![0u8; width * height];
        for y in 0..height {
            for x in 0..width {
                let base = 90 + (x as u32 * 160 / width as u32) as u8;
                let dark = x % 8 < 2;
                samples[y * width + x] = if dark { base / 3 } else { base };
            }
        }
        let binary = adaptive_binarize(&buffer(&samples, width, height), &BinarizerConfig::default());
        for x in 16..width - 16 {
            assert_eq!(binary.get(x, 1), x % 8 < 2, "x={x}");
        }
    }

    #[test]
    fn test_window_ladder() {
        let config = BinarizerConfig::default();
        let windows: Vec<usize> = config.window_ladder(600, 400).iter().map(|c| c.window).collect();
        assert_eq!(windows, vec![31, 93, 279]);
        let windows: Vec<usize> = config.window_ladder(64, 48).iter().map(|c| c.window).collect();
        assert_eq!(windows, vec![31, 93]);
        assert_eq!(config.window_ladder(20, 1), vec![config]);
        assert!(config.window_ladder(600, 400).iter().all(|c| c.margin == 10));
    }

    #[test]
    fn test_wide_window_keeps_thick_bars() {
        // 80px dark bar flanked by light: hollow at 31, solid at 93
        let width = 240;
        let height = 3;
        let mut samples = vec![255u8; width * height];
        for y in 0..height {
            samples[y * width + 80..y * width + 160].fill(0);
        }
        let image = buffer(&samples, width, height);
        let narrow = adaptive_binarize(&image, &BinarizerConfig::default());
        assert!(!narrow.get(120, 1));

        let wide = adaptive_binarize(&image, &BinarizerConfig { window: 93, margin: 10 });
        for x in 0..width {
            assert_eq!(wide.get(x, 1), (80..160).contains(&x), "x={x}");
        }
    }

    #[test]
    fn test_empty_image() {
        let binary = adaptive_binarize(&buffer(&[], 0, 0), &BinarizerConfig::default());
        assert_eq!(foreground_ratio(&binary), 0.0);
    }
}
