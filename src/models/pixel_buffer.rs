use std::borrow::Cow;

use crate::error::{Result, ScanError};
use crate::utils::grayscale::{rgb_to_grayscale, rgba_to_grayscale};

/// Immutable 8-bit grayscale image, row-major with no row padding
///
/// The buffer either borrows caller-owned samples or owns samples produced by
/// a colour conversion or the renderer. The length always equals
/// `width * height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer<'a> {
    width: usize,
    height: usize,
    samples: Cow<'a, [u8]>,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap caller-owned grayscale samples
    ///
    /// Fails with [`ScanError::UnsupportedFormat`] when the slice is not exactly
    /// one byte per pixel.
    pub fn new(samples: &'a [u8], width: usize, height: usize) -> Result<Self> {
        check_len(samples.len(), width, height, 1)?;
        Ok(Self {
            width,
            height,
            samples: Cow::Borrowed(samples),
        })
    }

    /// Take ownership of grayscale samples
    pub fn from_vec(samples: Vec<u8>, width: usize, height: usize) -> Result<PixelBuffer<'static>> {
        check_len(samples.len(), width, height, 1)?;
        Ok(PixelBuffer {
            width,
            height,
            samples: Cow::Owned(samples),
        })
    }

    /// Convert packed RGB (3 bytes per pixel) to grayscale
    pub fn from_rgb(rgb: &[u8], width: usize, height: usize) -> Result<PixelBuffer<'static>> {
        check_len(rgb.len(), width, height, 3)?;
        Ok(PixelBuffer {
            width,
            height,
            samples: Cow::Owned(rgb_to_grayscale(rgb, width, height)),
        })
    }

    /// Convert packed RGBA (4 bytes per pixel, alpha ignored) to grayscale
    pub fn from_rgba(rgba: &[u8], width: usize, height: usize) -> Result<PixelBuffer<'static>> {
        check_len(rgba.len(), width, height, 4)?;
        Ok(PixelBuffer {
            width,
            height,
            samples: Cow::Owned(rgba_to_grayscale(rgba, width, height)),
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major samples
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Sample at (x, y); caller guarantees bounds
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.samples[y * self.width + x]
    }

    /// One row of samples
    pub fn row(&self, y: usize) -> &[u8] {
        &self.samples[y * self.width..(y + 1) * self.width]
    }

    /// Detach from any borrowed storage
    pub fn into_owned(self) -> PixelBuffer<'static> {
        PixelBuffer {
            width: self.width,
            height: self.height,
            samples: Cow::Owned(self.samples.into_owned()),
        }
    }
}

fn check_len(len: usize, width: usize, height: usize, bytes_per_pixel: usize) -> Result<()> {
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(bytes_per_pixel));
    if expected == Some(len) {
        Ok(())
    } else {
        Err(ScanError::UnsupportedFormat { width, height, len })
    }
}
