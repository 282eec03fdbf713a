use std::env;
use std::path::Path;

use image::GenericImageView;
use thiserror::Error;

use crate::detector::locate;
use crate::error::ScanError;
use crate::models::{BitMatrix, PixelBuffer, SymbologyType};
use crate::utils::binarization::foreground_ratio;

/// Largest image side kept when loading; larger images are downscaled
pub const ENV_MAX_DIM: &str = "BARCODE_MAX_DIM";

/// Failures of the file helpers
#[derive(Debug, Error)]
pub enum ToolError {
    /// The image could not be read, decoded or written
    #[error(transparent)]
    Image(#[from] image::ImageError),
    /// The pixel data was rejected
    #[error(transparent)]
    Scan(#[from] ScanError),
}

fn max_dim_from_env() -> Option<u32> {
    match env::var(ENV_MAX_DIM) {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load any image the `image` crate reads as 8-bit grayscale
pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<PixelBuffer<'static>, ToolError> {
    let img = image::open(path)?;
    let rgb = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => img
            .resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            .to_rgb8(),
        _ => img.to_rgb8(),
    };
    let (width, height) = rgb.dimensions();
    Ok(PixelBuffer::from_rgb(
        rgb.as_raw(),
        width as usize,
        height as usize,
    )?)
}

/// Write a grayscale buffer as an image; the format follows the extension
pub fn save_grayscale<P: AsRef<Path>>(image: &PixelBuffer<'_>, path: P) -> Result<(), ToolError> {
    let gray = image::GrayImage::from_raw(
        image.width() as u32,
        image.height() as u32,
        image.samples().to_vec(),
    )
    .ok_or(ScanError::UnsupportedFormat {
        width: image.width(),
        height: image.height(),
        len: image.samples().len(),
    })?;
    gray.save(path)?;
    Ok(())
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for a binary matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryStats {
    /// Count of foreground pixels.
    pub black_pixels: usize,
    /// Total pixels in the matrix.
    pub total_pixels: usize,
    /// Ratio of foreground pixels to total pixels.
    pub black_ratio: f32,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &[u8]) -> GrayStats {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in gray {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    let avg = if gray.is_empty() {
        0
    } else {
        (sum / gray.len() as u64) as u8
    };
    GrayStats { min, max, avg }
}

/// Compute foreground pixel stats for a binary matrix.
pub fn binary_stats(binary: &BitMatrix) -> BinaryStats {
    BinaryStats {
        black_pixels: binary.count_set(),
        total_pixels: binary.width() * binary.height(),
        black_ratio: foreground_ratio(binary),
    }
}

/// Number of located (not necessarily decodable) candidates per symbology
pub fn candidate_counts(binary: &BitMatrix) -> Vec<(SymbologyType, usize)> {
    SymbologyType::ALL
        .into_iter()
        .map(|symbology| (symbology, locate(binary, symbology).count()))
        .collect()
}
