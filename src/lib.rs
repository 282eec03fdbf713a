//! rust_barcode - Code 128 and QR code scanning on grayscale pixel buffers
//!
//! A pure Rust decoding engine: no external decoder library, just a
//! binarizer, per-symbology locators, a module sampler and the decoders.
//!
//! ```
//! let samples = vec![255u8; 64 * 64];
//! let symbols = rust_barcode::scan(&samples, 64, 64).unwrap();
//! assert!(symbols.is_empty());
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Scanner configuration (enabled symbologies, binarizer, parallelism)
pub mod config;
/// Symbol decoding (Code 128 tables, QR error correction, data modes)
pub mod decoder;
/// Symbol location (Code 128 start/stop scanning, QR finder patterns)
pub mod detector;
/// Scan orchestration
pub mod engine;
/// Error taxonomy
pub mod error;
/// Core data structures (PixelBuffer, BitMatrix, DecodedSymbol, etc.)
pub mod models;
/// Encoders and rasterizer for generating symbols
pub mod render;
/// Candidate to module sampling
pub mod sampler;
/// Image file helpers shared by the CLI and benches
pub mod tools;
/// Utility functions (grayscale, binarization, geometry)
pub mod utils;

pub use config::ScanConfig;
pub use engine::ScanEngine;
pub use error::{Result, ScanError};
pub use models::{
    BitMatrix, BoundingBox, DecodedSymbol, ECLevel, MaskPattern, PixelBuffer, Point, SymbologySet,
    SymbologyType,
};
pub use utils::binarization::BinarizerConfig;

/// Scan a grayscale buffer with the default configuration
///
/// # Arguments
/// * `samples` - Grayscale bytes (1 byte per pixel, row-major)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Every decoded symbol, or `UnsupportedFormat` when `samples` is not
/// exactly `width * height` bytes.
pub fn scan(samples: &[u8], width: usize, height: usize) -> Result<Vec<DecodedSymbol>> {
    let image = PixelBuffer::new(samples, width, height)?;
    Ok(ScanEngine::default().scan(&image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_rejects_bad_length() {
        assert_eq!(
            scan(&[0u8; 10], 4, 4),
            Err(ScanError::UnsupportedFormat {
                width: 4,
                height: 4,
                len: 10
            })
        );
    }

    #[test]
    fn test_scan_tiny_images() {
        assert_eq!(scan(&[0], 1, 1), Ok(vec![]));
        assert_eq!(scan(&[], 0, 7), Ok(vec![]));
    }
}
