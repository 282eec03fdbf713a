//! Symbol rendering
//!
//! Encoders that produce module patterns, and a rasterizer that turns them
//! into grayscale images. Used to generate test images and by the CLI.

/// Code 128 encoder
pub mod code128;
/// QR Model 2 encoder
pub mod qr;
/// Module pattern rasterization
pub mod raster;

pub use qr::QrEncoder;
pub use raster::{render_linear, render_matrix, rotate_180};
