//! Utility functions for image processing
//!
//! This module provides helper functions shared by the scanning pipeline:
//! - Grayscale conversion (RGB/RGBA to luminance)
//! - Binarization (adaptive local-mean threshold)
//! - Geometry (perspective transforms, angles)

/// Adaptive binarization
pub mod binarization;
/// Perspective transform and angle helpers
pub mod geometry;
/// RGB/RGBA to grayscale conversion
pub mod grayscale;
