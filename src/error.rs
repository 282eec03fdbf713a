//! Error taxonomy for the scanning pipeline
//!
//! Only [`ScanError::UnsupportedFormat`] and [`ScanError::InvalidConfig`] ever
//! reach a caller. Every other variant is local to a single finder candidate:
//! the engine logs it and moves on to the next candidate.

use thiserror::Error;

/// Errors produced while validating input or decoding a candidate symbol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The pixel buffer is not 8-bit grayscale of the declared size
    #[error("unsupported image format: {len} bytes for a {width}x{height} 8-bit grayscale image")]
    UnsupportedFormat {
        /// Declared width in pixels
        width: usize,
        /// Declared height in pixels
        height: usize,
        /// Actual number of bytes supplied
        len: usize,
    },
    /// Module size rounds to zero or the sampling grid leaves the bitmap
    #[error("insufficient geometry for module sampling")]
    InsufficientGeometry,
    /// A symbol's check character disagrees with the computed checksum
    #[error("checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch {
        /// Checksum computed from the data characters
        expected: u16,
        /// Check character read from the symbol
        found: u16,
    },
    /// A module group matches no entry of the symbology's table
    #[error("no symbol table entry matches the sampled pattern")]
    UnknownPattern,
    /// Structural or error-correction failure
    #[error("malformed symbol: {0}")]
    FormatError(&'static str),
    /// A configuration setting could not be parsed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Crate-wide result alias
pub type Result<T, E = ScanError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ScanError::UnsupportedFormat {
            width: 2,
            height: 2,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "unsupported image format: 3 bytes for a 2x2 8-bit grayscale image"
        );
        let err = ScanError::ChecksumMismatch {
            expected: 12,
            found: 40,
        };
        assert_eq!(err.to_string(), "checksum mismatch: expected 12, found 40");
    }
}
