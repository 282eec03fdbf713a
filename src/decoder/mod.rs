//! Symbol decoding
//!
//! This module turns sampled modules into data:
//! - Code 128 width tables, code sets and checksum
//! - QR error correction (Reed-Solomon, BCH)
//! - QR format and version information extraction
//! - QR data modes (numeric, alphanumeric, byte, kanji)
//! - QR bitstream extraction and unmasking

/// BCH codes for format and version info
pub mod bch;
/// Bitstream extraction from QR matrix
pub mod bitstream;
/// Code 128 decoding
pub mod code128;
/// Format information extraction (mask pattern, EC level)
pub mod format;
/// Function module mask builder (finder/timing/format/alignment/version)
pub mod function_mask;
/// Data mode decoders (numeric, alphanumeric, byte, kanji)
pub mod modes;
/// QR decoder that orchestrates the decoding pipeline
pub mod qr_decoder;
/// Reed-Solomon error correction
pub mod reed_solomon;
/// QR error correction block tables
pub mod tables;
/// QR mask application
pub mod unmask;
/// Version information extraction (versions 7-40)
pub mod version;

use crate::error::Result;
use crate::models::{BitMatrix, DecodedSymbol, SymbologyType};

use code128::Code128Decoder;
use qr_decoder::QrDecoder;

/// Module data read from the image for one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawModules {
    /// Quantized element widths in modules, start character through stop
    Linear {
        /// Bar/space widths in reading order
        widths: Vec<u8>,
    },
    /// One bit per module, `true` = dark
    Matrix {
        /// Square module grid
        grid: BitMatrix,
    },
}

/// Turns raw modules of one symbology into a decoded symbol
pub trait SymbolDecoder: Send + Sync {
    /// Symbology handled by this decoder
    fn symbology(&self) -> SymbologyType;

    /// Decode `raw`; the wrong variant is a `FormatError`
    fn decode(&self, raw: &RawModules) -> Result<DecodedSymbol>;
}

/// Decoder for `symbology`
pub fn decoder_for(symbology: SymbologyType) -> &'static dyn SymbolDecoder {
    match symbology {
        SymbologyType::Code128 => &Code128Decoder,
        SymbologyType::QrCode => &QrDecoder,
    }
}
