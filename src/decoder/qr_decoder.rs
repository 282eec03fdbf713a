use log::trace;

use super::bitstream::{bits_to_codewords, extract_bits};
use super::format::FormatInfo;
use super::function_mask::FunctionMask;
use super::unmask::apply_mask;
use super::version::VersionInfo;
use super::{RawModules, SymbolDecoder};
/// QR decoder - wires format, unmasking, error correction and segments together
use crate::error::{Result, ScanError};
use crate::models::{BitMatrix, DecodedSymbol, SymbologyType};

mod payload;

pub use payload::{decode_segments, deinterleave_and_correct};

/// Decoder for sampled QR Model 2 grids
#[derive(Debug, Clone, Copy, Default)]
pub struct QrDecoder;

impl SymbolDecoder for QrDecoder {
    fn symbology(&self) -> SymbologyType {
        SymbologyType::QrCode
    }

    fn decode(&self, raw: &RawModules) -> Result<DecodedSymbol> {
        let RawModules::Matrix { grid } = raw else {
            return Err(ScanError::FormatError("QR needs a module grid"));
        };

        match Self::decode_grid(grid) {
            Ok(data) => Ok(DecodedSymbol::new(data, SymbologyType::QrCode)),
            Err(first) => {
                // A mirrored symbol samples as the transpose of the real grid
                trace!("qr grid failed ({first}), trying mirrored grid");
                Self::decode_grid(&grid.transpose())
                    .map(|data| DecodedSymbol::new(data, SymbologyType::QrCode))
                    .map_err(|_| first)
            }
        }
    }
}

impl QrDecoder {
    /// Decode an upright module grid to its payload bytes
    pub fn decode_grid(grid: &BitMatrix) -> Result<Vec<u8>> {
        if grid.width() != grid.height() {
            return Err(ScanError::FormatError("QR grid is not square"));
        }
        let version = VersionInfo::extract(grid)?;
        let format = FormatInfo::extract(grid)?;

        let func = FunctionMask::new(version);
        let mut unmasked = grid.clone();
        apply_mask(&mut unmasked, format.mask_pattern, &func);

        let codewords = bits_to_codewords(&extract_bits(&unmasked, &func));
        let data = deinterleave_and_correct(&codewords, version, format.ec_level)?;
        let payload = decode_segments(&data, version)?;

        trace!(
            "qr v{version} {:?} mask {}: {} data codewords, {} payload bytes",
            format.ec_level,
            format.mask_pattern.bits(),
            data.len(),
            payload.len()
        );
        Ok(payload)
    }
}
