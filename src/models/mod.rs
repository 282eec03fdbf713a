/// Packed bit matrix
pub mod matrix;
/// Grayscale input buffer
pub mod pixel_buffer;
/// 2D points and vector helpers
pub mod point;
/// QR error correction levels, masks and versions
pub mod qr_code;
/// Symbologies and decoded symbols
pub mod symbol;

pub use matrix::BitMatrix;
pub use pixel_buffer::PixelBuffer;
pub use point::Point;
pub use qr_code::{ECLevel, MaskPattern};
pub use symbol::{BoundingBox, DecodedSymbol, SymbologySet, SymbologyType};
