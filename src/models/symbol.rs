use std::fmt;
use std::str::FromStr;

use super::Point;
use crate::error::ScanError;

/// Supported barcode standards
///
/// The derived ordering is the output order of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbologyType {
    /// Code 128 linear barcode (`LINEAR_128`)
    Code128,
    /// QR Code Model 2 matrix symbol (`MATRIX_QR`)
    QrCode,
}

impl SymbologyType {
    /// Every symbology the engine can decode
    pub const ALL: [SymbologyType; 2] = [SymbologyType::Code128, SymbologyType::QrCode];

    /// Canonical upper-case name, matching zbar's symbol names
    pub fn name(&self) -> &'static str {
        match self {
            SymbologyType::Code128 => "CODE128",
            SymbologyType::QrCode => "QRCODE",
        }
    }

    fn bit(&self) -> u8 {
        match self {
            SymbologyType::Code128 => 1 << 0,
            SymbologyType::QrCode => 1 << 1,
        }
    }
}

impl fmt::Display for SymbologyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SymbologyType {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "code128" | "code-128" | "linear_128" => Ok(SymbologyType::Code128),
            "qrcode" | "qr" | "matrix_qr" => Ok(SymbologyType::QrCode),
            other => Err(ScanError::InvalidConfig(format!("unknown symbology '{other}'"))),
        }
    }
}

/// Set of enabled symbologies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SymbologySet(u8);

impl SymbologySet {
    /// No symbology enabled
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every supported symbology
    pub fn all() -> Self {
        SymbologyType::ALL.into_iter().collect()
    }

    /// Enable a symbology
    pub fn insert(&mut self, symbology: SymbologyType) {
        self.0 |= symbology.bit();
    }

    /// Disable a symbology
    pub fn remove(&mut self, symbology: SymbologyType) {
        self.0 &= !symbology.bit();
    }

    /// Whether `symbology` is enabled
    pub fn contains(&self, symbology: SymbologyType) -> bool {
        self.0 & symbology.bit() != 0
    }

    /// True when nothing is enabled
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Enabled symbologies in output order
    pub fn iter(&self) -> impl Iterator<Item = SymbologyType> + '_ {
        SymbologyType::ALL
            .into_iter()
            .filter(move |s| self.contains(*s))
    }
}

impl FromIterator<SymbologyType> for SymbologySet {
    fn from_iter<I: IntoIterator<Item = SymbologyType>>(iter: I) -> Self {
        let mut set = Self::empty();
        for symbology in iter {
            set.insert(symbology);
        }
        set
    }
}

/// Corner points of a located symbol in image coordinates
///
/// Corners run clockwise from the symbol's own top-left. Linear symbols
/// found on a single row have a zero-height box along that row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Top-left, top-right, bottom-right, bottom-left
    pub corners: [Point; 4],
}

impl BoundingBox {
    /// Box from its four corners
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    /// Smallest y of any corner
    pub fn top(&self) -> f32 {
        self.corners.iter().map(|p| p.y).fold(f32::INFINITY, f32::min)
    }

    /// Smallest x of any corner
    pub fn left(&self) -> f32 {
        self.corners.iter().map(|p| p.x).fold(f32::INFINITY, f32::min)
    }
}

/// A successfully decoded symbol
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSymbol {
    /// Raw decoded bytes; text encoding is left to the caller
    pub data: Vec<u8>,
    /// Symbology the data was decoded from
    pub symbology: SymbologyType,
    /// Where the symbol was found, when known
    pub bounding_box: Option<BoundingBox>,
}

impl DecodedSymbol {
    /// Symbol without location information
    pub fn new(data: Vec<u8>, symbology: SymbologyType) -> Self {
        Self {
            data,
            symbology,
            bounding_box: None,
        }
    }

    /// Attach a bounding box
    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    /// Lossy UTF-8 view of the data
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbology_parse() {
        assert_eq!("CODE128".parse::<SymbologyType>(), Ok(SymbologyType::Code128));
        assert_eq!("linear_128".parse::<SymbologyType>(), Ok(SymbologyType::Code128));
        assert_eq!(" QrCode ".parse::<SymbologyType>(), Ok(SymbologyType::QrCode));
        assert!("ean13".parse::<SymbologyType>().is_err());
        assert_eq!(SymbologyType::QrCode.to_string(), "QRCODE");
    }

    #[test]
    fn test_symbology_set() {
        let mut set = SymbologySet::empty();
        assert!(set.is_empty());
        set.insert(SymbologyType::QrCode);
        assert!(set.contains(SymbologyType::QrCode));
        assert!(!set.contains(SymbologyType::Code128));
        assert_eq!(SymbologySet::all().iter().count(), 2);
        set.remove(SymbologyType::QrCode);
        assert!(set.is_empty());
    }

    #[test]
    fn test_bounding_box_extent() {
        let bbox = BoundingBox::new([
            Point::new(10.0, 5.0),
            Point::new(30.0, 4.0),
            Point::new(30.0, 20.0),
            Point::new(9.0, 20.0),
        ]);
        assert_eq!(bbox.top(), 4.0);
        assert_eq!(bbox.left(), 9.0);
    }
}
