/// BCH codes protecting QR format and version information
pub struct BchDecoder;

/// Format info generator: x^10 + x^8 + x^5 + x^4 + x^2 + x + 1
const FORMAT_GENERATOR: u32 = 0x537;
/// Format info XOR mask
const FORMAT_MASK: u16 = 0x5412;
/// Version info generator: x^12 + x^11 + x^10 + x^9 + x^8 + x^5 + x^2 + 1
const VERSION_GENERATOR: u32 = 0x1F25;
/// Both codes correct up to three bit errors
const MAX_DISTANCE: u32 = 3;

impl BchDecoder {
    /// 15-bit masked format codeword for 5 data bits (`ec << 3 | mask`)
    pub fn encode_format(data: u8) -> u16 {
        let data = (data & 0x1F) as u32;
        let mut rem = data;
        for _ in 0..10 {
            rem = (rem << 1) ^ ((rem >> 9) * FORMAT_GENERATOR);
        }
        (((data << 10) | rem) as u16) ^ FORMAT_MASK
    }

    /// 18-bit version codeword for versions 7..=40
    pub fn encode_version(version: u8) -> u32 {
        let data = version as u32;
        let mut rem = data;
        for _ in 0..12 {
            rem = (rem << 1) ^ ((rem >> 11) * VERSION_GENERATOR);
        }
        (data << 12) | rem
    }

    /// Decode format info to `(ec_bits, mask_bits)`
    ///
    /// Picks the nearest of the 32 valid codewords across every copy read;
    /// more than three differing bits is a failure.
    pub fn decode_format(copies: &[u16]) -> Option<(u8, u8)> {
        let (data, distance) = (0u8..32)
            .map(|data| {
                let codeword = Self::encode_format(data);
                (data, Self::nearest(copies.iter().map(|&read| (codeword ^ read) as u32)))
            })
            .min_by_key(|&(_, distance)| distance)?;
        (distance <= MAX_DISTANCE).then_some(((data >> 3) & 0x03, data & 0x07))
    }

    /// Decode version info, nearest of the 34 valid codewords
    pub fn decode_version(copies: &[u32]) -> Option<u8> {
        let (version, distance) = (7u8..=40)
            .map(|version| {
                let codeword = Self::encode_version(version);
                (version, Self::nearest(copies.iter().map(|&read| codeword ^ read)))
            })
            .min_by_key(|&(_, distance)| distance)?;
        (distance <= MAX_DISTANCE).then_some(version)
    }

    /// Smallest Hamming weight among the differences
    fn nearest(differences: impl Iterator<Item = u32>) -> u32 {
        differences.map(u32::count_ones).min().unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_known_codewords() {
        // EC level M (00), mask 0
        assert_eq!(BchDecoder::encode_format(0b00_000), 0x5412);
        // EC level L (01), mask 4
        assert_eq!(BchDecoder::encode_format(0b01_100), 0x662F);
        // EC level H (10), mask 5
        assert_eq!(BchDecoder::encode_format(0b10_101), 0x0255);
    }

    #[test]
    fn test_version_known_codewords() {
        assert_eq!(BchDecoder::encode_version(7), 0x07C94);
        assert_eq!(BchDecoder::encode_version(40), 0x28C69);
    }

    #[test]
    fn test_format_decode_with_errors() {
        let codeword = BchDecoder::encode_format(0b11_011);
        assert_eq!(BchDecoder::decode_format(&[codeword]), Some((0b11, 0b011)));
        let damaged = codeword ^ 0b100_0000_0010_0001;
        assert_eq!(BchDecoder::decode_format(&[damaged]), Some((0b11, 0b011)));
        // One copy beyond repair, the other intact, in either order
        let wrecked = codeword ^ 0b000_0010_0101_1011;
        assert_eq!(BchDecoder::decode_format(&[wrecked, codeword]), Some((0b11, 0b011)));
        assert_eq!(BchDecoder::decode_format(&[codeword, wrecked]), Some((0b11, 0b011)));
    }

    #[test]
    fn test_inverted_copy_is_another_codeword() {
        // The all-ones word is a codeword, so inverting a read yields a valid one
        let codeword = BchDecoder::encode_format(0b11_011);
        let inverted = !codeword & 0x7FFF;
        assert!((0u8..32).any(|data| BchDecoder::encode_format(data) == inverted));
        assert_eq!(BchDecoder::decode_format(&[inverted]), Some((0b00, 0b100)));
    }

    #[test]
    fn test_version_decode_with_errors() {
        let codeword = BchDecoder::encode_version(21);
        assert_eq!(BchDecoder::decode_version(&[codeword ^ 0b101_0000_0000_0001]), Some(21));
        assert_eq!(BchDecoder::decode_version(&[0]), None);
    }
}
