/// Alphanumeric mode (0010)
/// Character set: 0-9, A-Z, space, $%*+-./:
use crate::decoder::bitstream::{BitBuffer, BitReader};
use crate::error::{Result, ScanError};

const ALPHANUMERIC_TABLE: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Decode `count` characters: pairs in 11 bits, a trailing single in 6
pub fn decode(reader: &mut BitReader<'_>, count: usize, out: &mut Vec<u8>) -> Result<()> {
    let truncated = ScanError::FormatError("alphanumeric segment truncated");
    let mut remaining = count;
    while remaining >= 2 {
        let value = reader.read(11).ok_or(truncated.clone())? as usize;
        if value >= 45 * 45 {
            return Err(ScanError::FormatError("alphanumeric pair out of range"));
        }
        out.push(ALPHANUMERIC_TABLE[value / 45]);
        out.push(ALPHANUMERIC_TABLE[value % 45]);
        remaining -= 2;
    }
    if remaining == 1 {
        let value = reader.read(6).ok_or(truncated)? as usize;
        let &ch = ALPHANUMERIC_TABLE
            .get(value)
            .ok_or(ScanError::FormatError("alphanumeric character out of range"))?;
        out.push(ch);
    }
    Ok(())
}

fn index_of(ch: u8) -> Option<u32> {
    ALPHANUMERIC_TABLE
        .iter()
        .position(|&c| c == ch)
        .map(|i| i as u32)
}

/// Whether every byte is in the 45-character set
pub fn is_alphanumeric(data: &[u8]) -> bool {
    data.iter().all(|&ch| index_of(ch).is_some())
}

/// Append packed characters; bytes outside the set encode as space
pub fn encode(data: &[u8], buffer: &mut BitBuffer) {
    for pair in data.chunks(2) {
        let first = index_of(pair[0]).unwrap_or(36);
        match pair.get(1) {
            Some(&second) => buffer.push(first * 45 + index_of(second).unwrap_or(36), 11),
            None => buffer.push(first, 6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphanumeric_decode() {
        // "A1" = (10 * 45 + 1) = 451 = 0b00111000011 (11 bits)
        let data = [0b0011_1000, 0b0110_0000];
        let mut out = Vec::new();
        decode(&mut BitReader::new(&data), 2, &mut out).unwrap();
        assert_eq!(out, b"A1");
    }

    #[test]
    fn test_alphanumeric_round_trip() {
        let text = b"HELLO WORLD $%*+-./:";
        assert!(is_alphanumeric(text));
        assert!(!is_alphanumeric(b"hello"));

        let mut buffer = BitBuffer::new();
        encode(text, &mut buffer);
        assert_eq!(buffer.len(), 10 * 11);
        let bytes = buffer.to_bytes();
        let mut out = Vec::new();
        decode(&mut BitReader::new(&bytes), text.len(), &mut out).unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn test_out_of_range_pair() {
        // 2047 > 2024
        let data = [0xFF, 0xE0];
        assert!(decode(&mut BitReader::new(&data), 2, &mut Vec::new()).is_err());
    }
}
