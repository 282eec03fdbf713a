/// Kanji mode (1000): Shift-JIS double-byte characters packed into 13 bits
use crate::decoder::bitstream::BitReader;
use crate::error::{Result, ScanError};

/// Decode `count` characters, appending two Shift-JIS bytes for each
pub fn decode(reader: &mut BitReader<'_>, count: usize, out: &mut Vec<u8>) -> Result<()> {
    for _ in 0..count {
        let value = reader
            .read(13)
            .ok_or(ScanError::FormatError("kanji segment truncated"))?;
        let mut code = ((value / 0xC0) << 8) | (value % 0xC0);
        if code < 0x1F00 {
            code += 0x8140;
        } else {
            code += 0xC140;
        }
        out.push((code >> 8) as u8);
        out.push(code as u8);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kanji_decode() {
        // ISO/IEC 18004 example: 0x935F -> 0x0D9F, 0xE4AA -> 0x1AAA
        let data = [0b0110_1100, 0b1111_1110, 0b1010_1010, 0b1000_0000];
        let mut out = Vec::new();
        decode(&mut BitReader::new(&data), 2, &mut out).unwrap();
        assert_eq!(out, vec![0x93, 0x5F, 0xE4, 0xAA]);
    }
}
