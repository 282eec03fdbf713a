use log::trace;

use crate::decoder::bitstream::BitReader;
use crate::decoder::modes::{Mode, alphanumeric, byte, kanji, numeric};
use crate::decoder::reed_solomon::ReedSolomonDecoder;
use crate::decoder::tables::ec_block_info;
use crate::error::{Result, ScanError};
use crate::models::ECLevel;

/// Split interleaved codewords into blocks, correct each, and join the data parts
pub fn deinterleave_and_correct(
    codewords: &[u8],
    version: u8,
    ec_level: ECLevel,
) -> Result<Vec<u8>> {
    let info = ec_block_info(version, ec_level)
        .ok_or(ScanError::FormatError("no block table for version"))?;
    if codewords.len() < info.total_codewords {
        return Err(ScanError::FormatError("too few codewords"));
    }
    let codewords = &codewords[..info.total_codewords];

    let longest_data = info.data_len(info.num_blocks - 1);
    let mut blocks: Vec<Vec<u8>> = (0..info.num_blocks)
        .map(|_| Vec::with_capacity(longest_data + info.ecc_per_block))
        .collect();

    let mut stream = codewords.iter().copied();
    for i in 0..longest_data {
        for (b, block) in blocks.iter_mut().enumerate() {
            if i < info.data_len(b) {
                block.extend(stream.next());
            }
        }
    }
    for _ in 0..info.ecc_per_block {
        for block in blocks.iter_mut() {
            block.extend(stream.next());
        }
    }

    let rs = ReedSolomonDecoder::new(info.ecc_per_block);
    let mut data = Vec::with_capacity(info.num_data_codewords());
    for (b, block) in blocks.iter_mut().enumerate() {
        rs.decode(block)?;
        data.extend_from_slice(&block[..info.data_len(b)]);
    }
    Ok(data)
}

/// Decode the segment stream of corrected data codewords
///
/// Stops at a terminator or when fewer than four bits remain. ECI
/// designators are skipped, as are FNC1 and structured append headers.
/// A stream that yields no payload bytes is a `FormatError`.
pub fn decode_segments(data: &[u8], version: u8) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(data);
    let mut out = Vec::new();

    while reader.remaining() >= 4 {
        let indicator = reader.read(4).ok_or(ScanError::FormatError("truncated mode"))?;
        let mode =
            Mode::from_bits(indicator).ok_or(ScanError::FormatError("reserved mode indicator"))?;

        match mode {
            Mode::Terminator => break,
            Mode::Eci => {
                let designator = read_eci(&mut reader)?;
                trace!("skipping ECI designator {designator}");
            }
            Mode::Fnc1First => {}
            Mode::Fnc1Second => {
                reader
                    .read(8)
                    .ok_or(ScanError::FormatError("truncated FNC1 application indicator"))?;
            }
            Mode::StructuredAppend => {
                // sequence (4+4 bits) and parity (8 bits)
                reader
                    .read(16)
                    .ok_or(ScanError::FormatError("truncated structured append header"))?;
            }
            Mode::Numeric | Mode::Alphanumeric | Mode::Byte | Mode::Kanji => {
                let count = reader
                    .read(mode.char_count_bits(version))
                    .ok_or(ScanError::FormatError("truncated character count"))?
                    as usize;
                match mode {
                    Mode::Numeric => numeric::decode(&mut reader, count, &mut out)?,
                    Mode::Alphanumeric => alphanumeric::decode(&mut reader, count, &mut out)?,
                    Mode::Byte => byte::decode(&mut reader, count, &mut out)?,
                    _ => kanji::decode(&mut reader, count, &mut out)?,
                }
            }
        }
    }

    if out.is_empty() {
        return Err(ScanError::FormatError("empty payload"));
    }
    Ok(out)
}

/// ECI designator: 1, 2 or 3 bytes selected by the leading bits
fn read_eci(reader: &mut BitReader<'_>) -> Result<u32> {
    let truncated = ScanError::FormatError("truncated ECI designator");
    let first = reader.read(8).ok_or(truncated.clone())?;
    if first & 0x80 == 0 {
        Ok(first)
    } else if first & 0xC0 == 0x80 {
        let rest = reader.read(8).ok_or(truncated)?;
        Ok((first & 0x3F) << 8 | rest)
    } else if first & 0xE0 == 0xC0 {
        let rest = reader.read(16).ok_or(truncated)?;
        Ok((first & 0x1F) << 16 | rest)
    } else {
        Err(ScanError::FormatError("invalid ECI designator"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::bitstream::BitBuffer;
    use crate::decoder::reed_solomon::ReedSolomonEncoder;
    use crate::decoder::tables::EcBlockInfo;

    fn stream(build: impl FnOnce(&mut BitBuffer)) -> Vec<u8> {
        let mut buffer = BitBuffer::new();
        build(&mut buffer);
        buffer.push(0, 4);
        buffer.to_bytes()
    }

    #[test]
    fn test_byte_segment() {
        let data = stream(|b| {
            b.push(Mode::Byte.bits(), 4);
            b.push(3, 8);
            byte::encode(b"a\xFFz", b);
        });
        assert_eq!(decode_segments(&data, 1).unwrap(), b"a\xFFz");
    }

    #[test]
    fn test_mixed_segments_with_eci() {
        let data = stream(|b| {
            b.push(Mode::Eci.bits(), 4);
            b.push(26, 8);
            b.push(Mode::Numeric.bits(), 4);
            b.push(5, 10);
            numeric::encode(b"01234", b);
            b.push(Mode::Alphanumeric.bits(), 4);
            b.push(3, 9);
            alphanumeric::encode(b"AB:", b);
        });
        assert_eq!(decode_segments(&data, 1).unwrap(), b"01234AB:");
    }

    #[test]
    fn test_count_width_depends_on_version() {
        let data = stream(|b| {
            b.push(Mode::Byte.bits(), 4);
            b.push(2, 16);
            byte::encode(b"hi", b);
        });
        assert_eq!(decode_segments(&data, 10).unwrap(), b"hi");
    }

    #[test]
    fn test_two_byte_eci() {
        let data = stream(|b| {
            b.push(Mode::Eci.bits(), 4);
            b.push(0x80 | 0x03, 8);
            b.push(0xE8, 8);
            b.push(Mode::Byte.bits(), 4);
            b.push(1, 8);
            byte::encode(b"x", b);
        });
        assert_eq!(decode_segments(&data, 1).unwrap(), b"x");
    }

    #[test]
    fn test_empty_and_malformed() {
        assert!(matches!(decode_segments(&[0x00, 0x00], 1), Err(ScanError::FormatError(_))));
        // Reserved mode 0110
        assert!(decode_segments(&[0x60, 0x00], 1).is_err());
        // Count promises more bytes than are present
        let data = stream(|b| {
            b.push(Mode::Byte.bits(), 4);
            b.push(9, 8);
            byte::encode(b"ab", b);
        });
        assert!(decode_segments(&data, 1).is_err());
    }

    fn interleave(data: &[u8], info: &EcBlockInfo) -> Vec<u8> {
        let encoder = ReedSolomonEncoder::new(info.ecc_per_block);
        let mut blocks = Vec::new();
        let mut offset = 0;
        for b in 0..info.num_blocks {
            let len = info.data_len(b);
            blocks.push(encoder.encode(&data[offset..offset + len]));
            offset += len;
        }
        let mut out = Vec::new();
        for i in 0..info.data_len(info.num_blocks - 1) {
            for (b, block) in blocks.iter().enumerate() {
                if i < info.data_len(b) {
                    out.push(block[i]);
                }
            }
        }
        for i in 0..info.ecc_per_block {
            for (b, block) in blocks.iter().enumerate() {
                out.push(block[info.data_len(b) + i]);
            }
        }
        out
    }

    #[test]
    fn test_deinterleave_multi_block() {
        // 5-Q: two blocks of 15 and two of 16 data codewords
        let info = ec_block_info(5, ECLevel::Q).unwrap();
        let data: Vec<u8> = (0..info.num_data_codewords() as u8).collect();
        let mut codewords = interleave(&data, &info);
        assert_eq!(codewords.len(), info.total_codewords);

        codewords[0] ^= 0x55;
        codewords[40] ^= 0x0F;
        codewords[133] ^= 0xFF;
        assert_eq!(deinterleave_and_correct(&codewords, 5, ECLevel::Q).unwrap(), data);
    }

    #[test]
    fn test_deinterleave_rejects_short_input() {
        assert!(deinterleave_and_correct(&[0u8; 10], 1, ECLevel::L).is_err());
    }
}
