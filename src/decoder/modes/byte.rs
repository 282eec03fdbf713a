/// Byte mode (0100): 8 bits per character, passed through untouched
use crate::decoder::bitstream::{BitBuffer, BitReader};
use crate::error::{Result, ScanError};

/// Decode `count` raw bytes into `out`
pub fn decode(reader: &mut BitReader<'_>, count: usize, out: &mut Vec<u8>) -> Result<()> {
    if reader.remaining() < count * 8 {
        return Err(ScanError::FormatError("byte segment truncated"));
    }
    for _ in 0..count {
        let byte = reader
            .read(8)
            .ok_or(ScanError::FormatError("byte segment truncated"))?;
        out.push(byte as u8);
    }
    Ok(())
}

/// Append `data` verbatim
pub fn encode(data: &[u8], buffer: &mut BitBuffer) {
    for &byte in data {
        buffer.push(byte as u32, 8);
    }
}
