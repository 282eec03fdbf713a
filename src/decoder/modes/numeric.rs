/// Numeric mode (0001): groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
use crate::decoder::bitstream::{BitBuffer, BitReader};
use crate::error::{Result, ScanError};

/// Decode `count` digits, appending their ASCII bytes to `out`
pub fn decode(reader: &mut BitReader<'_>, count: usize, out: &mut Vec<u8>) -> Result<()> {
    let mut remaining = count;
    while remaining > 0 {
        let group = remaining.min(3);
        let (bits, limit) = match group {
            3 => (10, 1000),
            2 => (7, 100),
            _ => (4, 10),
        };
        let value = reader
            .read(bits)
            .ok_or(ScanError::FormatError("numeric segment truncated"))?;
        if value >= limit {
            return Err(ScanError::FormatError("numeric group out of range"));
        }

        let mut digits = [0u8; 3];
        let mut v = value;
        for slot in digits[..group].iter_mut().rev() {
            *slot = b'0' + (v % 10) as u8;
            v /= 10;
        }
        out.extend_from_slice(&digits[..group]);
        remaining -= group;
    }
    Ok(())
}

/// Append the packed groups for ASCII `digits`
pub fn encode(digits: &[u8], buffer: &mut BitBuffer) {
    for chunk in digits.chunks(3) {
        let value = chunk
            .iter()
            .fold(0u32, |acc, &d| acc * 10 + (d - b'0') as u32);
        buffer.push(value, chunk.len() * 3 + 1);
    }
}

/// Whether every byte is an ASCII digit
pub fn is_numeric(data: &[u8]) -> bool {
    data.iter().all(u8::is_ascii_digit)
}
