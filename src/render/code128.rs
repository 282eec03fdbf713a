/// Code 128 encoding to element widths
use crate::decoder::code128::{
    CodeSet, PATTERNS, SHIFT, START_A, START_B, START_C, STOP_PATTERN, checksum,
};
use crate::error::{Result, ScanError};

/// Module widths of the full symbol, start character through stop pattern
///
/// Even runs of four or more digits use Code C, control characters use
/// Code A and everything else Code B. Bytes above 127 are written with FNC4.
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    let values = encode_values(data)?;
    let (&start, rest) = values
        .split_first()
        .ok_or(ScanError::FormatError("nothing to encode"))?;

    let mut widths = Vec::with_capacity((values.len() + 1) * 6 + STOP_PATTERN.len());
    for &value in &values {
        widths.extend_from_slice(&PATTERNS[value as usize]);
    }
    widths.extend_from_slice(&PATTERNS[checksum(start, rest) as usize]);
    widths.extend_from_slice(&STOP_PATTERN);
    Ok(widths)
}

/// Start value followed by data values, without check character
fn encode_values(data: &[u8]) -> Result<Vec<u8>> {
    let Some(&first) = data.first() else {
        return Err(ScanError::FormatError("nothing to encode"));
    };

    let mut set = if starts_digit_pairs(data, 0) {
        CodeSet::C
    } else {
        required_set(first).unwrap_or(CodeSet::B)
    };
    let start = match set {
        CodeSet::A => START_A,
        CodeSet::B => START_B,
        CodeSet::C => START_C,
    };
    let mut values = vec![start as u8];

    let mut i = 0;
    while i < data.len() {
        if set == CodeSet::C {
            if digit_run(data, i) >= 2 {
                values.push((data[i] - b'0') * 10 + (data[i + 1] - b'0'));
                i += 2;
                continue;
            }
            let next = required_set(data[i]).unwrap_or(CodeSet::B);
            values.push(next.switch_value(set));
            set = next;
            continue;
        }

        if starts_digit_pairs(data, i) {
            values.push(CodeSet::C.switch_value(set));
            set = CodeSet::C;
            continue;
        }

        let byte = data[i];
        if let Some(needed) = required_set(byte).filter(|&s| s != set) {
            let isolated = data.get(i + 1).and_then(|&b| required_set(b)) != Some(needed);
            if byte < 0x80 && isolated {
                values.push(SHIFT);
                values.push(value_in(needed, byte));
                i += 1;
                continue;
            }
            values.push(needed.switch_value(set));
            set = needed;
        }

        if byte >= 0x80 {
            values.push(set.fnc4().ok_or(ScanError::FormatError("FNC4 outside sets A/B"))?);
        }
        values.push(value_in(set, byte));
        i += 1;
    }
    Ok(values)
}

fn digit_run(data: &[u8], from: usize) -> usize {
    data[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// An even run of at least four digits starts at `from`
fn starts_digit_pairs(data: &[u8], from: usize) -> bool {
    let run = digit_run(data, from);
    run >= 4 && run % 2 == 0
}

/// Set a byte's low seven bits can only be written in, if restricted
fn required_set(byte: u8) -> Option<CodeSet> {
    match byte & 0x7F {
        0..=31 => Some(CodeSet::A),
        96..=127 => Some(CodeSet::B),
        _ => None,
    }
}

fn value_in(set: CodeSet, byte: u8) -> u8 {
    let low = byte & 0x7F;
    match set {
        CodeSet::A if low < 32 => low + 64,
        _ => low - 32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::code128::Code128Decoder;
    use crate::decoder::{RawModules, SymbolDecoder};

    fn roundtrip(data: &[u8]) -> Vec<u8> {
        let widths = encode(data).unwrap();
        Code128Decoder
            .decode(&RawModules::Linear { widths })
            .unwrap()
            .data
    }

    #[test]
    fn test_hello_uses_code_b() {
        let values = encode_values(b"HELLO").unwrap();
        assert_eq!(values, vec![104, 40, 37, 44, 44, 47]);
        assert_eq!(encode(b"HELLO").unwrap().len(), 6 * 7 + 7);
    }

    #[test]
    fn test_digits_use_code_c() {
        assert_eq!(encode_values(b"12345678").unwrap(), vec![105, 12, 34, 56, 78]);
        // Odd run: one digit in B, then the pairs in C
        assert_eq!(encode_values(b"12345").unwrap(), vec![104, 17, 99, 23, 45]);
        // Three digits are not worth a switch
        assert_eq!(encode_values(b"Code 128").unwrap()[0], 104);
    }

    #[test]
    fn test_roundtrips() {
        for data in [
            &b"HELLO"[..],
            b"Code 128",
            b"12345678",
            b"AB1234cd",
            b"a\tb",
            b"\t\r\nxyz",
            b"\xE9t\xE9",
            b"0",
        ] {
            assert_eq!(roundtrip(data), data);
        }
    }

    #[test]
    fn test_shift_for_isolated_control() {
        let values = encode_values(b"a\tb").unwrap();
        assert_eq!(values, vec![104, 65, SHIFT, 73, 66]);
    }

    #[test]
    fn test_empty_input() {
        assert!(encode(b"").is_err());
    }
}
