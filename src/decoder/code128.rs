//! Code 128 symbol decoding
//!
//! Works on quantized element widths: every character is three bars and
//! three spaces spanning 11 modules, the stop pattern adds a final bar for
//! 13 modules.

use super::{RawModules, SymbolDecoder};
use crate::error::{Result, ScanError};
use crate::models::{DecodedSymbol, SymbologyType};

/// Element widths (bar, space, bar, space, bar, space) for values 0..=105
pub const PATTERNS: [[u8; 6]; 106] = [
    [2, 1, 2, 2, 2, 2], [2, 2, 2, 1, 2, 2], [2, 2, 2, 2, 2, 1], [1, 2, 1, 2, 2, 3], [1, 2, 1, 3, 2, 2], [1, 3, 1, 2, 2, 2],
    [1, 2, 2, 2, 1, 3], [1, 2, 2, 3, 1, 2], [1, 3, 2, 2, 1, 2], [2, 2, 1, 2, 1, 3], [2, 2, 1, 3, 1, 2], [2, 3, 1, 2, 1, 2],
    [1, 1, 2, 2, 3, 2], [1, 2, 2, 1, 3, 2], [1, 2, 2, 2, 3, 1], [1, 1, 3, 2, 2, 2], [1, 2, 3, 1, 2, 2], [1, 2, 3, 2, 2, 1],
    [2, 2, 3, 2, 1, 1], [2, 2, 1, 1, 3, 2], [2, 2, 1, 2, 3, 1], [2, 1, 3, 2, 1, 2], [2, 2, 3, 1, 1, 2], [3, 1, 2, 1, 3, 1],
    [3, 1, 1, 2, 2, 2], [3, 2, 1, 1, 2, 2], [3, 2, 1, 2, 2, 1], [3, 1, 2, 2, 1, 2], [3, 2, 2, 1, 1, 2], [3, 2, 2, 2, 1, 1],
    [2, 1, 2, 1, 2, 3], [2, 1, 2, 3, 2, 1], [2, 3, 2, 1, 2, 1], [1, 1, 1, 3, 2, 3], [1, 3, 1, 1, 2, 3], [1, 3, 1, 3, 2, 1],
    [1, 1, 2, 3, 1, 3], [1, 3, 2, 1, 1, 3], [1, 3, 2, 3, 1, 1], [2, 1, 1, 3, 1, 3], [2, 3, 1, 1, 1, 3], [2, 3, 1, 3, 1, 1],
    [1, 1, 2, 1, 3, 3], [1, 1, 2, 3, 3, 1], [1, 3, 2, 1, 3, 1], [1, 1, 3, 1, 2, 3], [1, 1, 3, 3, 2, 1], [1, 3, 3, 1, 2, 1],
    [3, 1, 3, 1, 2, 1], [2, 1, 1, 3, 3, 1], [2, 3, 1, 1, 3, 1], [2, 1, 3, 1, 1, 3], [2, 1, 3, 3, 1, 1], [2, 1, 3, 1, 3, 1],
    [3, 1, 1, 1, 2, 3], [3, 1, 1, 3, 2, 1], [3, 3, 1, 1, 2, 1], [3, 1, 2, 1, 1, 3], [3, 1, 2, 3, 1, 1], [3, 3, 2, 1, 1, 1],
    [3, 1, 4, 1, 1, 1], [2, 2, 1, 4, 1, 1], [4, 3, 1, 1, 1, 1], [1, 1, 1, 2, 2, 4], [1, 1, 1, 4, 2, 2], [1, 2, 1, 1, 2, 4],
    [1, 2, 1, 4, 2, 1], [1, 4, 1, 1, 2, 2], [1, 4, 1, 2, 2, 1], [1, 1, 2, 2, 1, 4], [1, 1, 2, 4, 1, 2], [1, 2, 2, 1, 1, 4],
    [1, 2, 2, 4, 1, 1], [1, 4, 2, 1, 1, 2], [1, 4, 2, 2, 1, 1], [2, 4, 1, 2, 1, 1], [2, 2, 1, 1, 1, 4], [4, 1, 3, 1, 1, 1],
    [2, 4, 1, 1, 1, 2], [1, 3, 4, 1, 1, 1], [1, 1, 1, 2, 4, 2], [1, 2, 1, 1, 4, 2], [1, 2, 1, 2, 4, 1], [1, 1, 4, 2, 1, 2],
    [1, 2, 4, 1, 1, 2], [1, 2, 4, 2, 1, 1], [4, 1, 1, 2, 1, 2], [4, 2, 1, 1, 1, 2], [4, 2, 1, 2, 1, 1], [2, 1, 2, 1, 4, 1],
    [2, 1, 4, 1, 2, 1], [4, 1, 2, 1, 2, 1], [1, 1, 1, 1, 4, 3], [1, 1, 1, 3, 4, 1], [1, 3, 1, 1, 4, 1], [1, 1, 4, 1, 1, 3],
    [1, 1, 4, 3, 1, 1], [4, 1, 1, 1, 1, 3], [4, 1, 1, 3, 1, 1], [1, 1, 3, 1, 4, 1], [1, 1, 4, 1, 3, 1], [3, 1, 1, 1, 4, 1],
    [4, 1, 1, 1, 3, 1], [2, 1, 1, 4, 1, 2], [2, 1, 1, 2, 1, 4], [2, 1, 1, 2, 3, 2],
];

/// Stop pattern, including the trailing bar
pub const STOP_PATTERN: [u8; 7] = [2, 3, 3, 1, 1, 1, 2];

/// Start character values
pub const START_A: usize = 103;
/// Start code B
pub const START_B: usize = 104;
/// Start code C
pub const START_C: usize = 105;

/// Shift: the next character is read in the other of sets A and B
pub(crate) const SHIFT: u8 = 98;
const CODE_C: u8 = 99;
const FNC1: u8 = 102;
const FNC2: u8 = 97;
const FNC3: u8 = 96;
/// GS1 field separator emitted for FNC1 after the first position
const GROUP_SEPARATOR: u8 = 0x1D;

/// Active character set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSet {
    /// Upper-case ASCII and control characters
    A,
    /// Printable ASCII
    B,
    /// Digit pairs
    C,
}

impl CodeSet {
    fn from_start(value: u8) -> Option<Self> {
        match value as usize {
            START_A => Some(CodeSet::A),
            START_B => Some(CodeSet::B),
            START_C => Some(CodeSet::C),
            _ => None,
        }
    }

    /// Value that switches into this set from another one
    pub fn switch_value(&self, from: CodeSet) -> u8 {
        match (from, self) {
            (_, CodeSet::C) => CODE_C,
            (CodeSet::A, CodeSet::B) | (CodeSet::C, CodeSet::B) => 100,
            _ => 101,
        }
    }

    /// FNC4 value in sets A and B
    pub fn fnc4(&self) -> Option<u8> {
        match self {
            CodeSet::A => Some(101),
            CodeSet::B => Some(100),
            CodeSet::C => None,
        }
    }
}

/// Look up the value of one 6-element character
pub fn value_of(widths: &[u8]) -> Option<u8> {
    PATTERNS
        .iter()
        .position(|pattern| pattern.as_slice() == widths)
        .map(|value| value as u8)
}

/// Weighted modulo-103 check value for a start code followed by data values
pub fn checksum(start: u8, data: &[u8]) -> u8 {
    let sum = data
        .iter()
        .enumerate()
        .fold(start as u32, |acc, (i, &v)| acc + (i as u32 + 1) * v as u32);
    (sum % 103) as u8
}

/// Decoder for quantized Code 128 widths
#[derive(Debug, Clone, Copy, Default)]
pub struct Code128Decoder;

impl SymbolDecoder for Code128Decoder {
    fn symbology(&self) -> SymbologyType {
        SymbologyType::Code128
    }

    fn decode(&self, raw: &RawModules) -> Result<DecodedSymbol> {
        let RawModules::Linear { widths } = raw else {
            return Err(ScanError::FormatError("Code 128 needs linear widths"));
        };
        let values = character_values(widths)?;

        let (&start, rest) = values.split_first().ok_or(ScanError::UnknownPattern)?;
        let (&check, data) = rest.split_last().ok_or(ScanError::UnknownPattern)?;
        let set = CodeSet::from_start(start).ok_or(ScanError::UnknownPattern)?;
        if data.is_empty() {
            return Err(ScanError::FormatError("Code 128 symbol without data"));
        }
        if data.iter().any(|&v| v as usize >= START_A) {
            return Err(ScanError::UnknownPattern);
        }

        let expected = checksum(start, data);
        if expected != check {
            return Err(ScanError::ChecksumMismatch {
                expected: expected as u16,
                found: check as u16,
            });
        }

        let bytes = interpret(set, data);
        if bytes.is_empty() {
            return Err(ScanError::FormatError("Code 128 symbol without data"));
        }
        Ok(DecodedSymbol::new(bytes, SymbologyType::Code128))
    }
}

/// Split widths into characters and map each to its value; the stop is checked and dropped
fn character_values(widths: &[u8]) -> Result<Vec<u8>> {
    if widths.len() < 7 || (widths.len() - 7) % 6 != 0 {
        return Err(ScanError::FormatError("Code 128 element count"));
    }
    let (chars, stop) = widths.split_at(widths.len() - 7);
    if stop != STOP_PATTERN {
        return Err(ScanError::UnknownPattern);
    }

    chars
        .chunks_exact(6)
        .map(|chunk| {
            if chunk.iter().map(|&w| w as u32).sum::<u32>() != 11 {
                return Err(ScanError::UnknownPattern);
            }
            value_of(chunk).ok_or(ScanError::UnknownPattern)
        })
        .collect()
}

/// Turn data values into bytes under code set switching, Shift and FNC4
fn interpret(start: CodeSet, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut set = start;
    let mut shifted = false;
    // FNC4: a single one lifts the next character, two in a row toggle the latch
    let mut upper_latch = false;
    let mut upper_once = false;
    let mut previous_fnc4 = false;

    for (position, &value) in data.iter().enumerate() {
        let current = match (shifted, set) {
            (true, CodeSet::A) => CodeSet::B,
            (true, CodeSet::B) => CodeSet::A,
            (_, other) => other,
        };
        shifted = false;

        if current == CodeSet::C {
            match value {
                0..=99 => {
                    out.push(b'0' + value / 10);
                    out.push(b'0' + value % 10);
                }
                100 => set = CodeSet::B,
                101 => set = CodeSet::A,
                _ => push_fnc1(&mut out, position),
            }
            previous_fnc4 = false;
            continue;
        }

        if Some(value) == current.fnc4() {
            if previous_fnc4 {
                upper_latch = !upper_latch;
                upper_once = false;
                previous_fnc4 = false;
            } else {
                upper_once = true;
                previous_fnc4 = true;
            }
            continue;
        }
        previous_fnc4 = false;

        match value {
            FNC1 => push_fnc1(&mut out, position),
            FNC2 | FNC3 => {}
            SHIFT => shifted = true,
            CODE_C => set = CodeSet::C,
            100 | 101 => {
                // The non-FNC4 value of the pair switches A <-> B
                set = if current == CodeSet::A { CodeSet::B } else { CodeSet::A };
            }
            _ => {
                let base = match current {
                    CodeSet::A if value >= 64 => value - 64,
                    _ => value + 32,
                };
                let lifted = upper_latch != upper_once;
                out.push(if lifted { base | 0x80 } else { base });
                upper_once = false;
            }
        }
    }
    out
}

fn push_fnc1(out: &mut Vec<u8>, position: usize) {
    // FNC1 in first position marks GS1 data and carries no byte
    if position > 0 {
        out.push(GROUP_SEPARATOR);
    }
}
