use super::CHECKSUM_LENGTH;
use std::{error, fmt};

const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

/// Residue of a valid string, also xored into the checksum on encoding.
pub const CONSTANT: u32 = 1;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LabelError {
    pub character: u8,
    pub index: usize,
}

impl error::Error for LabelError {}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid label character {:#04x} at index {}", self.character, self.index)
    }
}

/// Folds one 5-bit value into the 30-bit BCH remainder (see "Checksum" in BIP173).
pub const fn step(checksum: u32, value: u8) -> u32 {
    let top = checksum >> 25;
    let mut checksum = ((checksum & 0x1ffffff) << 5) ^ (value as u32);
    let mut index = 0;
    while index < GENERATOR.len() {
        if (top >> index) & 1 != 0 {
            checksum ^= GENERATOR[index];
        }
        index += 1;
    }
    checksum
}

/// Validates the label and returns the checksum after the label and the separator.
///
/// The high 3 bits of every character are folded first, then a zero, then the low 5 bits of every character.
pub fn seed(label: impl AsRef<[u8]>) -> Result<u32, LabelError> {
    let label = label.as_ref();
    let mut checksum = CONSTANT;
    for (index, &character) in label.iter().enumerate() {
        if !(33..=126).contains(&character) {
            return Err(LabelError { character, index });
        }
        checksum = step(checksum, character >> 5);
    }
    checksum = step(checksum, 0);
    for &character in label {
        checksum = step(checksum, character & 31);
    }
    Ok(checksum)
}

/// Returns the checksum symbols, most significant first.
pub fn finalize(mut checksum: u32) -> [u8; CHECKSUM_LENGTH] {
    for _ in 0..CHECKSUM_LENGTH {
        checksum = step(checksum, 0);
    }
    checksum ^= CONSTANT;
    let mut symbols = [0u8; CHECKSUM_LENGTH];
    for (index, symbol) in symbols.iter_mut().enumerate() {
        *symbol = ((checksum >> (5 * (CHECKSUM_LENGTH - 1 - index))) & 31) as u8;
    }
    symbols
}
