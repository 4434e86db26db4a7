//! BIP173 strings: a human-readable label, the separator `1`, the payload in 5-bit symbols and a 6 symbol BCH checksum.

pub mod checksum;
pub mod decode;
pub mod encode;

pub use crate::base_common::Alphabet;
pub use decode::{decode, Decoded, Decoder};
pub use encode::{encode, encode_into, Encoder};

pub const ALPHABET: Alphabet<32> = match Alphabet::new(b"qpzry9x8gf2tvdw0s3jn54khce6mua7l") {
    Ok(alphabet) => alphabet,
    Err(_) => panic!("Could not build alphabet"),
};

pub const SEPARATOR: u8 = b'1';

pub const CHECKSUM_LENGTH: usize = 6;

pub const MAX_LENGTH: usize = 90;

const fn div_ceil(lhs: usize, rhs: usize) -> usize {
    (lhs + rhs - 1) / rhs
}

/// Length of the string holding `bits` payload bits under a label of `label_length` characters.
pub const fn encoded_length(label_length: usize, bits: usize) -> usize {
    label_length + 1 + div_ceil(bits, 5) + CHECKSUM_LENGTH
}
