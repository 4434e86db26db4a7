use super::{checksum, encoded_length, Alphabet, ALPHABET, MAX_LENGTH, SEPARATOR};
use std::{error, fmt};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// Fewer than the requested number of bits are available in the input.
    InputTooShort { bits: usize, available: usize },
    TooLong { len: usize },
    InvalidLabelCharacter { character: u8, index: usize },
    BufferTooSmall,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputTooShort { bits, available } => write!(f, "Input of {} bits too short for {} bits", available, bits),
            Error::TooLong { len } => write!(f, "String of {} characters exceeds {}", len, MAX_LENGTH),
            Error::InvalidLabelCharacter { character, index } => {
                write!(f, "Invalid label character {:#04x} at index {}", character, index)
            }
            Error::BufferTooSmall => write!(f, "Output buffer too small"),
        }
    }
}

impl From<checksum::LabelError> for Error {
    fn from(error: checksum::LabelError) -> Self {
        Error::InvalidLabelCharacter {
            character: error.character,
            index: error.index,
        }
    }
}

struct Writer<'a, 'b> {
    alphabet: &'a Alphabet<32>,
    output: &'b mut [u8],
    index: usize,
    checksum: u32,
}

impl Writer<'_, '_> {
    fn write(&mut self, value: u8) {
        self.checksum = checksum::step(self.checksum, value);
        self.output[self.index] = self.alphabet.encode(value as usize);
        self.index += 1;
    }
}

pub struct Encoder<'a> {
    alphabet: &'a Alphabet<32>,
}

impl<'a> Encoder<'a> {
    pub const fn new(alphabet: &'a Alphabet<32>) -> Self {
        assert!(!alphabet.contains(SEPARATOR));
        Self { alphabet }
    }

    fn check(&self, label: &str, input: &[u8], bits: usize) -> Result<usize, Error> {
        if input.len() * 8 < bits {
            return Err(Error::InputTooShort {
                bits,
                available: input.len() * 8,
            });
        }
        let len = encoded_length(label.len(), bits);
        if len > MAX_LENGTH {
            return Err(Error::TooLong { len });
        }
        Ok(len)
    }

    fn encode_unchecked(&self, label: &str, input: &[u8], bits: usize, len: usize, output: &mut [u8]) -> Result<usize, Error> {
        let label = label.to_ascii_lowercase();
        let checksum = checksum::seed(&label)?;
        if output.len() < len {
            return Err(Error::BufferTooSmall);
        }

        output[..label.len()].copy_from_slice(label.as_bytes());
        output[label.len()] = SEPARATOR;
        let mut writer = Writer {
            alphabet: self.alphabet,
            output,
            index: label.len() + 1,
            checksum,
        };

        let mut accumulator: u32 = 0;
        let mut accumulated: usize = 0;
        let mut remaining = bits;
        for &byte in &input[..(bits + 7) / 8] {
            let taken = remaining.min(8);
            accumulator = (accumulator << taken) | ((byte >> (8 - taken)) as u32);
            accumulated += taken;
            remaining -= taken;
            while accumulated >= 5 {
                accumulated -= 5;
                writer.write(((accumulator >> accumulated) & 31) as u8);
                accumulator &= (1 << accumulated) - 1;
            }
        }
        if accumulated > 0 {
            writer.write(((accumulator << (5 - accumulated)) & 31) as u8);
        }

        for value in checksum::finalize(writer.checksum) {
            writer.output[writer.index] = self.alphabet.encode(value as usize);
            writer.index += 1;
        }
        Ok(writer.index)
    }

    /// Writes the first `bits` bits of `input` under `label`, returning the number of characters written.
    ///
    /// Bits are read most significant first. The last symbol is completed with up to four zero bits.
    /// The output is lowercase whatever the case of `label`.
    pub fn encode_into(&self, label: &str, input: impl AsRef<[u8]>, bits: usize, output: &mut impl AsMut<[u8]>) -> Result<usize, Error> {
        let input = input.as_ref();
        let len = self.check(label, input, bits)?;
        self.encode_unchecked(label, input, bits, len, output.as_mut())
    }

    pub fn encode(&self, label: &str, input: impl AsRef<[u8]>, bits: usize) -> Result<String, Error> {
        let input = input.as_ref();
        let len = self.check(label, input, bits)?;
        let mut output = vec![0u8; len];
        self.encode_unchecked(label, input, bits, len, &mut output)?;
        // the label was checked to be printable ascii and the alphabet is ascii
        Ok(unsafe { String::from_utf8_unchecked(output) })
    }

    pub fn default() -> &'static Self {
        &ENCODER
    }
}

const ENCODER: Encoder = Encoder::new(&ALPHABET);

pub fn encode(label: &str, input: impl AsRef<[u8]>, bits: usize) -> Result<String, Error> {
    Encoder::default().encode(label, input, bits)
}

pub fn encode_into(label: &str, input: impl AsRef<[u8]>, bits: usize, output: &mut impl AsMut<[u8]>) -> Result<usize, Error> {
    Encoder::default().encode_into(label, input, bits, output)
}
