use super::{checksum, Alphabet, ALPHABET, CHECKSUM_LENGTH, MAX_LENGTH, SEPARATOR};
use crate::base_common::alphabet;
use std::{error, fmt};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    TooLong { len: usize },
    MixedCase,
    MissingLabel,
    IncompleteChecksum,
    InvalidLabelCharacter { character: u8, index: usize },
    InvalidCharacter { character: u8, index: usize },
    /// The checksum does not match. `corrected_bits` is the number of bits repaired, zero when nothing was recovered.
    Corrupted { corrected_bits: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TooLong { len } => write!(f, "String of {} characters exceeds {}", len, MAX_LENGTH),
            Error::MixedCase => write!(f, "Mix of upper and lower case"),
            Error::MissingLabel => write!(f, "Missing human-readable part"),
            Error::IncompleteChecksum => write!(f, "Missing characters for the {} character checksum", CHECKSUM_LENGTH),
            Error::InvalidLabelCharacter { character, index } => {
                write!(f, "Invalid label character {:#04x} at index {}", character, index)
            }
            Error::InvalidCharacter { character, index } => {
                write!(f, "Invalid character {:?} at index {}", *character as char, index)
            }
            Error::Corrupted { corrected_bits: 0 } => write!(f, "Data corruption, checksum recovery failed"),
            Error::Corrupted { corrected_bits } => write!(f, "Data corruption, {} bits corrected", corrected_bits),
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

impl From<alphabet::DecodeError> for Error {
    fn from(error: alphabet::DecodeError) -> Self {
        Error::InvalidCharacter {
            character: error.character,
            index: error.index,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Decoded {
    label: String,
    payload: Vec<u8>,
    padding: usize,
}

impl Decoded {
    /// The lowercase human-readable part.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Number of zero bits appended to the last payload byte, from 0 to 7.
    pub fn padding(&self) -> usize {
        self.padding
    }

    pub fn bits(&self) -> usize {
        self.payload.len() * 8 - self.padding
    }
}

fn check_case(input: &[u8]) -> Result<(), Error> {
    let lower = input.iter().any(u8::is_ascii_lowercase);
    let upper = input.iter().any(u8::is_ascii_uppercase);
    if lower && upper {
        return Err(Error::MixedCase);
    }
    Ok(())
}

pub struct Decoder<'a> {
    alphabet: &'a Alphabet<32>,
}

impl<'a> Decoder<'a> {
    pub const fn new(alphabet: &'a Alphabet<32>) -> Self {
        assert!(!alphabet.contains(SEPARATOR));
        Self { alphabet }
    }

    pub fn decode(&self, input: impl AsRef<[u8]>) -> Result<Decoded, Error> {
        let input = input.as_ref();
        if input.len() > MAX_LENGTH {
            return Err(Error::TooLong { len: input.len() });
        }
        check_case(input)?;
        let input = input.to_ascii_lowercase();

        let separator = match input.iter().rposition(|&character| character == SEPARATOR) {
            Some(0) | None => return Err(Error::MissingLabel),
            Some(separator) => separator,
        };
        if input.len() - separator - 1 < CHECKSUM_LENGTH {
            return Err(Error::IncompleteChecksum);
        }

        let label = &input[..separator];
        let mut checksum = checksum::seed(label)?;

        let checksum_start = input.len() - CHECKSUM_LENGTH;
        let data_start = separator + 1;
        let mut payload = Vec::with_capacity(((checksum_start - data_start) * 5 + 7) / 8);
        let mut accumulator: u32 = 0;
        let mut bits: usize = 0;
        for (index, &character) in input.iter().enumerate().take(checksum_start).skip(data_start) {
            let value = self.alphabet.decode(character, index)?;
            checksum = checksum::step(checksum, value);
            accumulator = (accumulator << 5) | (value as u32);
            bits += 5;
            if bits >= 8 {
                bits -= 8;
                payload.push((accumulator >> bits) as u8);
                accumulator &= (1 << bits) - 1;
            }
        }
        let mut padding = 0;
        if bits > 0 {
            padding = 8 - bits;
            payload.push((accumulator << padding) as u8);
        }

        for (index, &character) in input.iter().enumerate().skip(checksum_start) {
            checksum = checksum::step(checksum, self.alphabet.decode(character, index)?);
        }
        if checksum != checksum::CONSTANT {
            return Err(Error::Corrupted { corrected_bits: 0 });
        }

        Ok(Decoded {
            label: label.iter().map(|&character| character as char).collect(),
            payload,
            padding,
        })
    }

    pub fn default() -> &'static Self {
        &DECODER
    }
}

const DECODER: Decoder = Decoder::new(&ALPHABET);

pub fn decode(input: impl AsRef<[u8]>) -> Result<Decoded, Error> {
    Decoder::default().decode(input)
}

#[cfg(test)]
mod tests {
    use super::{Decoded, Error};

    fn decoded(label: &str, payload: Vec<u8>, padding: usize) -> Decoded {
        Decoded {
            label: label.to_string(),
            payload,
            padding,
        }
    }

    #[test]
    fn decode() {
        assert_eq!(
            super::decode("test1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqql6aptf"),
            Ok(decoded("test", vec![0; 20], 0))
        );
        assert_eq!(super::decode("A12UEL5L"), Ok(decoded("a", vec![], 0)));
        assert_eq!(super::decode("a12uel5l"), Ok(decoded("a", vec![], 0)));
        assert_eq!(super::decode("?1ezyfcl"), Ok(decoded("?", vec![], 0)));
        assert_eq!(
            super::decode("abcdef1qpzry9x8gf2tvdw0s3jn54khce6mua7lmqqqxw"),
            Ok(decoded(
                "abcdef",
                vec![
                    0x00, 0x44, 0x32, 0x14, 0xc7, 0x42, 0x54, 0xb6, 0x35, 0xcf, 0x84, 0x65, 0x3a, 0x56, 0xd7, 0xc6, 0x75, 0xbe, 0x77,
                    0xdf,
                ],
                0
            ))
        );
        assert_eq!(super::decode("bc1upa068g"), Ok(decoded("bc", vec![0xe0], 3)));
        assert_eq!(super::decode("bc1lu4g38dd"), Ok(decoded("bc", vec![0xff, 0x00], 6)));
    }

    #[test]
    fn label_may_contain_separator() {
        let string = "an83characterlonghumanreadablepartthatcontainsthenumber1andtheexcludedcharactersbio1tt5tgs";
        let decoded = super::decode(string).unwrap();
        assert_eq!(decoded.label(), &string[..83]);
        assert_eq!(decoded.bits(), 0);
    }

    #[test]
    fn padding() {
        let decoded = super::decode("11qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqc8247j").unwrap();
        assert_eq!(decoded.label(), "1");
        assert_eq!(decoded.payload(), &[0u8; 52][..]);
        assert_eq!(decoded.padding(), 6);
        assert_eq!(decoded.bits(), 410);
    }

    #[test]
    fn nonzero_fill_bits_are_kept() {
        // "ll" carries ten set bits, two past the first byte
        let result = super::decode("bc1llmmy3rj").unwrap();
        assert_eq!(result, decoded("bc", vec![0xff, 0xc0], 6));
        assert_eq!(result.bits(), 10);
        assert_eq!(
            crate::bech32::encode(result.label(), result.payload(), result.bits()),
            Ok("bc1llmmy3rj".to_string())
        );
        // the zero filled form of the same byte is a different string
        assert_eq!(crate::bech32::encode("bc", [0xff], 8), Ok("bc1lu4g38dd".to_string()));
    }

    #[test]
    fn length() {
        let string = "11qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqc8247j";
        assert_eq!(string.len(), 90);
        assert!(super::decode(string).is_ok());
        // would also fail on case and checksum, length comes first
        let string = format!("X{}", string);
        assert_eq!(super::decode(&string), Err(Error::TooLong { len: 91 }));
        assert_eq!(
            super::decode("an84characterslonghumanreadablepartthatcontainsthenumber1andtheexcludedcharactersbio1569pvx"),
            Err(Error::TooLong { len: 91 })
        );
    }

    #[test]
    fn case() {
        assert_eq!(super::decode("A12uEL5L"), Err(Error::MixedCase));
        assert_eq!(super::decode("Test1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqql6aptf"), Err(Error::MixedCase));
        // checksum computed over the uppercase label
        assert_eq!(super::decode("A1G7SGD8"), Err(Error::Corrupted { corrected_bits: 0 }));
    }

    #[test]
    fn structure() {
        assert_eq!(super::decode("pzry9x0s0muk"), Err(Error::MissingLabel));
        assert_eq!(super::decode("1pzry9x0s0muk"), Err(Error::MissingLabel));
        assert_eq!(super::decode("10a06t8"), Err(Error::MissingLabel));
        assert_eq!(super::decode("1qzzfhee"), Err(Error::MissingLabel));
        assert_eq!(super::decode(""), Err(Error::MissingLabel));
        assert_eq!(super::decode("li1dgmt3"), Err(Error::IncompleteChecksum));
    }

    #[test]
    fn characters() {
        assert_eq!(
            super::decode(b"\x201nwldj5"),
            Err(Error::InvalidLabelCharacter { character: 0x20, index: 0 })
        );
        assert_eq!(
            super::decode(b"\x7f1axkwrx"),
            Err(Error::InvalidLabelCharacter { character: 0x7f, index: 0 })
        );
        assert_eq!(
            super::decode(b"\x801eym55h"),
            Err(Error::InvalidLabelCharacter { character: 0x80, index: 0 })
        );
        assert_eq!(
            super::decode("x1b4n0q5v"),
            Err(Error::InvalidCharacter { character: b'b', index: 2 })
        );
        assert_eq!(
            super::decode(b"de1lg7wt\xff"),
            Err(Error::InvalidCharacter { character: 0xff, index: 8 })
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            Error::Corrupted { corrected_bits: 0 }.to_string(),
            "Data corruption, checksum recovery failed"
        );
        assert_eq!(Error::Corrupted { corrected_bits: 2 }.to_string(), "Data corruption, 2 bits corrected");
        assert_eq!(
            Error::InvalidCharacter { character: b'b', index: 2 }.to_string(),
            "Invalid character 'b' at index 2"
        );
    }
}
