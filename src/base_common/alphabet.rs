use std::{error, fmt};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    DuplicateCharacter { character: char, first: usize, second: usize },
    NonAsciiCharacter { character: u8, index: usize },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DecodeError {
    pub character: u8,
    pub index: usize,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateCharacter { character, first, second } => {
                write!(f, "Duplicate character '{}' at indexes {} and {}", character, first, second)
            }
            Self::NonAsciiCharacter { character, index } => write!(f, "Non-ascii character {:#04x} at index {}", character, index),
        }
    }
}

impl error::Error for DecodeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid character {:?} at index {}", self.character as char, self.index)
    }
}

/// A fixed set of `N` ascii characters, the position of each character being its value.
///
/// The reverse table covers every byte value so that lookups never need a range check.
pub struct Alphabet<const N: usize> {
    encode: [u8; N],
    decode: [Option<u8>; 256],
}

impl<const N: usize> Alphabet<N> {
    pub const fn new(characters: &[u8; N]) -> Result<Self, Error> {
        let mut encode = [0u8; N];
        let mut decode: [Option<u8>; 256] = [None; 256];

        let mut index = 0;
        while index < N {
            let character = characters[index];
            if character >= 128 {
                return Err(Error::NonAsciiCharacter { character, index });
            }
            if let Some(first) = decode[character as usize] {
                return Err(Error::DuplicateCharacter {
                    character: character as char,
                    first: first as usize,
                    second: index,
                });
            }
            encode[index] = character;
            decode[character as usize] = Some(index as u8);
            index += 1;
        }

        Ok(Self { encode, decode })
    }

    pub const fn encode(&self, value: usize) -> u8 {
        self.encode[value]
    }

    pub const fn lookup(&self, character: u8) -> Option<u8> {
        self.decode[character as usize]
    }

    pub fn decode(&self, character: u8, index: usize) -> Result<u8, DecodeError> {
        self.lookup(character).ok_or(DecodeError { character, index })
    }

    pub const fn contains(&self, character: u8) -> bool {
        self.lookup(character).is_some()
    }
}
