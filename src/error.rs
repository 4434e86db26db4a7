use std::{error, fmt};

#[derive(Debug)]
pub struct Error {
    message: String,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", &self.message)
    }
}

impl error::Error for Error {}

impl From<bech32_codec::bech32::decode::Error> for Error {
    fn from(error: bech32_codec::bech32::decode::Error) -> Self {
        Self::new(error.to_string())
    }
}

impl From<bech32_codec::bech32::encode::Error> for Error {
    fn from(error: bech32_codec::bech32::encode::Error) -> Self {
        Self::new(error.to_string())
    }
}

impl From<bech32_codec::hex::Error> for Error {
    fn from(error: bech32_codec::hex::Error) -> Self {
        Self::new(format!("Invalid hex payload: {}", error))
    }
}
