pub mod base_common;
pub mod bech32;
pub mod hex;
