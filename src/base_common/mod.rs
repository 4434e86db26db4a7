pub mod alphabet;

pub use alphabet::Alphabet;
