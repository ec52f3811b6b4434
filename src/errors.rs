use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

use crate::sequence::Alphabet;

#[derive(Debug)]
pub enum AlignError {
    /// A residue symbol has no score in the scoring model's alphabet
    InvalidAlphabet { symbol: u8, alphabet: Alphabet },

    /// No scoring model is registered under the given name
    UnknownScoringModel(String),

    /// A model parameter is outside its domain (negative gap cost, distance <= 0, ...)
    InvalidParameter(String),

    /// Error variant when we couldn't read from a file
    FileReadError { source: io::Error },

    /// Other IO errors
    IOError(io::Error),
}

impl Error for AlignError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            Self::FileReadError { ref source } => Some(source),
            Self::IOError(ref source) => Some(source),
            _ => None
        }
    }
}

impl From<io::Error> for AlignError {
    fn from(value: io::Error) -> Self {
        Self::IOError(value)
    }
}

impl Display for AlignError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::InvalidAlphabet { symbol, alphabet } =>
                write!(f, "Symbol '{}' (0x{symbol:02x}) is not part of the {alphabet} alphabet!", symbol.escape_ascii()),
            Self::UnknownScoringModel(ref name) =>
                write!(f, "Unknown scoring model '{name}'!"),
            Self::InvalidParameter(ref msg) =>
                write!(f, "Invalid parameter: {msg}"),
            Self::FileReadError { source: _ } =>
                write!(f, "Could not read from file!"),
            Self::IOError(ref err) =>
                err.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_alphabet_message() {
        let err = AlignError::InvalidAlphabet { symbol: b'J', alphabet: Alphabet::Nucleotide };
        assert_eq!(err.to_string(), "Symbol 'J' (0x4a) is not part of the nucleotide alphabet!");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_io_source() {
        let err = AlignError::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "missing");
    }
}
