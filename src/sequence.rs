use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::errors::AlignError;

const NUCLEOTIDE_CANONICAL: &[u8] = b"ACGT";
const NUCLEOTIDE_SYMBOLS: &[u8] = b"ACGTRYSWKMBDHVN";

const AMINO_ACID_CANONICAL: &[u8] = b"ARNDCQEGHILKMFPSTWYV";
const AMINO_ACID_SYMBOLS: &[u8] = b"ARNDCQEGHILKMFPSTWYVBZJX";

/// The residue alphabets supported by the scoring models.
///
/// Each alphabet has a set of canonical (unambiguous) states and a number of
/// ambiguity codes, each representing a set of canonical states. Symbols are
/// case-insensitive, and for nucleotides `U` is read as `T`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alphabet {
    Nucleotide,
    AminoAcid,
}

impl Alphabet {
    /// The canonical states, in the order used to index scoring matrices.
    pub fn canonical(&self) -> &'static [u8] {
        match self {
            Self::Nucleotide => NUCLEOTIDE_CANONICAL,
            Self::AminoAcid => AMINO_ACID_CANONICAL,
        }
    }

    /// All symbols of the alphabet: canonical states followed by ambiguity codes.
    pub fn symbols(&self) -> &'static [u8] {
        match self {
            Self::Nucleotide => NUCLEOTIDE_SYMBOLS,
            Self::AminoAcid => AMINO_ACID_SYMBOLS,
        }
    }

    /// Map a raw symbol to its upper case representative in this alphabet.
    pub fn normalize(&self, symbol: u8) -> Option<u8> {
        let upper = symbol.to_ascii_uppercase();
        let upper = match (self, upper) {
            (Self::Nucleotide, b'U') => b'T',
            (_, c) => c,
        };

        self.symbols().contains(&upper).then_some(upper)
    }

    pub fn is_canonical(&self, symbol: u8) -> bool {
        self.normalize(symbol)
            .is_some_and(|s| self.canonical().contains(&s))
    }

    /// The canonical states a symbol stands for. Canonical symbols expand to themselves.
    pub fn expand(&self, symbol: u8) -> Option<&'static [u8]> {
        let normalized = self.normalize(symbol)?;

        let states: &'static [u8] = match (self, normalized) {
            (Self::Nucleotide, b'A') => b"A",
            (Self::Nucleotide, b'C') => b"C",
            (Self::Nucleotide, b'G') => b"G",
            (Self::Nucleotide, b'T') => b"T",
            (Self::Nucleotide, b'R') => b"AG",
            (Self::Nucleotide, b'Y') => b"CT",
            (Self::Nucleotide, b'S') => b"CG",
            (Self::Nucleotide, b'W') => b"AT",
            (Self::Nucleotide, b'K') => b"GT",
            (Self::Nucleotide, b'M') => b"AC",
            (Self::Nucleotide, b'B') => b"CGT",
            (Self::Nucleotide, b'D') => b"AGT",
            (Self::Nucleotide, b'H') => b"ACT",
            (Self::Nucleotide, b'V') => b"ACG",
            (Self::Nucleotide, b'N') => NUCLEOTIDE_CANONICAL,
            (Self::AminoAcid, b'B') => b"DN",
            (Self::AminoAcid, b'Z') => b"EQ",
            (Self::AminoAcid, b'J') => b"IL",
            (Self::AminoAcid, b'X') => AMINO_ACID_CANONICAL,
            (Self::AminoAcid, _) => {
                let pos = AMINO_ACID_CANONICAL.iter().position(|c| *c == normalized)?;
                &AMINO_ACID_CANONICAL[pos..pos + 1]
            },
            (Self::Nucleotide, _) => return None,
        };

        Some(states)
    }

    /// Check that every residue belongs to this alphabet.
    pub fn validate(&self, residues: &[u8]) -> Result<(), AlignError> {
        match residues.iter().find(|c| self.normalize(**c).is_none()) {
            Some(&symbol) => Err(AlignError::InvalidAlphabet { symbol, alphabet: *self }),
            None => Ok(())
        }
    }

    /// Nucleotide if every residue is a nucleotide symbol, amino acid otherwise.
    pub fn guess(residues: &[u8]) -> Self {
        if residues.iter().all(|c| Self::Nucleotide.normalize(*c).is_some()) {
            Self::Nucleotide
        } else {
            Self::AminoAcid
        }
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nucleotide => write!(f, "nucleotide"),
            Self::AminoAcid => write!(f, "amino acid"),
        }
    }
}

/// An immutable, named residue sequence over a fixed alphabet.
///
/// Residues keep the case they were given in, positions are 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    name: String,
    residues: Vec<u8>,
    alphabet: Alphabet,
}

impl Sequence {
    pub fn new(name: impl Into<String>, residues: impl Into<Vec<u8>>, alphabet: Alphabet) -> Result<Self, AlignError> {
        let residues = residues.into();
        alphabet.validate(&residues)?;

        Ok(Self { name: name.into(), residues, alphabet })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    /// The residue at 1-based position `i`.
    pub fn symbol(&self, i: usize) -> Option<u8> {
        i.checked_sub(1).and_then(|ix| self.residues.get(ix).copied())
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

impl AsRef<[u8]> for Sequence {
    fn as_ref(&self) -> &[u8] {
        &self.residues
    }
}
