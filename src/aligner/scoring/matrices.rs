//! Registry of the scoring models that can be requested by name.
//!
//! Protein tables (`Blosum45`, `Blosum62`, `Blosum80`, `Pam250`) hold the
//! canonical residues only; ambiguity codes are derived by averaging. The
//! nucleotide models are parametric: a simple match/mismatch scheme and the
//! log-odds scores of the Jukes-Cantor and Kimura substitution models at a
//! given evolutionary distance.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aligner::scoring::ScoringModel;
use crate::errors::AlignError;
use crate::sequence::Alphabet;

/// A scoring model that can be built on demand.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScoringModelSpec {
    Blosum45,
    Blosum62,
    Blosum80,
    Pam250,

    /// Nucleotide identity scoring
    MatchMismatch { match_score: f64, mismatch_score: f64 },

    /// Log-odds scores under the Jukes-Cantor model at distance `distance`
    JukesCantor { distance: f64 },

    /// Log-odds scores under the Kimura 2-parameter model, with
    /// transition/transversion rate ratio `kappa`
    Kimura { distance: f64, kappa: f64 },
}

impl ScoringModelSpec {
    /// Names accepted by [`FromStr`], for help output.
    pub const NAMES: [&'static str; 7] = [
        "Blosum45",
        "Blosum62",
        "Blosum80",
        "Pam250",
        "MatchMismatch(<match>,<mismatch>)",
        "JukesCantor(<distance>)",
        "Kimura(<distance>,<kappa>)",
    ];

    pub fn alphabet(&self) -> Alphabet {
        match self {
            Self::Blosum45 | Self::Blosum62 | Self::Blosum80 | Self::Pam250 => Alphabet::AminoAcid,
            Self::MatchMismatch { .. } | Self::JukesCantor { .. } | Self::Kimura { .. } => Alphabet::Nucleotide,
        }
    }

    pub fn build(&self) -> Result<ScoringModel, AlignError> {
        let name = self.to_string();

        let model = match *self {
            Self::Blosum45 => table_model(name, &BLOSUM45),
            Self::Blosum62 => table_model(name, &BLOSUM62),
            Self::Blosum80 => table_model(name, &BLOSUM80),
            Self::Pam250 => table_model(name, &PAM250),
            Self::MatchMismatch { match_score, mismatch_score } => {
                if !match_score.is_finite() || !mismatch_score.is_finite() {
                    return Err(AlignError::InvalidParameter(
                        format!("match/mismatch scores should be finite, got {match_score}/{mismatch_score}")
                    ));
                }

                ScoringModel::from_fn(name, Alphabet::Nucleotide, |a, b| {
                    if a == b { match_score } else { mismatch_score }
                })
            },
            Self::JukesCantor { distance } => {
                check_distance(distance)?;
                let (p_same, p_diff) = jukes_cantor_probabilities(distance);
                check_log_odds(distance, &[p_same, p_diff])?;

                ScoringModel::from_fn(name, Alphabet::Nucleotide, |a, b| {
                    let p = if a == b { p_same } else { p_diff };
                    (4.0 * p).ln()
                })
            },
            Self::Kimura { distance, kappa } => {
                check_distance(distance)?;
                if !kappa.is_finite() || kappa <= 0.0 {
                    return Err(AlignError::InvalidParameter(
                        format!("transition/transversion ratio should be positive, got {kappa}")
                    ));
                }
                let (p_same, p_transition, p_transversion) = kimura_probabilities(distance, kappa);
                check_log_odds(distance, &[p_same, p_transition, p_transversion])?;

                ScoringModel::from_fn(name, Alphabet::Nucleotide, |a, b| {
                    let p = if a == b {
                        p_same
                    } else if is_transition(a, b) {
                        p_transition
                    } else {
                        p_transversion
                    };
                    (4.0 * p).ln()
                })
            },
        };

        Ok(model)
    }
}

impl Display for ScoringModelSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blosum45 => write!(f, "Blosum45"),
            Self::Blosum62 => write!(f, "Blosum62"),
            Self::Blosum80 => write!(f, "Blosum80"),
            Self::Pam250 => write!(f, "Pam250"),
            Self::MatchMismatch { match_score, mismatch_score } =>
                write!(f, "MatchMismatch({match_score},{mismatch_score})"),
            Self::JukesCantor { distance } => write!(f, "JukesCantor({distance})"),
            Self::Kimura { distance, kappa } => write!(f, "Kimura({distance},{kappa})"),
        }
    }
}

impl FromStr for ScoringModelSpec {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let unknown = || AlignError::UnknownScoringModel(trimmed.to_string());

        let (head, args) = match trimmed.split_once('(') {
            Some((head, rest)) => {
                let inner = rest.strip_suffix(')').ok_or_else(unknown)?;
                let args = inner.split(',')
                    .map(|v| v.trim().parse::<f64>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| unknown())?;

                (head.trim(), args)
            },
            None => (trimmed, Vec::new())
        };

        let spec = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("blosum45", []) => Self::Blosum45,
            ("blosum62", []) => Self::Blosum62,
            ("blosum80", []) => Self::Blosum80,
            ("pam250", []) => Self::Pam250,
            ("matchmismatch" | "simple", [m, x]) => Self::MatchMismatch { match_score: *m, mismatch_score: *x },
            ("jukescantor" | "jc", [d]) => Self::JukesCantor { distance: *d },
            ("kimura" | "k2p", [d, k]) => Self::Kimura { distance: *d, kappa: *k },
            _ => return Err(unknown()),
        };

        Ok(spec)
    }
}

impl FromStr for ScoringModel {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ScoringModelSpec>()?.build()
    }
}

fn check_distance(distance: f64) -> Result<(), AlignError> {
    if !distance.is_finite() || distance <= 0.0 {
        return Err(AlignError::InvalidParameter(
            format!("evolutionary distance should be positive and finite, got {distance}")
        ));
    }

    Ok(())
}

/// Every substitution probability must give a finite log-odds score.
fn check_log_odds(distance: f64, probabilities: &[f64]) -> Result<(), AlignError> {
    if probabilities.iter().any(|p| !(4.0 * p).ln().is_finite()) {
        return Err(AlignError::InvalidParameter(
            format!("evolutionary distance {distance} is too small, mismatch scores are not finite")
        ));
    }

    Ok(())
}

fn is_transition(a: u8, b: u8) -> bool {
    matches!((a, b), (b'A', b'G') | (b'G', b'A') | (b'C', b'T') | (b'T', b'C'))
}

/// Probability of observing the same or one specific other base after `distance`
/// substitutions per site.
fn jukes_cantor_probabilities(distance: f64) -> (f64, f64) {
    let decay = (-4.0 * distance / 3.0).exp();

    (0.25 + 0.75 * decay, 0.25 - 0.25 * decay)
}

/// Probability of the same base, a specific transition and a specific transversion.
fn kimura_probabilities(distance: f64, kappa: f64) -> (f64, f64, f64) {
    let beta_t = distance / (kappa + 2.0);
    let alpha_t = kappa * beta_t;

    let transversion_decay = (-4.0 * beta_t).exp();
    let total_decay = (-2.0 * (alpha_t + beta_t)).exp();

    (
        0.25 + 0.25 * transversion_decay + 0.5 * total_decay,
        0.25 + 0.25 * transversion_decay - 0.5 * total_decay,
        0.25 - 0.25 * transversion_decay,
    )
}

fn table_model(name: String, table: &[[i8; 20]; 20]) -> ScoringModel {
    let canonical = Alphabet::AminoAcid.canonical();

    ScoringModel::from_fn(name, Alphabet::AminoAcid, |a, b| {
        let ia = canonical.iter().position(|c| *c == a).unwrap_or_default();
        let ib = canonical.iter().position(|c| *c == b).unwrap_or_default();

        table[ia][ib] as f64
    })
}

// Row/column order: A R N D C Q E G H I L K M F P S T W Y V
#[rustfmt::skip]
const BLOSUM45: [[i8; 20]; 20] = [
//    A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V
    [ 5, -2, -1, -2, -1, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -2, -2,  0], // A
    [-2,  7,  0, -1, -3,  1,  0, -2,  0, -3, -2,  3, -1, -2, -2, -1, -1, -2, -1, -2], // R
    [-1,  0,  6,  2, -2,  0,  0,  0,  1, -2, -3,  0, -2, -2, -2,  1,  0, -4, -2, -3], // N
    [-2, -1,  2,  7, -3,  0,  2, -1,  0, -4, -3,  0, -3, -4, -1,  0, -1, -4, -2, -3], // D
    [-1, -3, -2, -3, 12, -3, -3, -3, -3, -3, -2, -3, -2, -2, -4, -1, -1, -5, -3, -1], // C
    [-1,  1,  0,  0, -3,  6,  2, -2,  1, -2, -2,  1,  0, -4, -1,  0, -1, -2, -1, -3], // Q
    [-1,  0,  0,  2, -3,  2,  6, -2,  0, -3, -2,  1, -2, -3,  0,  0, -1, -3, -2, -3], // E
    [ 0, -2,  0, -1, -3, -2, -2,  7, -2, -4, -3, -2, -2, -3, -2,  0, -2, -2, -3, -3], // G
    [-2,  0,  1,  0, -3,  1,  0, -2, 10, -3, -2, -1,  0, -2, -2, -1, -2, -3,  2, -3], // H
    [-1, -3, -2, -4, -3, -2, -3, -4, -3,  5,  2, -3,  2,  0, -2, -2, -1, -2,  0,  3], // I
    [-1, -2, -3, -3, -2, -2, -2, -3, -2,  2,  5, -3,  2,  1, -3, -3, -1, -2,  0,  1], // L
    [-1,  3,  0,  0, -3,  1,  1, -2, -1, -3, -3,  5, -1, -3, -1, -1, -1, -2, -1, -2], // K
    [-1, -1, -2, -3, -2,  0, -2, -2,  0,  2,  2, -1,  6,  0, -2, -2, -1, -2,  0,  1], // M
    [-2, -2, -2, -4, -2, -4, -3, -3, -2,  0,  1, -3,  0,  8, -3, -2, -1,  1,  3,  0], // F
    [-1, -2, -2, -1, -4, -1,  0, -2, -2, -2, -3, -1, -2, -3,  9, -1, -1, -3, -3, -3], // P
    [ 1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -3, -1, -2, -2, -1,  4,  2, -4, -2, -1], // S
    [ 0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -1, -1,  2,  5, -3, -1,  0], // T
    [-2, -2, -4, -4, -5, -2, -3, -2, -3, -2, -2, -2, -2,  1, -3, -4, -3, 15,  3, -3], // W
    [-2, -1, -2, -2, -3, -1, -2, -3,  2,  0,  0, -1,  0,  3, -3, -2, -1,  3,  8, -1], // Y
    [ 0, -2, -3, -3, -1, -3, -3, -3, -3,  3,  1, -2,  1,  0, -3, -1,  0, -3, -1,  5], // V
];

#[rustfmt::skip]
const BLOSUM62: [[i8; 20]; 20] = [
//    A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V
    [ 4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0], // A
    [-1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3], // R
    [-2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3], // N
    [-2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3], // D
    [ 0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1], // C
    [-1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2], // Q
    [-1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2], // E
    [ 0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3], // G
    [-2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3], // H
    [-1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3], // I
    [-1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1], // L
    [-1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2], // K
    [-1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1], // M
    [-2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1], // F
    [-1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2], // P
    [ 1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2], // S
    [ 0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0], // T
    [-3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3], // W
    [-2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1], // Y
    [ 0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4], // V
];

#[rustfmt::skip]
const BLOSUM80: [[i8; 20]; 20] = [
//    A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V
    [ 7, -3, -3, -3, -1, -2, -2,  0, -3, -3, -3, -1, -2, -4, -1,  2,  0, -5, -4, -1], // A
    [-3,  9, -1, -3, -6,  1, -1, -4,  0, -5, -4,  3, -3, -5, -3, -2, -2, -5, -4, -4], // R
    [-3, -1,  9,  2, -5,  0, -1, -1,  1, -6, -6,  0, -4, -6, -4,  1,  0, -7, -4, -5], // N
    [-3, -3,  2, 10, -7, -1,  2, -3, -2, -7, -7, -2, -6, -6, -3, -1, -2, -8, -6, -6], // D
    [-1, -6, -5, -7, 13, -5, -7, -6, -7, -2, -3, -6, -3, -4, -6, -2, -2, -5, -5, -2], // C
    [-2,  1,  0, -1, -5,  9,  3, -4,  1, -5, -4,  2, -1, -5, -3, -1, -1, -4, -3, -4], // Q
    [-2, -1, -1,  2, -7,  3,  8, -4,  0, -6, -6,  1, -4, -6, -2,  0, -2, -6, -5, -4], // E
    [ 0, -4, -1, -3, -6, -4, -4,  9, -4, -7, -7, -3, -5, -6, -5, -1, -3, -6, -6, -6], // G
    [-3,  0,  1, -2, -7,  1,  0, -4, 12, -6, -5, -1, -4, -2, -4, -2, -3, -4,  3, -5], // H
    [-3, -5, -6, -7, -2, -5, -6, -7, -6,  7,  2, -5,  2, -1, -5, -4, -2, -5, -3,  4], // I
    [-3, -4, -6, -7, -3, -4, -6, -7, -5,  2,  6, -4,  3,  0, -5, -4, -3, -4, -2,  1], // L
    [-1,  3,  0, -2, -6,  2,  1, -3, -1, -5, -4,  8, -3, -5, -2, -1, -1, -6, -4, -4], // K
    [-2, -3, -4, -6, -3, -1, -4, -5, -4,  2,  3, -3,  9, -1, -4, -3, -1, -3, -3,  1], // M
    [-4, -5, -6, -6, -4, -5, -6, -6, -2, -1,  0, -5, -1, 10, -6, -4, -4,  0,  4, -2], // F
    [-1, -3, -4, -3, -6, -3, -2, -5, -4, -5, -5, -2, -4, -6, 12, -2, -3, -7, -6, -4], // P
    [ 2, -2,  1, -1, -2, -1,  0, -1, -2, -4, -4, -1, -3, -4, -2,  7,  2, -6, -3, -3], // S
    [ 0, -2,  0, -2, -2, -1, -2, -3, -3, -2, -3, -1, -1, -4, -3,  2,  8, -5, -3,  0], // T
    [-5, -5, -7, -8, -5, -4, -6, -6, -4, -5, -4, -6, -3,  0, -7, -6, -5, 16,  3, -5], // W
    [-4, -4, -4, -6, -5, -3, -5, -6,  3, -3, -2, -4, -3,  4, -6, -3, -3,  3, 11, -3], // Y
    [-1, -4, -5, -6, -2, -4, -4, -6, -5,  4,  1, -4,  1, -2, -4, -3,  0, -5, -3,  7], // V
];

#[rustfmt::skip]
const PAM250: [[i8; 20]; 20] = [
//    A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V
    [ 2, -2,  0,  0, -2,  0,  0,  1, -1, -1, -2, -1, -1, -3,  1,  1,  1, -6, -3,  0], // A
    [-2,  6,  0, -1, -4,  1, -1, -3,  2, -2, -3,  3,  0, -4,  0,  0, -1,  2, -4, -2], // R
    [ 0,  0,  2,  2, -4,  1,  1,  0,  2, -2, -3,  1, -2, -3,  0,  1,  0, -4, -2, -2], // N
    [ 0, -1,  2,  4, -5,  2,  3,  1,  1, -2, -4,  0, -3, -6, -1,  0,  0, -7, -4, -2], // D
    [-2, -4, -4, -5, 12, -5, -5, -3, -3, -2, -6, -5, -5, -4, -3,  0, -2, -8,  0, -2], // C
    [ 0,  1,  1,  2, -5,  4,  2, -1,  3, -2, -2,  1, -1, -5,  0, -1, -1, -5, -4, -2], // Q
    [ 0, -1,  1,  3, -5,  2,  4,  0,  1, -2, -3,  0, -2, -5, -1,  0,  0, -7, -4, -2], // E
    [ 1, -3,  0,  1, -3, -1,  0,  5, -2, -3, -4, -2, -3, -5,  0,  1,  0, -7, -5, -1], // G
    [-1,  2,  2,  1, -3,  3,  1, -2,  6, -2, -2,  0, -2, -2,  0, -1, -1, -3,  0, -2], // H
    [-1, -2, -2, -2, -2, -2, -2, -3, -2,  5,  2, -2,  2,  1, -2, -1,  0, -5, -1,  4], // I
    [-2, -3, -3, -4, -6, -2, -3, -4, -2,  2,  6, -3,  4,  2, -3, -3, -2, -2, -1,  2], // L
    [-1,  3,  1,  0, -5,  1,  0, -2,  0, -2, -3,  5,  0, -5, -1,  0,  0, -3, -4, -2], // K
    [-1,  0, -2, -3, -5, -1, -2, -3, -2,  2,  4,  0,  6,  0, -2, -2, -1, -4, -2,  2], // M
    [-3, -4, -3, -6, -4, -5, -5, -5, -2,  1,  2, -5,  0,  9, -5, -3, -3,  0,  7, -1], // F
    [ 1,  0,  0, -1, -3,  0, -1,  0,  0, -2, -3, -1, -2, -5,  6,  1,  0, -6, -5, -1], // P
    [ 1,  0,  1,  0,  0, -1,  0,  1, -1, -1, -3,  0, -2, -3,  1,  2,  1, -2, -3, -1], // S
    [ 1, -1,  0,  0, -2, -1,  0,  0, -1,  0, -2,  0, -1, -3,  0,  1,  3, -5, -3,  0], // T
    [-6,  2, -4, -7, -8, -5, -7, -7, -3, -5, -2, -3, -4,  0, -6, -2, -5, 17,  0, -6], // W
    [-3, -4, -2, -4,  0, -4, -4, -5,  0, -1, -1, -4, -2,  7, -5, -3, -3,  0, 10, -2], // Y
    [ 0, -2, -2, -2, -2, -2, -2, -1, -2,  4,  2, -2,  2, -1, -1, -1,  0, -6, -2,  4], // V
];
