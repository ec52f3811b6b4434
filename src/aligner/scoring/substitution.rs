use crate::errors::AlignError;
use crate::sequence::Alphabet;

const NO_SYMBOL: u8 = u8::MAX;

/// Substitution scores for every pair of symbols of an alphabet.
///
/// Scores between canonical states come from a table or a formula. Scores
/// involving an ambiguity code are the arithmetic mean over all canonical
/// states both symbols stand for. The model is symmetric and immutable, so a
/// single instance can be shared between alignment threads.
#[derive(Clone, Debug)]
pub struct ScoringModel {
    name: String,
    alphabet: Alphabet,

    /// Maps a raw byte (either case) to its row in `scores`
    lookup: [u8; 256],
    dim: usize,
    scores: Vec<f64>,
}

impl ScoringModel {
    /// Build a model from a scoring function over canonical states.
    ///
    /// The function is evaluated for both orders of every pair, and the two
    /// values are averaged to keep the model symmetric.
    pub fn from_fn<F>(name: impl Into<String>, alphabet: Alphabet, f: F) -> Self
    where
        F: Fn(u8, u8) -> f64,
    {
        let canonical = alphabet.canonical();
        let k = canonical.len();

        let mut canonical_scores = vec![0.0; k * k];
        for (ia, &a) in canonical.iter().enumerate() {
            for (ib, &b) in canonical.iter().enumerate() {
                canonical_scores[ia * k + ib] = (f(a, b) + f(b, a)) / 2.0;
            }
        }

        Self::from_canonical_scores(name.into(), alphabet, &canonical_scores)
    }

    fn from_canonical_scores(name: String, alphabet: Alphabet, canonical_scores: &[f64]) -> Self {
        let canonical = alphabet.canonical();
        let k = canonical.len();
        let symbols = alphabet.symbols();
        let dim = symbols.len();

        let canonical_ix = |c: u8| canonical.iter().position(|v| *v == c);

        let mut scores = vec![0.0; dim * dim];
        for (ix, &x) in symbols.iter().enumerate() {
            for (iy, &y) in symbols.iter().enumerate() {
                // Every symbol of the alphabet expands to at least one canonical state.
                let xs = alphabet.expand(x).unwrap_or_default();
                let ys = alphabet.expand(y).unwrap_or_default();

                let mut total = 0.0;
                for &a in xs {
                    for &b in ys {
                        if let (Some(ia), Some(ib)) = (canonical_ix(a), canonical_ix(b)) {
                            total += canonical_scores[ia * k + ib];
                        }
                    }
                }

                scores[ix * dim + iy] = total / (xs.len() * ys.len()) as f64;
            }
        }

        let mut lookup = [NO_SYMBOL; 256];
        for byte in 0..=u8::MAX {
            if let Some(normalized) = alphabet.normalize(byte) {
                if let Some(pos) = symbols.iter().position(|s| *s == normalized) {
                    lookup[byte as usize] = pos as u8;
                }
            }
        }

        Self { name, alphabet, lookup, dim, scores }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Substitution score for residues `a` and `b`.
    ///
    /// Symbols outside the alphabet score negative infinity; callers that
    /// accept arbitrary input should go through [`Self::try_score`] or
    /// [`Self::validate`] first.
    #[inline(always)]
    pub fn score(&self, a: u8, b: u8) -> f64 {
        let ia = self.lookup[a as usize];
        let ib = self.lookup[b as usize];

        if ia == NO_SYMBOL || ib == NO_SYMBOL {
            return f64::NEG_INFINITY;
        }

        self.scores[ia as usize * self.dim + ib as usize]
    }

    pub fn try_score(&self, a: u8, b: u8) -> Result<f64, AlignError> {
        for symbol in [a, b] {
            if self.lookup[symbol as usize] == NO_SYMBOL {
                return Err(AlignError::InvalidAlphabet { symbol, alphabet: self.alphabet });
            }
        }

        Ok(self.score(a, b))
    }

    /// Check that every residue has a score in this model.
    pub fn validate(&self, residues: &[u8]) -> Result<(), AlignError> {
        match residues.iter().find(|c| self.lookup[**c as usize] == NO_SYMBOL) {
            Some(&symbol) => Err(AlignError::InvalidAlphabet { symbol, alphabet: self.alphabet }),
            None => Ok(())
        }
    }
}

/// Assemble a scoring model from explicit canonical pair scores.
///
/// Every canonical pair must be given; setting `(a, b)` also sets `(b, a)`.
pub struct ScoringModelBuilder {
    name: String,
    alphabet: Alphabet,
    canonical_scores: Vec<Option<f64>>,
}

impl ScoringModelBuilder {
    pub fn new(name: impl Into<String>, alphabet: Alphabet) -> Self {
        let k = alphabet.canonical().len();

        Self {
            name: name.into(),
            alphabet,
            canonical_scores: vec![None; k * k],
        }
    }

    fn canonical_ix(&self, symbol: u8) -> Result<usize, AlignError> {
        self.alphabet.normalize(symbol)
            .and_then(|s| self.alphabet.canonical().iter().position(|c| *c == s))
            .ok_or(AlignError::InvalidAlphabet { symbol, alphabet: self.alphabet })
    }

    pub fn set(mut self, a: u8, b: u8, score: f64) -> Result<Self, AlignError> {
        let k = self.alphabet.canonical().len();
        let ia = self.canonical_ix(a)?;
        let ib = self.canonical_ix(b)?;

        self.canonical_scores[ia * k + ib] = Some(score);
        self.canonical_scores[ib * k + ia] = Some(score);

        Ok(self)
    }

    pub fn build(self) -> Result<ScoringModel, AlignError> {
        let canonical = self.alphabet.canonical();
        let k = canonical.len();

        let mut scores = Vec::with_capacity(k * k);
        for (ix, value) in self.canonical_scores.iter().enumerate() {
            match value {
                Some(v) => scores.push(*v),
                None => return Err(AlignError::InvalidParameter(format!(
                    "no score given for the pair {}/{}",
                    canonical[ix / k] as char, canonical[ix % k] as char
                ))),
            }
        }

        Ok(ScoringModel::from_canonical_scores(self.name, self.alphabet, &scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition_model() -> ScoringModel {
        // Transitions (A<->G, C<->T) are cheaper than transversions
        ScoringModel::from_fn("test", Alphabet::Nucleotide, |a, b| {
            if a == b {
                2.0
            } else if matches!((a, b), (b'A', b'G') | (b'G', b'A') | (b'C', b'T') | (b'T', b'C')) {
                -1.0
            } else {
                -3.0
            }
        })
    }

    #[test]
    fn test_symmetry() {
        let model = transition_model();
        for &a in Alphabet::Nucleotide.symbols() {
            for &b in Alphabet::Nucleotide.symbols() {
                assert_eq!(model.score(a, b), model.score(b, a));
            }
        }
    }

    #[test]
    fn test_asymmetric_fn_is_averaged() {
        let model = ScoringModel::from_fn("skew", Alphabet::Nucleotide, |a, b| {
            if a == b'A' && b == b'C' { 4.0 } else { 0.0 }
        });

        assert_eq!(model.score(b'A', b'C'), 2.0);
        assert_eq!(model.score(b'C', b'A'), 2.0);
    }

    #[test]
    fn test_case_insensitive() {
        let model = transition_model();
        assert_eq!(model.score(b'a', b'g'), model.score(b'A', b'G'));
        assert_eq!(model.score(b'u', b'T'), 2.0);
    }

    #[test]
    fn test_ambiguity_two_states() {
        let model = transition_model();

        // R = {A, G}
        for &x in b"ACGT" {
            let expected = (model.score(b'A', x) + model.score(b'G', x)) / 2.0;
            assert_eq!(model.score(b'R', x), expected);
        }

        // Exact values: R vs A = (2 + -1) / 2, R vs C = (-3 + -3) / 2
        assert_eq!(model.score(b'R', b'A'), 0.5);
        assert_eq!(model.score(b'R', b'C'), -3.0);

        // R vs Y = mean over {A,G} x {C,T} = all transversions
        assert_eq!(model.score(b'R', b'Y'), -3.0);

        // R vs R = (2 + -1 + -1 + 2) / 4
        assert_eq!(model.score(b'R', b'R'), 0.5);
    }

    #[test]
    fn test_unknown_symbol() {
        let model = transition_model();
        assert_eq!(model.score(b'A', b'E'), f64::NEG_INFINITY);
        assert!(matches!(
            model.try_score(b'E', b'A'),
            Err(AlignError::InvalidAlphabet { symbol: b'E', .. })
        ));
        assert!(model.validate(b"ACGTN").is_ok());
        assert!(model.validate(b"AC-GT").is_err());
    }

    #[test]
    fn test_builder() {
        let mut builder = ScoringModelBuilder::new("custom", Alphabet::Nucleotide);
        for &a in b"ACGT" {
            for &b in b"ACGT" {
                builder = builder.set(a, b, if a == b { 5.0 } else { -4.0 }).unwrap();
            }
        }
        let model = builder.build().unwrap();

        assert_eq!(model.score(b'C', b'C'), 5.0);
        assert_eq!(model.score(b'C', b'G'), -4.0);
        assert_eq!(model.name(), "custom");
    }

    #[test]
    fn test_builder_rejects_ambiguity_and_missing() {
        let result = ScoringModelBuilder::new("custom", Alphabet::Nucleotide)
            .set(b'N', b'A', 1.0);
        assert!(matches!(result, Err(AlignError::InvalidAlphabet { symbol: b'N', .. })));

        let result = ScoringModelBuilder::new("custom", Alphabet::Nucleotide)
            .set(b'A', b'A', 1.0)
            .and_then(|b| b.build());
        assert!(matches!(result, Err(AlignError::InvalidParameter(_))));
    }
}
