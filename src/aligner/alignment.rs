use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::aligner::scoring::GapKind;

/// Which part of the sequences participates in the alignment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignmentSpan {
    /// Both sequences end-to-end (Needleman-Wunsch)
    #[default]
    Global,

    /// The best scoring pair of substrings (Smith-Waterman)
    Local,
}

/// Memory strategy of the alignment engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceMode {
    /// Full DP matrix
    #[default]
    Quadratic,

    /// Divide and conquer, memory proportional to the shorter sequence
    Linear,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignmentMode {
    pub span: AlignmentSpan,
    pub gap: GapKind,
    pub space: SpaceMode,
}

impl AlignmentMode {
    pub fn new(span: AlignmentSpan, gap: GapKind, space: SpaceMode) -> Self {
        Self { span, gap, space }
    }
}

impl Display for AlignmentMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let span = match self.span {
            AlignmentSpan::Global => "global",
            AlignmentSpan::Local => "local",
        };
        let gap = match self.gap {
            GapKind::Linear => "linear gaps",
            GapKind::Affine => "affine gaps",
        };
        let space = match self.space {
            SpaceMode::Quadratic => "quadratic space",
            SpaceMode::Linear => "linear space",
        };

        write!(f, "{span}, {gap}, {space}")
    }
}

/// A single alignment column. Positions are 0-based indices into the sequences.
///
/// In case of an insertion or deletion, one of the elements is `None`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlignedPair {
    pub pos1: Option<usize>,
    pub pos2: Option<usize>,
}

impl AlignedPair {
    pub fn new(pos1: Option<usize>, pos2: Option<usize>) -> Self {
        Self { pos1, pos2 }
    }

    pub fn is_aligned(&self) -> bool {
        matches!((self.pos1, self.pos2), (Some(_), Some(_)))
    }

    pub fn is_indel(&self) -> bool {
        !self.is_aligned()
    }
}

/// An optimal pairwise alignment.
///
/// Grid coordinates are `(i, j)` with `i` counting residues of sequence 1 and
/// `j` residues of sequence 2 consumed so far. The path runs from `start` to
/// `end` and is empty for an empty local alignment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    aligned1: String,
    aligned2: String,
    score: f64,
    mode: AlignmentMode,
    start: (usize, usize),
    end: (usize, usize),
    path: Vec<(usize, usize)>,
}

impl AlignmentResult {
    pub(crate) fn new(
        aligned1: String,
        aligned2: String,
        score: f64,
        mode: AlignmentMode,
        start: (usize, usize),
        end: (usize, usize),
        path: Vec<(usize, usize)>,
    ) -> Self {
        Self { aligned1, aligned2, score, mode, start, end, path }
    }

    /// Sequence 1 with `-` at gap columns
    pub fn aligned1(&self) -> &str {
        &self.aligned1
    }

    /// Sequence 2 with `-` at gap columns
    pub fn aligned2(&self) -> &str {
        &self.aligned2
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    pub fn start(&self) -> (usize, usize) {
        self.start
    }

    pub fn end(&self) -> (usize, usize) {
        self.end
    }

    pub fn path(&self) -> &[(usize, usize)] {
        &self.path
    }

    /// Number of alignment columns
    pub fn len(&self) -> usize {
        self.aligned1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned1.is_empty()
    }

    /// The alignment as residue position pairs.
    pub fn aligned_pairs(&self) -> Vec<AlignedPair> {
        self.path.windows(2)
            .map(|w| {
                let ((i0, j0), (i1, j1)) = (w[0], w[1]);
                AlignedPair::new((i1 > i0).then_some(i0), (j1 > j0).then_some(j0))
            })
            .collect()
    }

    /// Columns with the same residue on both sides, ignoring case.
    pub fn num_identical(&self) -> usize {
        self.aligned1.bytes()
            .zip(self.aligned2.bytes())
            .filter(|(a, b)| *a != b'-' && a.eq_ignore_ascii_case(b))
            .count()
    }

    pub fn num_gap_columns(&self) -> usize {
        self.aligned1.bytes()
            .zip(self.aligned2.bytes())
            .filter(|(a, b)| *a == b'-' || *b == b'-')
            .count()
    }

    /// Fraction of identical columns, 0 for an empty alignment.
    pub fn identity(&self) -> f64 {
        if self.is_empty() {
            return 0.0
        }

        self.num_identical() as f64 / self.len() as f64
    }
}

impl Display for AlignmentResult {
    /// Three line view: sequence 1, a match line (`|` identical, `*` mismatch), sequence 2.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let match_line: String = self.aligned1.bytes()
            .zip(self.aligned2.bytes())
            .map(|(a, b)| match (a, b) {
                (b'-', _) | (_, b'-') => ' ',
                (a, b) if a.eq_ignore_ascii_case(&b) => '|',
                _ => '*',
            })
            .collect();

        write!(f, "{}\n{}\n{}", self.aligned1, match_line, self.aligned2)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn gattaca() -> AlignmentResult {
        let path = vec![(0, 0), (1, 1), (1, 2), (2, 3), (3, 3), (4, 4), (5, 5), (6, 6), (7, 7)];
        AlignmentResult::new("G-ATTACA".into(), "GCA-TGCU".into(), 0.0,
            AlignmentMode::default(), (0, 0), (7, 7), path)
    }

    #[test]
    fn test_display() {
        assert_eq!(gattaca().to_string(), "G-ATTACA\n| | |*|*\nGCA-TGCU");
    }

    #[test]
    fn test_counts() {
        let aln = gattaca();
        assert_eq!(aln.len(), 8);
        assert_eq!(aln.num_identical(), 4);
        assert_eq!(aln.num_gap_columns(), 2);
        assert_eq!(aln.identity(), 0.5);
    }

    #[test]
    fn test_aligned_pairs() {
        let pairs = gattaca().aligned_pairs();
        assert_eq!(pairs.len(), 8);
        assert_eq!(pairs[0], AlignedPair::new(Some(0), Some(0)));
        assert_eq!(pairs[1], AlignedPair::new(None, Some(1)));
        assert!(pairs[1].is_indel());
        assert_eq!(pairs[3], AlignedPair::new(Some(2), None));
        assert!(pairs[7].is_aligned());
    }

    #[test]
    fn test_mode_display() {
        let mode = AlignmentMode::new(AlignmentSpan::Local, GapKind::Affine, SpaceMode::Linear);
        assert_eq!(mode.to_string(), "local, affine gaps, linear space");
    }

    #[test]
    fn test_mode_as_key() {
        let modes: HashSet<AlignmentMode> = [
            AlignmentMode::new(AlignmentSpan::Local, GapKind::Affine, SpaceMode::Linear),
            AlignmentMode::new(AlignmentSpan::Local, GapKind::Linear, SpaceMode::Linear),
            AlignmentMode::new(AlignmentSpan::Local, GapKind::Affine, SpaceMode::Linear),
            AlignmentMode::default(),
        ].into_iter().collect();

        assert_eq!(modes.len(), 3);
        assert!(modes.contains(&AlignmentMode::new(AlignmentSpan::Global, GapKind::Linear, SpaceMode::Quadratic)));
    }
}
