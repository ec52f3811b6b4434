//! Hirschberg's algorithm for linear gap costs.

use tracing::trace;

use crate::aligner::dp;
use crate::aligner::linear_space::{best_crossing, linear_scan, Oriented, SeqView};
use crate::aligner::scoring::{GapCosts, ScoringModel};
use crate::aligner::traceback::{score_path, Move};
use crate::aligner::{AlignmentSpan, RawAlignment};

struct Hirschberg<'a> {
    rows: &'a [u8],
    cols: &'a [u8],
    scoring: &'a ScoringModel,
    gap: f64,
    moves: Vec<Move>,
}

impl<'a> Hirschberg<'a> {
    fn new(rows: &'a [u8], cols: &'a [u8], scoring: &'a ScoringModel, gap: f64) -> Self {
        Self {
            rows,
            cols,
            scoring,
            gap,
            moves: Vec::with_capacity(rows.len() + cols.len()),
        }
    }

    /// Append the moves of an optimal global alignment of the box
    /// `rows[i0..i1]` x `cols[j0..j1]`.
    fn solve(&mut self, i0: usize, i1: usize, j0: usize, j1: usize, depth: usize) {
        let cols = &self.cols[j0..j1];

        if i1 - i0 < 2 || cols.is_empty() {
            let raw = dp::linear::align_quadratic(&self.rows[i0..i1], cols, self.scoring, self.gap,
                AlignmentSpan::Global);
            self.moves.extend(raw.moves);
            return;
        }

        let k = i0 + (i1 - i0) / 2;

        let forward = linear_scan(SeqView::forward(&self.rows[i0..k]), SeqView::forward(cols),
            self.scoring, self.gap, false);
        let backward = linear_scan(SeqView::reversed(&self.rows[k..i1]), SeqView::reversed(cols),
            self.scoring, self.gap, false);

        let (score, j) = best_crossing(&forward.last_row, &backward.last_row);
        let jm = j0 + j;

        trace!(depth, rows = i1 - i0, cols = j1 - j0, score, "Split at ({k}, {jm})");

        self.solve(i0, k, j0, jm, depth + 1);
        self.solve(k, i1, jm, j1, depth + 1);
    }
}

/// Linear space alignment with linear gap costs.
///
/// `gaps` must have equal opening and extension costs. The returned score is
/// that of the reconstructed path.
pub(crate) fn align_linear_space<G: GapCosts>(
    seq1: &[u8],
    seq2: &[u8],
    scoring: &ScoringModel,
    gaps: &G,
    span: AlignmentSpan,
) -> RawAlignment {
    let pair = Oriented::new(seq1, seq2);
    let gap = gaps.gap_extend();

    let (start, end) = match span {
        AlignmentSpan::Global => ((0, 0), (pair.rows.len(), pair.cols.len())),
        AlignmentSpan::Local => {
            let located = linear_scan(SeqView::forward(pair.rows), SeqView::forward(pair.cols),
                scoring, gap, true);

            let (score, ie, je) = located.best;
            if score <= 0.0 {
                return RawAlignment::empty()
            }

            // Anchored at the end cell, the best cell of the reversed prefix
            // marks where the local alignment starts.
            let anchored = linear_scan(SeqView::reversed(&pair.rows[..ie]), SeqView::reversed(&pair.cols[..je]),
                scoring, gap, false);
            let (_, a, b) = anchored.best;

            trace!(score, "Local alignment spans ({}, {}) to ({ie}, {je})", ie - a, je - b);

            ((ie - a, je - b), (ie, je))
        }
    };

    let mut solver = Hirschberg::new(pair.rows, pair.cols, scoring, gap);
    solver.solve(start.0, end.0, start.1, end.1, 0);

    let score = score_path(pair.rows, pair.cols, start, &solver.moves, scoring, gaps);

    pair.restore(RawAlignment { start, moves: solver.moves, score })
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;

    use super::*;
    use crate::aligner::scoring::{GapLinear, ScoringModelSpec};

    fn random_seq(rng: &mut StdRng, alphabet: &[u8], max_len: usize) -> Vec<u8> {
        let len = rng.gen_range(0..=max_len);
        (0..len).map(|_| *alphabet.choose(rng).unwrap()).collect()
    }

    fn unit_scoring() -> ScoringModel {
        ScoringModelSpec::MatchMismatch { match_score: 1.0, mismatch_score: -1.0 }
            .build()
            .unwrap()
    }

    #[test]
    fn test_golden_gattaca() {
        let gaps = GapLinear::new(1.0).unwrap();
        let raw = align_linear_space(b"GATTACA", b"GCATGCU", &unit_scoring(), &gaps, AlignmentSpan::Global);

        assert_eq!(raw.score, 0.0);
        assert_eq!(raw.start, (0, 0));
        assert_eq!(raw.moves.iter().filter(|m| **m != Move::Up).count(), 7);
        assert_eq!(raw.moves.iter().filter(|m| **m != Move::Left).count(), 7);
    }

    #[test]
    fn test_empty_and_single() {
        let scoring = unit_scoring();
        let gaps = GapLinear::new(2.0).unwrap();

        let raw = align_linear_space(b"", b"ACG", &scoring, &gaps, AlignmentSpan::Global);
        assert_eq!(raw.score, -6.0);
        assert_eq!(raw.moves, vec![Move::Left; 3]);

        let raw = align_linear_space(b"ACGTT", b"", &scoring, &gaps, AlignmentSpan::Global);
        assert_eq!(raw.score, -10.0);
        assert_eq!(raw.moves, vec![Move::Up; 5]);

        let raw = align_linear_space(b"G", b"AAGAA", &scoring, &gaps, AlignmentSpan::Global);
        assert_eq!(raw.score, 1.0 - 8.0);

        let raw = align_linear_space(b"", b"", &scoring, &gaps, AlignmentSpan::Local);
        assert_eq!(raw.score, 0.0);
        assert!(raw.moves.is_empty());
    }

    #[test]
    fn test_local() {
        let scoring = unit_scoring();
        let gaps = GapLinear::new(2.0).unwrap();

        let raw = align_linear_space(b"TTTACGTTT", b"GGACGGG", &scoring, &gaps, AlignmentSpan::Local);
        assert_eq!(raw.score, 3.0);
        assert_eq!(raw.start, (3, 2));
        assert_eq!(raw.moves, vec![Move::Diagonal; 3]);

        // Transposed
        let raw = align_linear_space(b"GGACGGG", b"TTTTTACGTTT", &scoring, &gaps, AlignmentSpan::Local);
        assert_eq!(raw.score, 3.0);
        assert_eq!(raw.start, (2, 5));
    }

    #[test]
    fn test_random_matches_quadratic() {
        let mut rng = StdRng::seed_from_u64(42);
        let nucleotide = ScoringModelSpec::MatchMismatch { match_score: 2.0, mismatch_score: -3.0 }
            .build()
            .unwrap();
        let protein = ScoringModelSpec::Blosum62.build().unwrap();

        for _ in 0..200 {
            let (scoring, alphabet) = if rng.gen_bool(0.5) {
                (&nucleotide, &b"ACGT"[..])
            } else {
                (&protein, &b"ARNDCQEGHILKMFPSTWYV"[..])
            };

            let s1 = random_seq(&mut rng, alphabet, 40);
            let s2 = random_seq(&mut rng, alphabet, 40);
            let gaps = GapLinear::new(rng.gen_range(1..=6) as f64).unwrap();

            for span in [AlignmentSpan::Global, AlignmentSpan::Local] {
                let quadratic = dp::linear::align_quadratic(&s1, &s2, scoring, gaps.gap_extend(), span);
                let linear = align_linear_space(&s1, &s2, scoring, &gaps, span);

                assert_eq!(linear.score, quadratic.score, "{span:?} {:?} {:?}",
                    String::from_utf8_lossy(&s1), String::from_utf8_lossy(&s2));

                for raw in [&quadratic, &linear] {
                    let rescored = score_path(&s1, &s2, raw.start, &raw.moves, scoring, &gaps);
                    assert_eq!(rescored, raw.score, "{span:?} {:?} {:?}",
                        String::from_utf8_lossy(&s1), String::from_utf8_lossy(&s2));
                }
            }
        }
    }
}
