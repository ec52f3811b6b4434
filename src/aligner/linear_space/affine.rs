//! Three-state divide and conquer for affine gap costs (Myers & Miller).
//!
//! The optimal path is split at the move that enters the middle row. A
//! subproblem knows the move preceding its top-left corner and the move
//! following its bottom-right corner, so a gap running across the split is
//! charged a single opening cost.

use tracing::trace;

use crate::aligner::dp;
use crate::aligner::dp::affine::{AffineCell, AlignState};
use crate::aligner::linear_space::{affine_scan, Oriented, SeqView};
use crate::aligner::scoring::{GapCosts, ScoringModel};
use crate::aligner::traceback::{score_path, Move};
use crate::aligner::{AlignmentSpan, RawAlignment};

/// The move entering the split cell `(k, j)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Crossing {
    Diagonal,
    Vertical,
    Horizontal,
}

/// Find the best column and entering move for the split row, given the last
/// row of the forward scan and of the reversed scan.
///
/// The lower half continues a gap of the same type at no opening cost, and
/// can't start with a gap of the other type. Ties prefer the first column,
/// then diagonal, vertical and horizontal in turn.
fn best_crossing<G: GapCosts>(forward: &[AffineCell], backward: &[AffineCell], gaps: &G) -> (f64, usize, Crossing) {
    let n = forward.len() - 1;
    let adjust = gaps.gap_open() - gaps.gap_extend();

    let mut best = (f64::NEG_INFINITY, 0, Crossing::Diagonal);
    for j in 0..=n {
        let (f, b) = (&forward[j], &backward[n - j]);

        let candidates = [
            (f.d + b.best().0, Crossing::Diagonal),
            (f.g + b.d.max(b.g + adjust), Crossing::Vertical),
            (f.i + b.d.max(b.i + adjust), Crossing::Horizontal),
        ];

        for (total, crossing) in candidates {
            if total > best.0 {
                best = (total, j, crossing);
            }
        }
    }

    best
}

struct MyersMiller<'a, G> {
    rows: &'a [u8],
    cols: &'a [u8],
    scoring: &'a ScoringModel,
    gaps: &'a G,
    moves: Vec<Move>,
}

impl<'a, G: GapCosts> MyersMiller<'a, G> {
    fn new(rows: &'a [u8], cols: &'a [u8], scoring: &'a ScoringModel, gaps: &'a G) -> Self {
        Self {
            rows,
            cols,
            scoring,
            gaps,
            moves: Vec::with_capacity(rows.len() + cols.len()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn solve(&mut self, i0: usize, i1: usize, j0: usize, j1: usize, entry: AlignState, exit: AlignState, depth: usize) {
        let cols = &self.cols[j0..j1];

        if i1 - i0 < 2 || cols.is_empty() {
            let raw = dp::affine::align_quadratic(&self.rows[i0..i1], cols, self.scoring, self.gaps,
                AlignmentSpan::Global, entry, exit);
            self.moves.extend(raw.moves);
            return;
        }

        let k = i0 + (i1 - i0) / 2;

        let forward = affine_scan(SeqView::forward(&self.rows[i0..k]), SeqView::forward(cols),
            self.scoring, self.gaps, entry, false);
        let backward = affine_scan(SeqView::reversed(&self.rows[k..i1]), SeqView::reversed(cols),
            self.scoring, self.gaps, exit, false);

        let (score, j, crossing) = best_crossing(&forward.last_row, &backward.last_row, self.gaps);
        let jm = j0 + j;

        trace!(depth, rows = i1 - i0, cols = j1 - j0, score, ?entry, ?exit, ?crossing, "Split at ({k}, {jm})");

        match crossing {
            Crossing::Diagonal => {
                self.solve(i0, k - 1, j0, jm - 1, entry, AlignState::Match, depth + 1);
                self.moves.push(Move::Diagonal);
                self.solve(k, i1, jm, j1, AlignState::Match, exit, depth + 1);
            },
            Crossing::Vertical => {
                self.solve(i0, k - 1, j0, jm, entry, AlignState::Deletion, depth + 1);
                self.moves.push(Move::Up);
                self.solve(k, i1, jm, j1, AlignState::Deletion, exit, depth + 1);
            },
            Crossing::Horizontal => {
                self.solve(i0, k, j0, jm - 1, entry, AlignState::Insertion, depth + 1);
                self.moves.push(Move::Left);
                self.solve(k, i1, jm, j1, AlignState::Insertion, exit, depth + 1);
            },
        }
    }
}

/// Linear space alignment with affine gap costs. The returned score is that
/// of the reconstructed path.
pub(crate) fn align_linear_space<G: GapCosts>(
    seq1: &[u8],
    seq2: &[u8],
    scoring: &ScoringModel,
    gaps: &G,
    span: AlignmentSpan,
) -> RawAlignment {
    let pair = Oriented::new(seq1, seq2);

    let (start, end) = match span {
        AlignmentSpan::Global => ((0, 0), (pair.rows.len(), pair.cols.len())),
        AlignmentSpan::Local => {
            let located = affine_scan(SeqView::forward(pair.rows), SeqView::forward(pair.cols),
                scoring, gaps, AlignState::Match, true);

            let (score, ie, je) = located.best;
            if score <= 0.0 {
                return RawAlignment::empty()
            }

            let anchored = affine_scan(SeqView::reversed(&pair.rows[..ie]), SeqView::reversed(&pair.cols[..je]),
                scoring, gaps, AlignState::Match, false);
            let (_, a, b) = anchored.best;

            trace!(score, "Local alignment spans ({}, {}) to ({ie}, {je})", ie - a, je - b);

            ((ie - a, je - b), (ie, je))
        }
    };

    let mut solver = MyersMiller::new(pair.rows, pair.cols, scoring, gaps);
    solver.solve(start.0, end.0, start.1, end.1, AlignState::Match, AlignState::Match, 0);

    let score = score_path(pair.rows, pair.cols, start, &solver.moves, scoring, gaps);

    pair.restore(RawAlignment { start, moves: solver.moves, score })
}
