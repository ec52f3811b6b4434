//! Divide and conquer alignment in memory proportional to the shorter sequence.
//!
//! The longer sequence always forms the rows. A subproblem is split at its
//! middle row, where a forward scan over the upper half and a scan over the
//! reversed lower half meet. Only a single DP row is kept per scan; full
//! matrices are filled only for subproblems of less than two rows.

use crate::aligner::dp::affine::{affine_first_col_step, affine_first_row_step, affine_step, AffineCell, AlignState};
use crate::aligner::dp::linear::linear_step;
use crate::aligner::scoring::{GapCosts, ScoringModel};
use crate::aligner::RawAlignment;

pub mod affine;
pub mod linear;

/// A sequence read forwards or backwards without copying.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SeqView<'a> {
    residues: &'a [u8],
    reversed: bool,
}

impl<'a> SeqView<'a> {
    pub fn forward(residues: &'a [u8]) -> Self {
        Self { residues, reversed: false }
    }

    pub fn reversed(residues: &'a [u8]) -> Self {
        Self { residues, reversed: true }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    #[inline(always)]
    pub fn get(&self, ix: usize) -> u8 {
        if self.reversed {
            self.residues[self.residues.len() - 1 - ix]
        } else {
            self.residues[ix]
        }
    }
}

/// Result of a score-only pass over a grid.
pub(crate) struct Scan<C> {
    /// Scores of the final row
    pub last_row: Vec<C>,

    /// Maximum score over all inner cells `(r, c)` with `r, c >= 1`, first in
    /// row-major order
    pub best: (f64, usize, usize),
}

/// Score-only linear gap DP. Without `restart`, the path starts at the grid origin.
pub(crate) fn linear_scan(
    rows: SeqView,
    cols: SeqView,
    scoring: &ScoringModel,
    gap: f64,
    restart: bool,
) -> Scan<f64> {
    let n = cols.len();
    let mut row: Vec<f64> = if restart {
        vec![0.0; n + 1]
    } else {
        (0..=n).map(|j| -(j as f64) * gap).collect()
    };

    let mut best = (f64::NEG_INFINITY, 0, 0);

    for r in 1..=rows.len() {
        let a = rows.get(r - 1);
        let mut diag = row[0];
        row[0] = if restart { 0.0 } else { -(r as f64) * gap };

        for j in 1..=n {
            let up = row[j];
            let (score, _) = linear_step(diag, up, row[j - 1], scoring.score(a, cols.get(j - 1)), gap, restart);

            diag = up;
            row[j] = score;

            if score > best.0 {
                best = (score, r, j);
            }
        }
    }

    Scan { last_row: row, best }
}

/// Score-only affine DP, the best value is tracked in layer D.
///
/// Without `restart`, the path enters the grid origin in state `entry`.
pub(crate) fn affine_scan<G: GapCosts>(
    rows: SeqView,
    cols: SeqView,
    scoring: &ScoringModel,
    gaps: &G,
    entry: AlignState,
    restart: bool,
) -> Scan<AffineCell> {
    let n = cols.len();
    let mut row = vec![AffineCell::UNREACHABLE; n + 1];

    if !restart {
        row[0] = AffineCell::origin(entry);
        for j in 1..=n {
            row[j] = affine_first_row_step(&row[j - 1], gaps).0;
        }
    }

    let mut best = (f64::NEG_INFINITY, 0, 0);

    for r in 1..=rows.len() {
        let a = rows.get(r - 1);
        let mut diag = row[0];
        if !restart {
            row[0] = affine_first_col_step(&diag, gaps).0;
        }

        for j in 1..=n {
            let up = row[j];
            let (cell, _) = affine_step(&diag, &up, &row[j - 1], scoring.score(a, cols.get(j - 1)), gaps, restart);

            diag = up;
            row[j] = cell;

            if cell.d > best.0 {
                best = (cell.d, r, j);
            }
        }
    }

    Scan { last_row: row, best }
}

/// The pair of sequences with the longer one as rows.
pub(crate) struct Oriented<'a> {
    pub rows: &'a [u8],
    pub cols: &'a [u8],
    pub transposed: bool,
}

impl<'a> Oriented<'a> {
    pub fn new(seq1: &'a [u8], seq2: &'a [u8]) -> Self {
        if seq2.len() > seq1.len() {
            Self { rows: seq2, cols: seq1, transposed: true }
        } else {
            Self { rows: seq1, cols: seq2, transposed: false }
        }
    }

    /// Map an alignment of the oriented pair back to the caller's order.
    pub fn restore(&self, raw: RawAlignment) -> RawAlignment {
        if !self.transposed {
            return raw
        }

        RawAlignment {
            start: (raw.start.1, raw.start.0),
            moves: raw.moves.iter().map(|m| m.transposed()).collect(),
            score: raw.score,
        }
    }
}

/// First column maximising `forward[j] + backward[n - j]`.
pub(crate) fn best_crossing(forward: &[f64], backward: &[f64]) -> (f64, usize) {
    let n = forward.len() - 1;

    let mut best = (f64::NEG_INFINITY, 0);
    for j in 0..=n {
        let total = forward[j] + backward[n - j];
        if total > best.0 {
            best = (total, j);
        }
    }

    best
}
