//! Three layer (Gotoh) dynamic programming for affine gap costs.
//!
//! Layer D holds alignments ending in a (mis)match, layer I alignments ending
//! with a residue of sequence 2 against a gap (a horizontal move), and layer G
//! alignments ending with a residue of sequence 1 against a gap (a vertical
//! move). A gap is only opened after a (mis)match, so a gap in one sequence
//! never directly follows a gap in the other.

use crate::aligner::scoring::{GapCosts, ScoringModel};
use crate::aligner::traceback::Move;
use crate::aligner::{AlignmentSpan, RawAlignment};

/// Which layer an alignment path is in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AlignState {
    /// Local alignment restart, the path has no predecessor
    #[default]
    Start,

    /// Layer D: ends in a (mis)match
    Match,

    /// Layer I: residue of sequence 2 against a gap
    Insertion,

    /// Layer G: residue of sequence 1 against a gap
    Deletion,
}

/// Scores of the three layers for a single cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AffineCell {
    pub d: f64,
    pub i: f64,
    pub g: f64,
}

impl AffineCell {
    pub const UNREACHABLE: Self = Self { d: f64::NEG_INFINITY, i: f64::NEG_INFINITY, g: f64::NEG_INFINITY };

    /// Grid origin for a path entering in `state`.
    pub fn origin(state: AlignState) -> Self {
        let mut cell = Self::UNREACHABLE;
        match state {
            AlignState::Start | AlignState::Match => cell.d = 0.0,
            AlignState::Insertion => cell.i = 0.0,
            AlignState::Deletion => cell.g = 0.0,
        }

        cell
    }

    /// Best layer of this cell, ties prefer D, then G, then I.
    #[inline]
    pub fn best(&self) -> (f64, AlignState) {
        let mut best = (self.d, AlignState::Match);
        if self.g > best.0 {
            best = (self.g, AlignState::Deletion);
        }
        if self.i > best.0 {
            best = (self.i, AlignState::Insertion);
        }

        best
    }

    /// Best layer when the path leaves the grid in `exit`. A gap that continues
    /// past the grid has already paid its opening cost, and a gap of the other
    /// kind can't be followed by it.
    pub fn best_with_exit(&self, exit: AlignState, open: f64, extend: f64) -> (f64, AlignState) {
        let mut cell = *self;
        match exit {
            AlignState::Insertion => {
                cell.i += open - extend;
                cell.g = f64::NEG_INFINITY;
            },
            AlignState::Deletion => {
                cell.g += open - extend;
                cell.i = f64::NEG_INFINITY;
            },
            AlignState::Start | AlignState::Match => (),
        }

        cell.best()
    }
}

/// Predecessor state of each layer of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AffineTrace {
    pub d: AlignState,
    pub i: AlignState,
    pub g: AlignState,
}

#[inline(always)]
fn gap_step(extend_from: f64, open_from: f64, self_state: AlignState, open: f64, extend: f64) -> (f64, AlignState) {
    let extended = extend_from - extend;
    let opened = open_from - open;

    if opened > extended {
        (opened, AlignState::Match)
    } else {
        (extended, self_state)
    }
}

/// Compute a cell from its diagonal, upper and left neighbours.
///
/// Gap layers prefer extending over opening from D. With `restart`, layer D may begin a new local alignment
/// at zero, which wins ties.
#[inline(always)]
pub(crate) fn affine_step<G: GapCosts>(
    diag: &AffineCell,
    up: &AffineCell,
    left: &AffineCell,
    substitution: f64,
    gaps: &G,
    restart: bool,
) -> (AffineCell, AffineTrace) {
    let open = gaps.gap_open();
    let extend = gaps.gap_extend();

    let (mut d_prev, mut d_from) = diag.best();
    if restart && d_prev <= 0.0 {
        d_prev = 0.0;
        d_from = AlignState::Start;
    }

    let (g, g_from) = gap_step(up.g, up.d, AlignState::Deletion, open, extend);
    let (i, i_from) = gap_step(left.i, left.d, AlignState::Insertion, open, extend);

    (
        AffineCell { d: d_prev + substitution, i, g },
        AffineTrace { d: d_from, i: i_from, g: g_from },
    )
}

/// Fill the first row of a grid. Only layer I is reachable.
#[inline]
pub(crate) fn affine_first_row_step<G: GapCosts>(left: &AffineCell, gaps: &G) -> (AffineCell, AffineTrace) {
    let (i, i_from) = gap_step(left.i, left.d, AlignState::Insertion, gaps.gap_open(), gaps.gap_extend());

    (
        AffineCell { i, ..AffineCell::UNREACHABLE },
        AffineTrace { i: i_from, ..AffineTrace::default() },
    )
}

/// Fill the first column of a grid. Only layer G is reachable.
#[inline]
pub(crate) fn affine_first_col_step<G: GapCosts>(up: &AffineCell, gaps: &G) -> (AffineCell, AffineTrace) {
    let (g, g_from) = gap_step(up.g, up.d, AlignState::Deletion, gaps.gap_open(), gaps.gap_extend());

    (
        AffineCell { g, ..AffineCell::UNREACHABLE },
        AffineTrace { g: g_from, ..AffineTrace::default() },
    )
}

pub(crate) struct AffineMatrix {
    cols: usize,
    cells: Vec<AffineCell>,
    traces: Vec<AffineTrace>,
}

impl AffineMatrix {
    /// Fill all three layers. In global mode the path enters the grid origin
    /// in state `entry`; local mode ignores it.
    pub fn fill<G: GapCosts>(
        seq1: &[u8],
        seq2: &[u8],
        scoring: &ScoringModel,
        gaps: &G,
        span: AlignmentSpan,
        entry: AlignState,
    ) -> Self {
        let rows = seq1.len() + 1;
        let cols = seq2.len() + 1;
        let restart = span == AlignmentSpan::Local;

        let mut cells = vec![AffineCell::UNREACHABLE; rows * cols];
        let mut traces = vec![AffineTrace::default(); rows * cols];

        if !restart {
            cells[0] = AffineCell::origin(entry);

            for j in 1..cols {
                (cells[j], traces[j]) = affine_first_row_step(&cells[j - 1], gaps);
            }
            for i in 1..rows {
                (cells[i * cols], traces[i * cols]) = affine_first_col_step(&cells[(i - 1) * cols], gaps);
            }
        }

        for i in 1..rows {
            let a = seq1[i - 1];
            for j in 1..cols {
                let (cell, trace) = affine_step(
                    &cells[(i - 1) * cols + j - 1],
                    &cells[(i - 1) * cols + j],
                    &cells[i * cols + j - 1],
                    scoring.score(a, seq2[j - 1]),
                    gaps,
                    restart,
                );

                cells[i * cols + j] = cell;
                traces[i * cols + j] = trace;
            }
        }

        Self { cols, cells, traces }
    }

    #[inline]
    pub fn cell(&self, i: usize, j: usize) -> &AffineCell {
        &self.cells[i * self.cols + j]
    }

    #[inline]
    fn trace(&self, i: usize, j: usize) -> &AffineTrace {
        &self.traces[i * self.cols + j]
    }

    /// First cell in row-major order with the maximum layer D score.
    pub fn max_match_cell(&self) -> (f64, usize, usize) {
        let mut best = (f64::NEG_INFINITY, 0, 0);
        for (ix, cell) in self.cells.iter().enumerate() {
            if cell.d > best.0 {
                best = (cell.d, ix / self.cols, ix % self.cols);
            }
        }

        best
    }

    /// Trace back from `(i, j)` in layer `state`.
    ///
    /// Stops at the grid origin, or after the (mis)match that starts a local
    /// alignment. Returns the start cell and the moves in left-to-right order.
    pub fn traceback(&self, mut i: usize, mut j: usize, mut state: AlignState) -> ((usize, usize), Vec<Move>) {
        let mut moves = Vec::with_capacity(i + j);

        while i > 0 || j > 0 {
            let trace = self.trace(i, j);
            match state {
                AlignState::Start => break,
                AlignState::Match => {
                    moves.push(Move::Diagonal);
                    state = trace.d;
                    i -= 1;
                    j -= 1;
                },
                AlignState::Deletion => {
                    moves.push(Move::Up);
                    state = trace.g;
                    i -= 1;
                },
                AlignState::Insertion => {
                    moves.push(Move::Left);
                    state = trace.i;
                    j -= 1;
                },
            }
        }

        moves.reverse();
        ((i, j), moves)
    }
}

/// Quadratic space affine alignment.
///
/// In global mode the path enters the grid in state `entry` and leaves it in
/// state `exit`; pass [`AlignState::Match`] for both for a free-standing
/// alignment.
pub(crate) fn align_quadratic<G: GapCosts>(
    seq1: &[u8],
    seq2: &[u8],
    scoring: &ScoringModel,
    gaps: &G,
    span: AlignmentSpan,
    entry: AlignState,
    exit: AlignState,
) -> RawAlignment {
    let matrix = AffineMatrix::fill(seq1, seq2, scoring, gaps, span, entry);

    let (score, end_i, end_j, end_state) = match span {
        AlignmentSpan::Global => {
            let (score, state) = matrix.cell(seq1.len(), seq2.len())
                .best_with_exit(exit, gaps.gap_open(), gaps.gap_extend());

            (score, seq1.len(), seq2.len(), state)
        },
        AlignmentSpan::Local => {
            let (score, i, j) = matrix.max_match_cell();
            if score <= 0.0 {
                return RawAlignment::empty()
            }

            (score, i, j, AlignState::Match)
        }
    };

    let (start, moves) = matrix.traceback(end_i, end_j, end_state);

    RawAlignment { start, moves, score }
}
