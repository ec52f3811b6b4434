//! Single layer dynamic programming for linear gap costs.

use crate::aligner::scoring::ScoringModel;
use crate::aligner::traceback::Move;
use crate::aligner::{AlignmentSpan, RawAlignment};

/// The move that produced the score of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Grid origin, or a local alignment restart
    #[default]
    None,
    Diagonal,
    Up,
    Left,
}

/// Compute a cell from its three predecessors.
///
/// Ties prefer the diagonal, then up (gap in sequence 2), then left (gap in
/// sequence 1). With `restart`, a value that does not exceed zero becomes a
/// fresh start.
#[inline(always)]
pub(crate) fn linear_step(diag: f64, up: f64, left: f64, substitution: f64, gap: f64, restart: bool) -> (f64, Direction) {
    let mut best = diag + substitution;
    let mut dir = Direction::Diagonal;

    let from_up = up - gap;
    if from_up > best {
        best = from_up;
        dir = Direction::Up;
    }

    let from_left = left - gap;
    if from_left > best {
        best = from_left;
        dir = Direction::Left;
    }

    if restart && best <= 0.0 {
        return (0.0, Direction::None)
    }

    (best, dir)
}

/// The full (m+1) x (n+1) score and direction matrices.
pub(crate) struct LinearMatrix {
    cols: usize,
    scores: Vec<f64>,
    directions: Vec<Direction>,
}

impl LinearMatrix {
    pub fn fill(seq1: &[u8], seq2: &[u8], scoring: &ScoringModel, gap: f64, span: AlignmentSpan) -> Self {
        let rows = seq1.len() + 1;
        let cols = seq2.len() + 1;
        let restart = span == AlignmentSpan::Local;

        let mut scores = vec![0.0; rows * cols];
        let mut directions = vec![Direction::None; rows * cols];

        if !restart {
            for i in 1..rows {
                scores[i * cols] = -(i as f64) * gap;
                directions[i * cols] = Direction::Up;
            }
            for j in 1..cols {
                scores[j] = -(j as f64) * gap;
                directions[j] = Direction::Left;
            }
        }

        for i in 1..rows {
            let a = seq1[i - 1];
            for j in 1..cols {
                let (score, dir) = linear_step(
                    scores[(i - 1) * cols + j - 1],
                    scores[(i - 1) * cols + j],
                    scores[i * cols + j - 1],
                    scoring.score(a, seq2[j - 1]),
                    gap,
                    restart,
                );

                scores[i * cols + j] = score;
                directions[i * cols + j] = dir;
            }
        }

        Self { cols, scores, directions }
    }

    #[inline]
    pub fn score(&self, i: usize, j: usize) -> f64 {
        self.scores[i * self.cols + j]
    }

    #[inline]
    pub fn direction(&self, i: usize, j: usize) -> Direction {
        self.directions[i * self.cols + j]
    }

    /// First cell in row-major order holding the maximum score.
    pub fn max_cell(&self) -> (f64, usize, usize) {
        let mut best = (f64::NEG_INFINITY, 0, 0);
        for (ix, score) in self.scores.iter().enumerate() {
            if *score > best.0 {
                best = (*score, ix / self.cols, ix % self.cols);
            }
        }

        best
    }

    /// Follow the direction tags from `(i, j)` until a cell without a predecessor.
    ///
    /// Returns the start cell and the moves in left-to-right order.
    pub fn traceback(&self, mut i: usize, mut j: usize) -> ((usize, usize), Vec<Move>) {
        let mut moves = Vec::with_capacity(i + j);

        loop {
            match self.direction(i, j) {
                Direction::None => break,
                Direction::Diagonal => {
                    moves.push(Move::Diagonal);
                    i -= 1;
                    j -= 1;
                },
                Direction::Up => {
                    moves.push(Move::Up);
                    i -= 1;
                },
                Direction::Left => {
                    moves.push(Move::Left);
                    j -= 1;
                },
            }
        }

        moves.reverse();
        ((i, j), moves)
    }
}

/// Quadratic space alignment with linear gap cost `gap` per residue.
pub(crate) fn align_quadratic(
    seq1: &[u8],
    seq2: &[u8],
    scoring: &ScoringModel,
    gap: f64,
    span: AlignmentSpan,
) -> RawAlignment {
    let matrix = LinearMatrix::fill(seq1, seq2, scoring, gap, span);

    let (score, end_i, end_j) = match span {
        AlignmentSpan::Global => (matrix.score(seq1.len(), seq2.len()), seq1.len(), seq2.len()),
        AlignmentSpan::Local => {
            let (score, i, j) = matrix.max_cell();
            if score <= 0.0 {
                return RawAlignment::empty()
            }

            (score, i, j)
        }
    };

    let (start, moves) = matrix.traceback(end_i, end_j);

    RawAlignment { start, moves, score }
}
