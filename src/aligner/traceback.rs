use crate::aligner::alignment::{AlignmentMode, AlignmentResult};
use crate::aligner::scoring::{GapCosts, ScoringModel};

/// A single step through the DP grid, moving towards the bottom right.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Move {
    /// Residue of sequence 1 against a residue of sequence 2
    Diagonal,

    /// Residue of sequence 1 against a gap (increments the row)
    Up,

    /// Residue of sequence 2 against a gap (increments the column)
    Left,
}

impl Move {
    /// The same move with the roles of both sequences swapped.
    pub fn transposed(&self) -> Self {
        match self {
            Self::Diagonal => Self::Diagonal,
            Self::Up => Self::Left,
            Self::Left => Self::Up,
        }
    }
}

/// Receives the coordinates of an alignment path during traceback.
///
/// Coordinates are `(row, column)` grid cells, reported from the end cell back
/// to the start cell.
pub trait TracebackObserver {
    fn traceback_started(&mut self, _end: (usize, usize)) { }

    fn visit(&mut self, x: usize, y: usize);

    fn traceback_finished(&mut self) { }
}

/// Turn a list of moves from `start` into aligned columns and a coordinate path.
pub(crate) fn reconstruct(
    seq1: &[u8],
    seq2: &[u8],
    start: (usize, usize),
    moves: &[Move],
    score: f64,
    mode: AlignmentMode,
    observer: Option<&mut dyn TracebackObserver>,
) -> AlignmentResult {
    let mut aligned1 = String::with_capacity(moves.len());
    let mut aligned2 = String::with_capacity(moves.len());

    let mut path = Vec::with_capacity(moves.len() + 1);
    let (mut i, mut j) = start;

    if !moves.is_empty() {
        path.push((i, j));
    }

    for m in moves {
        match m {
            Move::Diagonal => {
                aligned1.push(seq1[i] as char);
                aligned2.push(seq2[j] as char);
                i += 1;
                j += 1;
            },
            Move::Up => {
                aligned1.push(seq1[i] as char);
                aligned2.push('-');
                i += 1;
            },
            Move::Left => {
                aligned1.push('-');
                aligned2.push(seq2[j] as char);
                j += 1;
            },
        }

        path.push((i, j));
    }

    if let Some(obs) = observer {
        obs.traceback_started((i, j));
        for (x, y) in path.iter().rev() {
            obs.visit(*x, *y);
        }
        obs.traceback_finished();
    }

    AlignmentResult::new(aligned1, aligned2, score, mode, start, (i, j), path)
}

/// Score of the path given by `moves` from `start`.
///
/// Consecutive moves of the same gap type form a single gap and pay `gap_cost`
/// of its full length.
pub fn score_path<G: GapCosts>(
    seq1: &[u8],
    seq2: &[u8],
    start: (usize, usize),
    moves: &[Move],
    scoring: &ScoringModel,
    gaps: &G,
) -> f64 {
    let (mut i, mut j) = start;
    let mut score = 0.0;

    let mut run: Option<(Move, usize)> = None;

    for m in moves {
        match (run, m) {
            (Some((kind, len)), m) if kind == *m => run = Some((kind, len + 1)),
            (Some((_, len)), _) => {
                score -= gaps.gap_cost(len);
                run = None;
            },
            _ => (),
        }

        match m {
            Move::Diagonal => {
                score += scoring.score(seq1[i], seq2[j]);
                i += 1;
                j += 1;
            },
            Move::Up => {
                if run.is_none() {
                    run = Some((Move::Up, 1));
                }
                i += 1;
            },
            Move::Left => {
                if run.is_none() {
                    run = Some((Move::Left, 1));
                }
                j += 1;
            },
        }
    }

    if let Some((_, len)) = run {
        score -= gaps.gap_cost(len);
    }

    score
}
