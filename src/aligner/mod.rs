pub mod alignment;
pub mod batch;
pub mod dp;
pub mod linear_space;
pub mod scoring;
pub mod traceback;

use tracing::debug;

use crate::aligner::dp::affine::AlignState;
use crate::aligner::scoring::{GapCosts, GapKind, GapModel, ScoringModel};
use crate::aligner::traceback::{reconstruct, Move};
use crate::errors::AlignError;

pub use alignment::{AlignedPair, AlignmentMode, AlignmentResult, AlignmentSpan, SpaceMode};
pub use batch::align_batch;
pub use traceback::{score_path, TracebackObserver};

/// Start cell, moves and score, as produced by the engines.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RawAlignment {
    pub start: (usize, usize),
    pub moves: Vec<Move>,
    pub score: f64,
}

impl RawAlignment {
    /// The empty local alignment
    pub fn empty() -> Self {
        Self { start: (0, 0), moves: Vec::new(), score: 0.0 }
    }
}

/// Compute an optimal alignment of `seq1` and `seq2`.
///
/// `mode.gap` selects the recurrence. The linear recurrence needs a gap model
/// with equal opening and extension costs, the affine recurrence accepts
/// either model.
pub fn align<S1, S2>(
    seq1: &S1,
    seq2: &S2,
    scoring: &ScoringModel,
    gaps: &GapModel,
    mode: AlignmentMode,
) -> Result<AlignmentResult, AlignError>
where
    S1: AsRef<[u8]> + ?Sized,
    S2: AsRef<[u8]> + ?Sized,
{
    align_u8(seq1.as_ref(), seq2.as_ref(), scoring, gaps, mode, None)
}

fn align_u8(
    seq1: &[u8],
    seq2: &[u8],
    scoring: &ScoringModel,
    gaps: &GapModel,
    mode: AlignmentMode,
    observer: Option<&mut dyn TracebackObserver>,
) -> Result<AlignmentResult, AlignError> {
    scoring.validate(seq1)?;
    scoring.validate(seq2)?;

    if mode.gap == GapKind::Linear && gaps.gap_open() != gaps.gap_extend() {
        return Err(AlignError::InvalidParameter(format!(
            "linear gap recurrence needs equal open and extend costs, got {} and {}",
            gaps.gap_open(), gaps.gap_extend()
        )));
    }

    debug!(len1 = seq1.len(), len2 = seq2.len(), scoring = scoring.name(), "Aligning ({mode})");

    let raw = match (mode.space, mode.gap) {
        (SpaceMode::Quadratic, GapKind::Linear) =>
            dp::linear::align_quadratic(seq1, seq2, scoring, gaps.gap_extend(), mode.span),
        (SpaceMode::Quadratic, GapKind::Affine) =>
            dp::affine::align_quadratic(seq1, seq2, scoring, gaps, mode.span, AlignState::Match, AlignState::Match),
        (SpaceMode::Linear, GapKind::Linear) =>
            linear_space::linear::align_linear_space(seq1, seq2, scoring, gaps, mode.span),
        (SpaceMode::Linear, GapKind::Affine) =>
            linear_space::affine::align_linear_space(seq1, seq2, scoring, gaps, mode.span),
    };

    debug!(score = raw.score, columns = raw.moves.len(), "Alignment done");

    Ok(reconstruct(seq1, seq2, raw.start, &raw.moves, raw.score, mode, observer))
}

/// Aligns pairs of sequences with a fixed scoring model, gap model and mode.
///
/// The aligner only holds shared references and copies, so a single instance
/// can be used from multiple threads.
#[derive(Copy, Clone, Debug)]
pub struct PairwiseAligner<'a> {
    scoring: &'a ScoringModel,
    gaps: GapModel,
    mode: AlignmentMode,
}

impl<'a> PairwiseAligner<'a> {
    /// Create an aligner whose recurrence follows the kind of `gaps`.
    pub fn new(scoring: &'a ScoringModel, gaps: GapModel, span: AlignmentSpan, space: SpaceMode) -> Self {
        Self {
            scoring,
            gaps,
            mode: AlignmentMode::new(span, gaps.kind(), space),
        }
    }

    /// Create an aligner with an explicit mode.
    pub fn with_mode(scoring: &'a ScoringModel, gaps: GapModel, mode: AlignmentMode) -> Self {
        Self { scoring, gaps, mode }
    }

    pub fn scoring(&self) -> &'a ScoringModel {
        self.scoring
    }

    pub fn gaps(&self) -> &GapModel {
        &self.gaps
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    pub fn align<S1, S2>(&self, seq1: &S1, seq2: &S2) -> Result<AlignmentResult, AlignError>
    where
        S1: AsRef<[u8]> + ?Sized,
        S2: AsRef<[u8]> + ?Sized,
    {
        align_u8(seq1.as_ref(), seq2.as_ref(), self.scoring, &self.gaps, self.mode, None)
    }

    /// Align and report the traceback path to `observer`.
    pub fn align_with_observer<S1, S2>(
        &self,
        seq1: &S1,
        seq2: &S2,
        observer: &mut dyn TracebackObserver,
    ) -> Result<AlignmentResult, AlignError>
    where
        S1: AsRef<[u8]> + ?Sized,
        S2: AsRef<[u8]> + ?Sized,
    {
        align_u8(seq1.as_ref(), seq2.as_ref(), self.scoring, &self.gaps, self.mode, Some(observer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligner::scoring::{GapAffine, GapLinear, ScoringModelSpec};
    use crate::sequence::{Alphabet, Sequence};

    const ALL_MODES: [(AlignmentSpan, SpaceMode); 4] = [
        (AlignmentSpan::Global, SpaceMode::Quadratic),
        (AlignmentSpan::Global, SpaceMode::Linear),
        (AlignmentSpan::Local, SpaceMode::Quadratic),
        (AlignmentSpan::Local, SpaceMode::Linear),
    ];

    fn unit_scoring() -> ScoringModel {
        ScoringModelSpec::MatchMismatch { match_score: 1.0, mismatch_score: -1.0 }
            .build()
            .unwrap()
    }

    fn linear_gaps(cost: f64) -> GapModel {
        GapLinear::new(cost).unwrap().into()
    }

    fn affine_gaps(open: f64, extend: f64) -> GapModel {
        GapAffine::new(open, extend).unwrap().into()
    }

    #[test]
    fn test_golden_gattaca() {
        let scoring = unit_scoring();
        let aligner = PairwiseAligner::new(&scoring, linear_gaps(1.0), AlignmentSpan::Global, SpaceMode::Quadratic);

        let result = aligner.align("GATTACA", "GCATGCU").unwrap();
        assert_eq!(result.score(), 0.0);
        assert_eq!(result.aligned1(), "G-ATTACA");
        assert_eq!(result.aligned2(), "GCA-TGCU");
        assert_eq!(result.start(), (0, 0));
        assert_eq!(result.end(), (7, 7));
        assert_eq!(result.mode().gap, GapKind::Linear);
    }

    #[test]
    fn test_local_affine_strings() {
        let scoring = unit_scoring();

        for space in [SpaceMode::Quadratic, SpaceMode::Linear] {
            let result = PairwiseAligner::new(&scoring, affine_gaps(4.0, 1.0), AlignmentSpan::Local, space)
                .align("TTTTACGTACTTTT", "GGGACGTACGGG")
                .unwrap();

            assert_eq!(result.score(), 6.0);
            assert_eq!(result.aligned1(), "ACGTAC");
            assert_eq!(result.aligned2(), "ACGTAC");
            assert_eq!(result.start(), (4, 3));
            assert_eq!(result.end(), (10, 9));
            assert_eq!(result.path().len(), 7);
        }
    }

    #[test]
    fn test_identical_sequences() {
        let scoring = ScoringModelSpec::Blosum62.build().unwrap();
        let seq = b"MKVLAAGIVGLLLAWHC";
        let self_score: f64 = seq.iter().map(|c| scoring.score(*c, *c)).sum();

        for gaps in [linear_gaps(4.0), affine_gaps(11.0, 1.0)] {
            for (span, space) in ALL_MODES {
                let result = PairwiseAligner::new(&scoring, gaps, span, space)
                    .align(seq, seq)
                    .unwrap();

                assert_eq!(result.score(), self_score);
                assert_eq!(result.num_gap_columns(), 0);
                assert_eq!(result.aligned1().as_bytes(), seq);
            }
        }
    }

    #[test]
    fn test_affine_insertion_cost() {
        let scoring = unit_scoring();
        let base = b"ACGTACGTAC";

        for len in 1..6 {
            let mut inserted = base[..5].to_vec();
            inserted.extend(std::iter::repeat(b'G').take(len));
            inserted.extend(&base[5..]);

            let gaps = affine_gaps(6.0, 2.0);
            for space in [SpaceMode::Quadratic, SpaceMode::Linear] {
                let result = PairwiseAligner::new(&scoring, gaps, AlignmentSpan::Global, space)
                    .align(base, &inserted)
                    .unwrap();

                assert_eq!(result.score(), 10.0 - gaps.gap_cost(len));
                assert_eq!(result.num_gap_columns(), len);
            }
        }
    }

    #[test]
    fn test_local_at_least_global() {
        let scoring = unit_scoring();
        let pairs: [(&str, &str); 4] = [
            ("GATTACA", "GCATGCU"),
            ("AAAAAAAA", "CCCCCCCC"),
            ("ACGTTGCAACGT", "TTGCA"),
            ("", "ACGT"),
        ];

        for gaps in [linear_gaps(1.0), affine_gaps(3.0, 1.0)] {
            for (s1, s2) in pairs {
                let global = align(s1, s2, &scoring, &gaps,
                    AlignmentMode::new(AlignmentSpan::Global, gaps.kind(), SpaceMode::Quadratic)).unwrap();
                let local = align(s1, s2, &scoring, &gaps,
                    AlignmentMode::new(AlignmentSpan::Local, gaps.kind(), SpaceMode::Quadratic)).unwrap();

                assert!(local.score() >= 0.0);
                assert!(local.score() >= global.score());
            }
        }
    }

    #[test]
    fn test_empty_sequences() {
        let scoring = unit_scoring();

        for gaps in [linear_gaps(2.0), affine_gaps(3.0, 1.0)] {
            for space in [SpaceMode::Quadratic, SpaceMode::Linear] {
                let global = PairwiseAligner::new(&scoring, gaps, AlignmentSpan::Global, space);
                let result = global.align("", "ACG").unwrap();
                assert_eq!(result.score(), -gaps.gap_cost(3));
                assert_eq!(result.aligned1(), "---");
                assert_eq!(result.aligned2(), "ACG");

                let result = global.align("", "").unwrap();
                assert_eq!(result.score(), 0.0);
                assert!(result.is_empty());

                let local = PairwiseAligner::new(&scoring, gaps, AlignmentSpan::Local, space);
                let result = local.align("ACGT", "").unwrap();
                assert_eq!(result.score(), 0.0);
                assert!(result.is_empty());
                assert!(result.path().is_empty());
            }
        }
    }

    #[test]
    fn test_rescored_path_and_observer() {
        #[derive(Default)]
        struct Recorder {
            visited: Vec<(usize, usize)>,
            events: Vec<&'static str>,
        }

        impl TracebackObserver for Recorder {
            fn traceback_started(&mut self, _end: (usize, usize)) {
                self.events.push("start");
            }

            fn visit(&mut self, x: usize, y: usize) {
                self.visited.push((x, y));
            }

            fn traceback_finished(&mut self) {
                self.events.push("finish");
            }
        }

        let scoring = ScoringModelSpec::Kimura { distance: 0.3, kappa: 2.0 }.build().unwrap();
        let gaps = affine_gaps(3.0, 0.5);
        let (s1, s2) = ("ACGTTAGCCATGGA", "ACTTAGCCTTGGAA");

        for (span, space) in ALL_MODES {
            let mut recorder = Recorder::default();
            let result = PairwiseAligner::new(&scoring, gaps, span, space)
                .align_with_observer(s1, s2, &mut recorder)
                .unwrap();

            let pairs = result.aligned_pairs();
            let moves: Vec<Move> = pairs.iter()
                .map(|p| match (p.pos1, p.pos2) {
                    (Some(_), Some(_)) => Move::Diagonal,
                    (Some(_), None) => Move::Up,
                    _ => Move::Left,
                })
                .collect();

            let rescored = score_path(s1.as_bytes(), s2.as_bytes(), result.start(), &moves, &scoring, &gaps);
            assert!((rescored - result.score()).abs() < 1e-9);

            assert_eq!(recorder.events, vec!["start", "finish"]);
            assert_eq!(recorder.visited.first(), Some(&result.end()));
            assert_eq!(recorder.visited.last(), Some(&result.start()));
            assert_eq!(recorder.visited.len(), result.path().len());
        }
    }

    #[test]
    fn test_affine_recurrence_with_linear_model() {
        let scoring = unit_scoring();
        let gaps = linear_gaps(1.0);

        let linear = align("GATTACA", "GCATGCU", &scoring, &gaps,
            AlignmentMode::new(AlignmentSpan::Global, GapKind::Linear, SpaceMode::Quadratic)).unwrap();
        let affine = align("GATTACA", "GCATGCU", &scoring, &gaps,
            AlignmentMode::new(AlignmentSpan::Global, GapKind::Affine, SpaceMode::Quadratic)).unwrap();

        assert_eq!(linear.score(), affine.score());
    }

    #[test]
    fn test_invalid_input() {
        let scoring = unit_scoring();
        let gaps = linear_gaps(1.0);
        let mode = AlignmentMode::default();

        let err = align("GATTXCA", "GATTACA", &scoring, &gaps, mode).unwrap_err();
        assert!(matches!(err, AlignError::InvalidAlphabet { symbol: b'X', alphabet: Alphabet::Nucleotide }));

        let err = align("GATTACA", "GATT-ACA", &scoring, &gaps, mode).unwrap_err();
        assert!(matches!(err, AlignError::InvalidAlphabet { symbol: b'-', .. }));

        let affine = affine_gaps(4.0, 1.0);
        let err = align("ACGT", "ACGT", &scoring, &affine, mode).unwrap_err();
        assert!(matches!(err, AlignError::InvalidParameter(_)));
    }

    #[test]
    fn test_sequences_and_ambiguity() {
        let scoring = ScoringModelSpec::JukesCantor { distance: 0.1 }.build().unwrap();
        let s1 = Sequence::new("s1", "ACGTRACGT", Alphabet::Nucleotide).unwrap();
        let s2 = Sequence::new("s2", "acgtaacgu", Alphabet::Nucleotide).unwrap();

        let aligner = PairwiseAligner::new(&scoring, affine_gaps(5.0, 1.0), AlignmentSpan::Global, SpaceMode::Linear);
        let result = aligner.align(&s1, &s2).unwrap();

        assert_eq!(result.num_gap_columns(), 0);
        assert_eq!(result.aligned2(), "acgtaacgu");

        let expected: f64 = s1.residues().iter()
            .zip(s2.residues())
            .map(|(a, b)| scoring.score(*a, *b))
            .sum();
        assert!((result.score() - expected).abs() < 1e-9);
    }
}
