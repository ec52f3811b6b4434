use std::io::Write;

use itertools::Itertools;
use serde::Serialize;

use crate::aligner::AlignmentResult;
use crate::errors::AlignError;

pub const TSV_COLUMNS: [&str; 11] = [
    "name1", "name2", "score", "columns", "identity", "gaps",
    "start1", "end1", "start2", "end2", "cigar",
];

/// Run-length encoded alignment columns: `M` (mis)match, `D` residue of
/// sequence 1 against a gap, `I` residue of sequence 2 against a gap.
pub fn cigar(result: &AlignmentResult) -> String {
    result.aligned1().bytes()
        .zip(result.aligned2().bytes())
        .map(|pair| match pair {
            (b'-', _) => 'I',
            (_, b'-') => 'D',
            _ => 'M',
        })
        .dedup_with_count()
        .map(|(count, op)| format!("{count}{op}"))
        .join("")
}

/// Human readable block with a header line and the three line alignment view.
pub fn write_text<W: Write>(writer: &mut W, name1: &str, name2: &str, result: &AlignmentResult) -> Result<(), AlignError> {
    writeln!(writer, "# {name1} vs. {name2} ({})", result.mode())?;
    writeln!(writer, "# Score: {}, identity: {:.1}%, gap columns: {}",
        result.score(), result.identity() * 100.0, result.num_gap_columns())?;
    writeln!(writer, "{result}")?;
    writeln!(writer)?;

    Ok(())
}

pub fn write_tsv_header<W: Write>(writer: &mut W) -> Result<(), AlignError> {
    writeln!(writer, "{}", TSV_COLUMNS.iter().join("\t"))?;

    Ok(())
}

/// Single TSV line. Sequence ranges are 0-based and half-open.
pub fn write_tsv<W: Write>(writer: &mut W, name1: &str, name2: &str, result: &AlignmentResult) -> Result<(), AlignError> {
    let (start1, start2) = result.start();
    let (end1, end2) = result.end();

    let fields = [
        name1.to_string(),
        name2.to_string(),
        result.score().to_string(),
        result.len().to_string(),
        format!("{:.4}", result.identity()),
        result.num_gap_columns().to_string(),
        start1.to_string(),
        end1.to_string(),
        start2.to_string(),
        end2.to_string(),
        cigar(result),
    ];

    writeln!(writer, "{}", fields.iter().join("\t"))?;

    Ok(())
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    name1: &'a str,
    name2: &'a str,

    #[serde(flatten)]
    result: &'a AlignmentResult,
}

/// One JSON object per line.
pub fn write_json<W: Write>(writer: &mut W, name1: &str, name2: &str, result: &AlignmentResult) -> Result<(), AlignError> {
    let record = JsonRecord { name1, name2, result };
    serde_json::to_writer(&mut *writer, &record)
        .map_err(std::io::Error::from)?;
    writeln!(writer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligner::scoring::{GapLinear, ScoringModelSpec};
    use crate::aligner::{AlignmentSpan, PairwiseAligner, SpaceMode};

    fn gattaca() -> AlignmentResult {
        let scoring = ScoringModelSpec::MatchMismatch { match_score: 1.0, mismatch_score: -1.0 }
            .build()
            .unwrap();

        PairwiseAligner::new(&scoring, GapLinear::new(1.0).unwrap().into(), AlignmentSpan::Global, SpaceMode::Quadratic)
            .align("GATTACA", "GCATGCU")
            .unwrap()
    }

    #[test]
    fn test_cigar() {
        assert_eq!(cigar(&gattaca()), "1M1I1M1D4M");
    }

    #[test]
    fn test_tsv() {
        let mut out = Vec::new();
        write_tsv_header(&mut out).unwrap();
        write_tsv(&mut out, "s1", "s2", &gattaca()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split('\t').count(), TSV_COLUMNS.len());
        assert_eq!(lines[1], "s1\ts2\t0\t8\t0.5000\t2\t0\t7\t0\t7\t1M1I1M1D4M");
    }

    #[test]
    fn test_text() {
        let mut out = Vec::new();
        write_text(&mut out, "s1", "s2", &gattaca()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# s1 vs. s2 (global, linear gaps, quadratic space)\n"));
        assert!(text.contains("G-ATTACA\n| | |*|*\nGCA-TGCU\n"));
    }

    #[test]
    fn test_json() {
        let mut out = Vec::new();
        write_json(&mut out, "s1", "s2", &gattaca()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["name1"], "s1");
        assert_eq!(value["aligned1"], "G-ATTACA");
        assert_eq!(value["aligned2"], "GCA-TGCU");
        assert_eq!(value["score"], 0.0);
        assert_eq!(value["mode"]["span"], "Global");
        assert_eq!(value["end"], serde_json::json!([7, 7]));
    }
}
