use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

use pairalign::aligner::scoring::{GapAffine, GapLinear, GapModel, ScoringModelSpec};
use pairalign::aligner::{self, align_batch, PairwiseAligner};
use pairalign::errors::AlignError;
use pairalign::io::load_sequences;
use pairalign::io::output::{write_json, write_text, write_tsv, write_tsv_header};

/// The various output formats supported by pairalign
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputType {
    /// Alignment blocks for reading
    Text,

    /// One tab separated line per alignment
    Tsv,

    /// One JSON object per line
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
/// An enum indicating what kind of alignment to perform
enum AlignmentSpan {
    /// Align both sequences end to end
    Global,

    /// Find the best scoring pair of substrings
    Local,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SpaceMode {
    /// Keep the full DP matrix
    Quadratic,

    /// Divide and conquer, memory proportional to the shorter sequence
    Linear,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct CliArgs {
    /// Set verbosity level. Use multiple times to increase the verbosity level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<PairalignSubcommand>,
}

#[derive(Subcommand, Debug)]
enum PairalignSubcommand {
    /// Align the i-th sequence of the first file with the i-th sequence of the second
    Align(AlignArgs),

    /// List the available scoring models
    Models,
}

#[derive(Args, Debug)]
struct AlignArgs {
    /// First set of sequences in FASTA format, optionally gzipped
    #[clap(help_heading = "Inputs")]
    first: PathBuf,

    /// Second set of sequences in FASTA format, optionally gzipped
    #[clap(help_heading = "Inputs")]
    second: PathBuf,

    #[arg(short = 'j', long, default_value = "1")]
    #[clap(help_heading = "Processing")]
    num_threads: usize,

    /// Output filename. If not given, defaults to stdout
    #[arg(short, long)]
    #[clap(help_heading = "Outputs")]
    output: Option<PathBuf>,

    /// Output file type.
    #[arg(value_enum, short = 'O', long, default_value = "text")]
    #[clap(help_heading = "Outputs")]
    output_type: OutputType,

    /// Alignment span, either global or local alignment
    #[arg(value_enum, short = 'm', long, default_value = "global")]
    #[clap(help_heading = "Alignment configuration")]
    alignment_span: AlignmentSpan,

    /// Memory strategy of the aligner
    #[arg(value_enum, short = 's', long, default_value = "quadratic")]
    #[clap(help_heading = "Alignment configuration")]
    space: SpaceMode,

    /// Substitution scoring model, e.g. Blosum62, "MatchMismatch(2,-4)", "JukesCantor(0.1)" or "Kimura(0.1,2)"
    #[arg(short = 'M', long, default_value = "MatchMismatch(2,-4)")]
    #[clap(help_heading = "Alignment configuration")]
    scoring_model: String,

    /// Penalty for opening a new gap. Equals the per residue cost for linear gaps.
    #[arg(short = 'g', default_value = "6")]
    #[clap(help_heading = "Alignment configuration")]
    cost_gap_open: f64,

    /// Penalty for extending a gap. Gaps are linear if not given.
    #[arg(short = 'e')]
    #[clap(help_heading = "Alignment configuration")]
    cost_gap_extend: Option<f64>,
}

/// Build our tracing subscriber with stderr logging, filtered by `RUST_LOG` or
/// the verbosity level.
fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(filter_layer);

    Registry::default().with(stderr_log).init();

    Ok(())
}

fn write_output<W: Write>(
    mut writer: W,
    output_type: OutputType,
    names: &[(&str, &str)],
    results: &[Result<aligner::AlignmentResult, AlignError>],
) -> Result<()> {
    if output_type == OutputType::Tsv {
        write_tsv_header(&mut writer)?;
    }

    for ((name1, name2), result) in names.iter().zip(results) {
        let result = match result {
            Ok(r) => r,
            Err(err) => {
                warn!("Could not align {name1} with {name2}: {err}");
                continue;
            }
        };

        match output_type {
            OutputType::Text => write_text(&mut writer, name1, name2, result)?,
            OutputType::Tsv => write_tsv(&mut writer, name1, name2, result)?,
            OutputType::Json => write_json(&mut writer, name1, name2, result)?,
        }
    }

    writer.flush()?;

    Ok(())
}

fn align_subcommand(args: &AlignArgs) -> Result<()> {
    let spec: ScoringModelSpec = args.scoring_model.parse()
        .with_context(|| "Could not parse scoring model.")?;
    let scoring = spec.build()
        .with_context(|| format!("Could not build scoring model {spec}."))?;

    let gaps: GapModel = match args.cost_gap_extend {
        Some(extend) => GapAffine::new(args.cost_gap_open, extend)?.into(),
        None => GapLinear::new(args.cost_gap_open)?.into(),
    };

    let span = match args.alignment_span {
        AlignmentSpan::Global => aligner::AlignmentSpan::Global,
        AlignmentSpan::Local => aligner::AlignmentSpan::Local,
    };
    let space = match args.space {
        SpaceMode::Quadratic => aligner::SpaceMode::Quadratic,
        SpaceMode::Linear => aligner::SpaceMode::Linear,
    };

    let first = load_sequences(&args.first, spec.alphabet())
        .with_context(|| format!("Could not load sequences from {}.", args.first.display()))?;
    let second = load_sequences(&args.second, spec.alphabet())
        .with_context(|| format!("Could not load sequences from {}.", args.second.display()))?;

    if first.len() != second.len() {
        warn!("Number of sequences differ ({} vs. {}), only aligning the first {}.",
            first.len(), second.len(), first.len().min(second.len()));
    }

    let pairs: Vec<_> = first.iter().zip(&second).collect();
    let names: Vec<_> = pairs.iter()
        .map(|(s1, s2)| (s1.name(), s2.name()))
        .collect();

    let aligner = PairwiseAligner::new(&scoring, gaps, span, space);
    info!("Aligning {} pairs ({}, {}) with {} threads...", pairs.len(), aligner.mode(), scoring.name(), args.num_threads);

    let results = align_batch(&aligner, &pairs, args.num_threads);

    if let Some(output) = &args.output {
        let writer = BufWriter::new(File::create(output)
            .with_context(|| format!("Could not create output file {}.", output.display()))?);
        write_output(writer, args.output_type, &names, &results)?;
    } else {
        write_output(io::stdout().lock(), args.output_type, &names, &results)?;
    }

    Ok(())
}

fn models_subcommand() -> Result<()> {
    let mut stdout = io::stdout().lock();
    for name in ScoringModelSpec::NAMES {
        writeln!(stdout, "{name}")?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose)?;

    match &args.command {
        Some(PairalignSubcommand::Align(v)) => align_subcommand(v)?,
        Some(PairalignSubcommand::Models) => models_subcommand()?,
        None => return Err(AlignError::InvalidParameter("no subcommand".to_string()))
            .with_context(|| "No subcommand given.".to_string()),
    };

    Ok(())
}
