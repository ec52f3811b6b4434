use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;
use tracing::debug;

use crate::errors::AlignError;
use crate::sequence::{Alphabet, Sequence};

/// Whether a path refers to a gzipped file, judged by its extension.
pub fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

fn buffered<R>(inner: R, gzipped: bool) -> Box<dyn BufRead + Send>
where
    R: Read + Send + 'static,
{
    if gzipped {
        Box::new(BufReader::new(MultiGzDecoder::new(inner)))
    } else {
        Box::new(BufReader::new(inner))
    }
}

/// Open a (possibly gzipped) FASTA file for reading.
pub fn open_fasta(path: &Path) -> Result<Box<dyn BufRead + Send>, AlignError> {
    let file = File::open(path)
        .map_err(|source| AlignError::FileReadError { source })?;

    Ok(buffered(file, is_gzipped(path)))
}

/// Parse all FASTA records from `reader`, validating residues against `alphabet`.
pub fn read_fasta<R: BufRead>(reader: R, alphabet: Alphabet) -> Result<Vec<Sequence>, AlignError> {
    let mut reader = fasta::io::Reader::new(reader);

    let mut sequences = Vec::new();
    for result in reader.records() {
        let record = result?;
        let name = String::from_utf8_lossy(record.name()).to_string();

        sequences.push(Sequence::new(name, record.sequence().as_ref().to_vec(), alphabet)?);
    }

    Ok(sequences)
}

/// Read all sequences from a FASTA file. Files ending in `.gz` are decompressed.
pub fn load_sequences(path: &Path, alphabet: Alphabet) -> Result<Vec<Sequence>, AlignError> {
    let sequences = read_fasta(open_fasta(path)?, alphabet)?;
    debug!(path = %path.display(), count = sequences.len(), "Loaded sequences");

    Ok(sequences)
}
