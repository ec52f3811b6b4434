pub mod fasta;
pub mod output;

pub use fasta::load_sequences;
