//! Sequence file input for longalign
//!
//! Alignment itself works on plain slices; this module only gets FASTA/FASTQ
//! records off disk.

pub mod fasta;

pub use fasta::{FastaError, FastaParser};
