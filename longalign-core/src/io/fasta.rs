//! FASTA/FASTQ sequence file parser
//!
//! Fast parsing of FASTA and FASTQ files using the needletail library,
//! with gzip support through flate2.

use anyhow::Result;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

use needletail::{parse_fastx_file, parse_fastx_reader, FastxReader};
use crate::types::Sequence;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty file or no sequences found")]
    EmptyFile,
}

/// FASTA/FASTQ parser for reading sequence data
pub struct FastaParser;

impl FastaParser {
    /// Parse a FASTA/FASTQ file into sequence records
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Sequence>> {
        let path_str = path.as_ref().to_string_lossy();

        if path_str.ends_with(".gz") {
            Self::parse_gzipped_file(path)
        } else {
            Self::parse_uncompressed_file(path)
        }
    }

    fn parse_uncompressed_file<P: AsRef<Path>>(path: P) -> Result<Vec<Sequence>> {
        let reader = parse_fastx_file(&path).map_err(|e| FastaError::Parse(e.to_string()))?;
        Self::collect_records(reader)
    }

    fn parse_gzipped_file<P: AsRef<Path>>(path: P) -> Result<Vec<Sequence>> {
        let file = File::open(&path).map_err(FastaError::Io)?;
        let decoder = GzDecoder::new(file);

        Self::parse_reader(BufReader::new(decoder))
    }

    /// Parse FASTA/FASTQ data from any readable source
    pub fn parse_reader<R: std::io::Read + Send>(reader: R) -> Result<Vec<Sequence>> {
        let fastx_reader = parse_fastx_reader(reader).map_err(|e| FastaError::Parse(e.to_string()))?;
        Self::collect_records(fastx_reader)
    }

    fn collect_records<'a>(mut reader: Box<dyn FastxReader + 'a>) -> Result<Vec<Sequence>> {
        let mut sequences = Vec::new();
        while let Some(record) = reader.next() {
            let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;
            sequences.push(Self::record_to_sequence(&record));
        }

        if sequences.is_empty() {
            Err(FastaError::EmptyFile.into())
        } else {
            Ok(sequences)
        }
    }

    /// needletail hands back the whole header line; split off the description
    fn record_to_sequence(record: &needletail::parser::SequenceRecord) -> Sequence {
        let header = String::from_utf8_lossy(record.id());
        let (id, description) = match header.split_once(char::is_whitespace) {
            Some((id, rest)) if !rest.trim().is_empty() => (id.to_string(), Some(rest.trim().to_string())),
            Some((id, _)) => (id.to_string(), None),
            None => (header.to_string(), None),
        };

        let sequence = Sequence::new(id, record.seq().to_vec());
        match description {
            Some(desc) => sequence.with_description(desc),
            None => sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_fasta_reader() {
        let fasta_data = ">seq1 description of sequence 1\n\
                          ATCGATCGATCG\n\
                          >seq2\n\
                          GCTAGCTAGCTA\n";

        let cursor = Cursor::new(fasta_data);
        let sequences = FastaParser::parse_reader(cursor).unwrap();

        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].id, "seq1");
        assert_eq!(sequences[0].description, Some("description of sequence 1".to_string()));
        assert_eq!(sequences[0].data, b"ATCGATCGATCG");
        assert_eq!(sequences[0].len(), 12);

        assert_eq!(sequences[1].id, "seq2");
        assert_eq!(sequences[1].description, None);
        assert_eq!(sequences[1].data, b"GCTAGCTAGCTA");
    }

    #[test]
    fn test_parse_multiline_fasta() {
        let fasta_data = ">chr1\nACGT\nTTGA\nCC\n";
        let sequences = FastaParser::parse_reader(Cursor::new(fasta_data)).unwrap();
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].data, b"ACGTTTGACC");
    }

    #[test]
    fn test_parse_fastq_reader() {
        let fastq_data = "@seq1 description\n\
                          ATCGATCG\n\
                          +\n\
                          IIIIIIII\n\
                          @seq2\n\
                          GCTAGCTA\n\
                          +\n\
                          HHHHHHHH\n";

        let sequences = FastaParser::parse_reader(Cursor::new(fastq_data)).unwrap();

        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].id, "seq1");
        assert_eq!(sequences[0].description, Some("description".to_string()));
        assert_eq!(sequences[0].data, b"ATCGATCG");
        assert_eq!(sequences[1].id, "seq2");
    }

    #[test]
    fn test_file_and_reader_agree() {
        use std::io::Write;

        let fasta_data = ">chr1 first\nACGTACGT\nTT\n>chr2\nGGCC\n";
        let mut file = tempfile::Builder::new().suffix(".fa").tempfile().unwrap();
        file.write_all(fasta_data.as_bytes()).unwrap();
        file.flush().unwrap();

        let from_file = FastaParser::parse_file(file.path()).unwrap();
        let from_reader = FastaParser::parse_reader(Cursor::new(fasta_data)).unwrap();
        assert_eq!(from_file, from_reader);
        assert_eq!(from_file[0].data, b"ACGTACGTTT");
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(FastaParser::parse_reader(Cursor::new("")).is_err());
    }
}
