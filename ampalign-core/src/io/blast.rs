//! BLAST tabular output parser
//!
//! Reads `-outfmt "6 std qlen"` records: the twelve standard columns
//! (qseqid sseqid pident length mismatch gapopen qstart qend sstart send
//! evalue bitscore) followed by the query length.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

use crate::types::SequenceHit;

/// Output format string passed to blastn so that [`BlastParser`] can read it.
pub const BLAST_OUTFMT: &str = "6 std qlen";

const FIELD_COUNT: usize = 13;

#[derive(Debug, Error)]
pub enum BlastError {
    #[error("Invalid BLAST tabular line: insufficient fields (expected 13, got {0})")]
    InsufficientFields(usize),
    #[error("Invalid {column} value: {value}")]
    InvalidField { column: &'static str, value: String },
    #[error("Error parsing line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<BlastError>,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BlastResult<T> = Result<T, BlastError>;

fn parse_column<T: std::str::FromStr>(value: &str, column: &'static str) -> BlastResult<T> {
    value.trim().parse::<T>().map_err(|_| BlastError::InvalidField {
        column,
        value: value.to_string(),
    })
}

/// Parser for BLAST tabular (`6 std qlen`) output
pub struct BlastParser;

impl BlastParser {
    /// Parse a single tabular line into a SequenceHit
    pub fn parse_line(line: &str) -> BlastResult<SequenceHit> {
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() < FIELD_COUNT {
            return Err(BlastError::InsufficientFields(fields.len()));
        }

        Ok(SequenceHit {
            primer_id: fields[0].to_string(),
            subject_id: fields[1].to_string(),
            percent_identity: parse_column(fields[2], "pident")?,
            alignment_length: parse_column(fields[3], "length")?,
            subject_start: parse_column(fields[8], "sstart")?,
            subject_end: parse_column(fields[9], "send")?,
            query_length: parse_column(fields[12], "qlen")?,
        })
    }

    /// Parse tabular data from any BufRead source
    pub fn parse_reader<R: BufRead>(reader: R) -> BlastResult<Vec<SequenceHit>> {
        let mut hits = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;

            // Skip empty lines and outfmt 7 style comments
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let hit = Self::parse_line(&line).map_err(|e| BlastError::Line {
                line: line_num + 1,
                source: Box::new(e),
            })?;
            hits.push(hit);
        }

        Ok(hits)
    }

    pub fn parse_str(data: &str) -> BlastResult<Vec<SequenceHit>> {
        Self::parse_reader(data.as_bytes())
    }

    pub fn parse_file<P: AsRef<Path>>(path: P) -> BlastResult<Vec<SequenceHit>> {
        let file = File::open(path)?;
        Self::parse_reader(BufReader::new(file))
    }
}
