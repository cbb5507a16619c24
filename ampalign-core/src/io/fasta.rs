//! FASTA reading and BED writing
//!
//! Extracted amplicons come back from the subsequence tool as FASTA text,
//! parsed here with needletail so wrapped and unwrapped records both work.
//! Extraction requests go out as BED lines.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

use needletail::{parse_fastx_file, parse_fastx_reader};

use crate::types::AmpliconCoordinate;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty file or no sequences found")]
    EmptyFile,
}

pub type FastaResult<T> = Result<T, FastaError>;

/// One FASTA record: identifier (first header word) and raw sequence bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

impl FastaRecord {
    pub fn new(id: impl Into<String>, seq: Vec<u8>) -> Self {
        Self { id: id.into(), seq }
    }

    /// Render with the sequence wrapped at `line_width` columns (0 = single line).
    pub fn to_fasta(&self, line_width: usize) -> String {
        let mut out = format!(">{}\n", self.id);
        if line_width == 0 {
            out.push_str(&String::from_utf8_lossy(&self.seq));
            out.push('\n');
        } else {
            for chunk in self.seq.chunks(line_width) {
                out.push_str(&String::from_utf8_lossy(chunk));
                out.push('\n');
            }
        }
        out
    }
}

fn record_id(raw: &[u8]) -> String {
    let header = String::from_utf8_lossy(raw);
    header.split_whitespace().next().unwrap_or_default().to_string()
}

/// FASTA parser for extracted amplicons and user-supplied sequences
pub struct FastaParser;

impl FastaParser {
    /// Parse FASTA data held in memory, e.g. captured tool output.
    pub fn parse_bytes(data: &[u8]) -> FastaResult<Vec<FastaRecord>> {
        if data.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(FastaError::EmptyFile);
        }
        let reader = parse_fastx_reader(std::io::Cursor::new(data.to_vec()))
            .map_err(|e| FastaError::Parse(e.to_string()))?;
        Self::collect(reader)
    }

    pub fn parse_file<P: AsRef<Path>>(path: P) -> FastaResult<Vec<FastaRecord>> {
        let metadata = std::fs::metadata(&path)?;
        if metadata.len() == 0 {
            return Err(FastaError::EmptyFile);
        }
        let reader = parse_fastx_file(&path).map_err(|e| FastaError::Parse(e.to_string()))?;
        Self::collect(reader)
    }

    /// First record of a file.
    pub fn first_record<P: AsRef<Path>>(path: P) -> FastaResult<FastaRecord> {
        Self::parse_file(path)?
            .into_iter()
            .next()
            .ok_or(FastaError::EmptyFile)
    }

    fn collect(mut reader: Box<dyn needletail::parser::FastxReader>) -> FastaResult<Vec<FastaRecord>> {
        let mut records = Vec::new();
        while let Some(record) = reader.next() {
            let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;
            records.push(FastaRecord::new(record_id(record.id()), record.seq().to_vec()));
        }

        if records.is_empty() {
            Err(FastaError::EmptyFile)
        } else {
            Ok(records)
        }
    }
}

/// Write coordinates as a BED file for the extraction tool.
///
/// The file is removed when the returned handle is dropped.
pub fn write_bed_file(coords: &[AmpliconCoordinate]) -> FastaResult<NamedTempFile> {
    let mut temp_file = tempfile::Builder::new().suffix(".bed").tempfile()?;
    for coord in coords {
        writeln!(temp_file, "{}", coord.to_bed_line())?;
    }
    temp_file.flush()?;
    Ok(temp_file)
}
