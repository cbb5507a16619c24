//! seqtk wrapper for amplicon extraction
//!
//! Writes the requested range to a temporary BED file and runs
//! `seqtk subseq <assembly> <bed>`, reading the FASTA it prints.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{binary_available, resolve_binary, run_tool, SubsequenceExtractor, ToolError, ToolResult};
use crate::io::{write_bed_file, FastaError, FastaParser, FastaRecord};
use crate::types::AmpliconCoordinate;

/// seqtk subsequence extractor
pub struct SeqtkExtractor {
    binary_path: PathBuf,
}

impl SeqtkExtractor {
    pub fn new() -> Self {
        Self {
            binary_path: resolve_binary(None, "seqtk"),
        }
    }

    /// Create extractor with custom binary path
    pub fn with_binary_path(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Extract several ranges in one seqtk run, one record per range seqtk could resolve.
    pub fn extract_records(
        &self,
        assembly: &Path,
        coords: &[AmpliconCoordinate],
    ) -> ToolResult<Vec<FastaRecord>> {
        let bed = write_bed_file(coords)?;

        let mut cmd = Command::new(&self.binary_path);
        cmd.arg("subseq").arg(assembly).arg(bed.path());

        let output = run_tool("seqtk", cmd)?;
        match FastaParser::parse_bytes(&output.stdout) {
            Ok(records) => Ok(records),
            Err(FastaError::EmptyFile) => Err(ToolError::EmptyOutput {
                tool: "seqtk",
                what: coords
                    .iter()
                    .map(|c| c.region_label())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for SeqtkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SubsequenceExtractor for SeqtkExtractor {
    fn extract(&self, assembly: &Path, coord: &AmpliconCoordinate) -> ToolResult<Vec<u8>> {
        let mut records = self.extract_records(assembly, std::slice::from_ref(coord))?;
        let record = records.swap_remove(0);
        log::debug!(
            "seqtk extracted {} bp for {}",
            record.seq.len(),
            coord.region_label()
        );
        Ok(record.seq)
    }

    fn name(&self) -> &'static str {
        "seqtk"
    }

    fn is_available(&self) -> bool {
        binary_available(&self.binary_path)
    }
}
