//! blastn wrapper for primer search
//!
//! Runs `blastn -query <primers> -subject <assembly> -task blastn-short
//! -outfmt "6 std qlen"` and parses the tabular output into SequenceHits.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{binary_available, resolve_binary, run_tool, PrimerSearch, ToolResult};
use crate::io::{BlastParser, BLAST_OUTFMT};
use crate::types::SequenceHit;

/// Task tuned for queries shorter than 50 bases.
pub const DEFAULT_TASK: &str = "blastn-short";

/// blastn primer search engine
pub struct BlastnSearch {
    binary_path: PathBuf,
    task: String,
}

impl BlastnSearch {
    pub fn new() -> Self {
        Self {
            binary_path: resolve_binary(None, "blastn"),
            task: DEFAULT_TASK.to_string(),
        }
    }

    /// Create a search engine with a custom binary path
    pub fn with_binary_path(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            task: DEFAULT_TASK.to_string(),
        }
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = task.into();
        self
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    fn build_command_args(&self, primers: &Path, assembly: &Path) -> Vec<String> {
        vec![
            "-query".to_string(),
            primers.to_string_lossy().to_string(),
            "-subject".to_string(),
            assembly.to_string_lossy().to_string(),
            "-task".to_string(),
            self.task.clone(),
            "-outfmt".to_string(),
            BLAST_OUTFMT.to_string(),
        ]
    }
}

impl Default for BlastnSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimerSearch for BlastnSearch {
    fn search(&self, primers: &Path, assembly: &Path) -> ToolResult<Vec<SequenceHit>> {
        let mut cmd = Command::new(&self.binary_path);
        cmd.args(self.build_command_args(primers, assembly));

        let output = run_tool("blastn", cmd)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let hits = BlastParser::parse_str(&stdout)?;

        log::info!(
            "blastn reported {} primer hits in {}",
            hits.len(),
            assembly.display()
        );
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "blastn"
    }

    fn is_available(&self) -> bool {
        binary_available(&self.binary_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blastn_creation() {
        let search = BlastnSearch::with_binary_path(PathBuf::from("/custom/path/blastn"));
        assert_eq!(search.name(), "blastn");
        assert_eq!(search.binary_path(), Path::new("/custom/path/blastn"));
        assert_eq!(search.task, DEFAULT_TASK);
        assert!(!search.is_available());
    }

    #[test]
    fn test_command_args_building() {
        let search = BlastnSearch::with_binary_path(PathBuf::from("blastn")).with_task("blastn");
        let args = search.build_command_args(Path::new("primers.fa"), Path::new("asm.fa"));
        assert_eq!(
            args,
            vec![
                "-query", "primers.fa", "-subject", "asm.fa", "-task", "blastn", "-outfmt",
                "6 std qlen"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_search_parses_tool_output() {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        // Stand-in script that prints canned tabular output
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("blastn");
        let mut file = std::fs::File::create(&script).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        writeln!(
            file,
            "printf 'fwd\\tc1\\t100.000\\t20\\t0\\t0\\t1\\t20\\t11\\t30\\t1e-5\\t40.1\\t20\\n'"
        )
        .unwrap();
        drop(file);
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let search = BlastnSearch::with_binary_path(script);
        assert!(search.is_available());
        let hits = search
            .search(Path::new("primers.fa"), Path::new("asm.fa"))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].subject_id, "c1");
        assert_eq!(hits[0].subject_end, 30);
    }

    // Integration test - only runs if blastn is available
    #[test]
    fn test_blastn_integration() {
        let search = BlastnSearch::new();
        if !search.is_available() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let primers = dir.path().join("primers.fa");
        let assembly = dir.path().join("asm.fa");
        std::fs::write(&primers, ">p\nACGTTGCAAGGCTTACGGAT\n").unwrap();
        std::fs::write(
            &assembly,
            ">c1\nTTTTTTTTTTACGTTGCAAGGCTTACGGATTTTTTTTTTTTTTTTTTT\n",
        )
        .unwrap();

        let hits = search.search(&primers, &assembly).unwrap();
        assert!(hits.iter().any(|h| h.subject_start == 11 && h.subject_end == 30));
    }
}
