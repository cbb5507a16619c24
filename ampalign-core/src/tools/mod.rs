//! External tool wrappers
//!
//! Primer search (blastn) and subsequence extraction (seqtk) run as
//! subprocesses. Both sit behind traits so the amplicon locator can be driven
//! by other implementations, including in-memory fakes in tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::io::{BlastError, FastaError};
use crate::types::{AmpliconCoordinate, SequenceHit};

pub mod blastn;
pub mod seqtk;

pub use blastn::BlastnSearch;
pub use seqtk::SeqtkExtractor;

/// Result type for external tool operations
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur while running an external tool
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{tool} binary not found: {path}")]
    NotFound { tool: &'static str, path: PathBuf },

    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed with exit code {code:?}: {stderr}")]
    Failed {
        tool: &'static str,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{tool} produced no output for {what}")]
    EmptyOutput { tool: &'static str, what: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid BLAST output: {0}")]
    Blast(#[from] BlastError),

    #[error("Invalid FASTA output: {0}")]
    Fasta(#[from] FastaError),
}

impl ToolError {
    /// Name of the tool involved, when the error came from one.
    pub fn tool(&self) -> Option<&'static str> {
        match self {
            ToolError::NotFound { tool, .. }
            | ToolError::Spawn { tool, .. }
            | ToolError::Failed { tool, .. }
            | ToolError::EmptyOutput { tool, .. } => Some(*tool),
            _ => None,
        }
    }
}

/// Finds primer matches in an assembly.
pub trait PrimerSearch {
    /// Every primer hit in `assembly`, unfiltered and in tool order.
    fn search(&self, primers: &Path, assembly: &Path) -> ToolResult<Vec<SequenceHit>>;

    fn name(&self) -> &'static str;

    /// Check if the backing tool can run
    fn is_available(&self) -> bool {
        true
    }
}

/// Pulls a subsequence out of an assembly.
pub trait SubsequenceExtractor {
    /// Nucleotides of `coord` (zero-based, half-open) in `assembly`.
    fn extract(&self, assembly: &Path, coord: &AmpliconCoordinate) -> ToolResult<Vec<u8>>;

    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool {
        true
    }
}

/// Resolve a binary: explicit path first, then PATH lookup, then the bare name.
pub fn resolve_binary(explicit: Option<&Path>, default_name: &str) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => which::which(default_name).unwrap_or_else(|_| PathBuf::from(default_name)),
    }
}

/// Check if a binary can be located, either as a path or on PATH.
pub fn binary_available(binary: &Path) -> bool {
    if binary.components().count() > 1 {
        binary.is_file()
    } else {
        which::which(binary).is_ok()
    }
}

/// Run a prepared command to completion, turning a non-zero exit into [`ToolError::Failed`].
pub(crate) fn run_tool(tool: &'static str, mut cmd: Command) -> ToolResult<Output> {
    log::debug!("Running {}: {:?}", tool, cmd);

    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| ToolError::Spawn { tool, source })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ToolError::Failed {
            tool,
            code: output.status.code(),
            stderr,
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_binary() {
        let path = resolve_binary(Some(Path::new("/opt/blast/bin/blastn")), "blastn");
        assert_eq!(path, PathBuf::from("/opt/blast/bin/blastn"));
    }

    #[test]
    fn test_resolve_missing_binary_falls_back_to_name() {
        let path = resolve_binary(None, "ampalign-no-such-tool");
        assert_eq!(path, PathBuf::from("ampalign-no-such-tool"));
        assert!(!binary_available(&path));
    }

    #[test]
    fn test_run_tool_reports_spawn_failure() {
        let cmd = Command::new("ampalign-no-such-tool");
        let err = run_tool("fake", cmd).unwrap_err();
        assert!(matches!(err, ToolError::Spawn { tool: "fake", .. }));
        assert_eq!(err.tool(), Some("fake"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_tool_reports_exit_status() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo boom >&2; exit 3"]);
        match run_tool("sh", cmd) {
            Err(ToolError::Failed { code, stderr, .. }) => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
