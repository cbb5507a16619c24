//! Command implementations for the ampalign CLI

pub mod align;
pub mod compare;
pub mod ispcr;

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use ampalign_core::{AlignmentResult, AlignmentStats, Orientation, OrientedAlignment};

use crate::error::{CliError, CliResult};
use crate::OutputFormat;

/// Alignment output as written for `--format json`.
#[derive(Debug, Serialize)]
pub struct AlignmentReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    pub score: i32,
    pub aligned_a: String,
    pub aligned_b: String,
    pub cigar: String,
    pub identity: f64,
    pub stats: AlignmentStats,
    /// Scores in forward, rc(A), rc(B), rc(A)+rc(B) order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation_scores: Option<[i32; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amplicon_a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amplicon_b: Option<String>,
}

impl AlignmentReport {
    pub fn from_alignment(alignment: &AlignmentResult) -> Self {
        let stats = alignment.stats();
        Self {
            orientation: None,
            score: alignment.score,
            aligned_a: alignment.aligned_a_str(),
            aligned_b: alignment.aligned_b_str(),
            cigar: alignment.cigar(),
            identity: stats.identity(),
            stats,
            orientation_scores: None,
            amplicon_a: None,
            amplicon_b: None,
        }
    }

    pub fn from_oriented(oriented: &OrientedAlignment) -> Self {
        Self {
            orientation: Some(oriented.orientation),
            orientation_scores: Some(oriented.scores),
            ..Self::from_alignment(&oriented.alignment)
        }
    }

    /// Aligned A, aligned B, a blank line, then the score.
    pub fn to_text(&self) -> String {
        format!("{}\n{}\n\n{}\n", self.aligned_a, self.aligned_b, self.score)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(self)?;
                json.push('\n');
                Ok(json)
            }
        }
    }
}

/// Fail early with a readable error when an input file is missing.
pub fn require_file(path: &Path) -> CliResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::file_not_found(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alignment() -> AlignmentResult {
        AlignmentResult {
            aligned_a: b"ACGT".to_vec(),
            aligned_b: b"A-GT".to_vec(),
            score: 2,
        }
    }

    #[test]
    fn test_text_output_shape() {
        let report = AlignmentReport::from_alignment(&alignment());
        assert_eq!(report.to_text(), "ACGT\nA-GT\n\n2\n");
    }

    #[test]
    fn test_json_output() -> Result<()> {
        let oriented = OrientedAlignment {
            orientation: Orientation::ReverseA,
            alignment: alignment(),
            scores: [-2, 2, 2, -2],
        };
        let json = AlignmentReport::from_oriented(&oriented).render(OutputFormat::Json)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;

        assert_eq!(value["orientation"], "reverse_a");
        assert_eq!(value["score"], 2);
        assert_eq!(value["cigar"], "1=1I2=");
        assert_eq!(value["stats"]["insertions"], 1);
        assert_eq!(value["orientation_scores"][1], 2);
        assert!(value.get("amplicon_a").is_none());
        Ok(())
    }

    #[test]
    fn test_require_file() {
        let missing = Path::new("/definitely/not/here.fa");
        assert!(matches!(
            require_file(missing),
            Err(CliError::FileNotFound { .. })
        ));
    }
}
