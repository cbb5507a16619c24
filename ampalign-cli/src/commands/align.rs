//! Align command implementation - align the first records of two FASTA files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use ampalign_core::io::FastaParser;
use ampalign_core::{validate_nucleotides, GlobalAligner, OrientationSelector};

use super::{require_file, AlignmentReport};
use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::OutputFormat;

pub fn execute(
    config: &Config,
    seq_a: PathBuf,
    seq_b: PathBuf,
    orient: bool,
    format: OutputFormat,
) -> Result<()> {
    let a = load_first_sequence(&seq_a)?;
    let b = load_first_sequence(&seq_b)?;

    let report = align_sequences(config, &a, &b, orient)?;
    print!("{}", report.render(format)?);
    Ok(())
}

fn load_first_sequence(path: &Path) -> Result<Vec<u8>> {
    require_file(path)?;
    let record = FastaParser::first_record(path)
        .with_context(|| format!("Failed to read sequence from {}", path.display()))?;
    validate_nucleotides(&record.seq)
        .map_err(|e| CliError::invalid_input(format!("{} in {}", e, path.display())))?;
    log::info!("Loaded {} ({} bp) from {}", record.id, record.seq.len(), path.display());
    Ok(record.seq)
}

/// Plain global alignment, or the best of the four strand combinations with `orient`.
pub fn align_sequences(
    config: &Config,
    a: &[u8],
    b: &[u8],
    orient: bool,
) -> CliResult<AlignmentReport> {
    if orient {
        let oriented = OrientationSelector::new(config.scoring())
            .with_tie_break(config.align.tie_break)
            .with_parallel(config.general.parallel_orientations)
            .select(a, b)?;
        Ok(AlignmentReport::from_oriented(&oriented))
    } else {
        let alignment = GlobalAligner::new(config.scoring()).align(a, b)?;
        Ok(AlignmentReport::from_alignment(&alignment))
    }
}
