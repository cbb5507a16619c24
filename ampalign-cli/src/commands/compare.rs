//! Compare command implementation - in-silico PCR on two assemblies, then align the amplicons

use anyhow::Result;
use std::path::{Path, PathBuf};

use ampalign_core::{AmpliconLocator, OrientationSelector, PrimerSearch, SubsequenceExtractor};

use super::{require_file, AlignmentReport};
use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::OutputFormat;

pub fn execute(
    config: &Config,
    assembly1: PathBuf,
    assembly2: PathBuf,
    primers: PathBuf,
    format: OutputFormat,
) -> Result<()> {
    require_file(&primers)?;
    require_file(&assembly1)?;
    require_file(&assembly2)?;

    let search = config.blastn();
    let extractor = config.seqtk();
    ensure_available(search.is_available(), search.name(), search.binary_path())?;
    ensure_available(extractor.is_available(), extractor.name(), extractor.binary_path())?;

    let report = compare_assemblies(config, &search, &extractor, &assembly1, &assembly2, &primers)?;
    print!("{}", report.render(format)?);
    Ok(())
}

/// Locate both amplicons and align them in their best orientation.
///
/// Stops at the first assembly without an amplicon; nothing is aligned unless both exist.
pub fn compare_assemblies(
    config: &Config,
    search: &dyn PrimerSearch,
    extractor: &dyn SubsequenceExtractor,
    assembly1: &Path,
    assembly2: &Path,
    primers: &Path,
) -> CliResult<AlignmentReport> {
    let locator = AmpliconLocator::new(search, extractor, config.locator_params());

    log::info!("Running in-silico PCR on {}", assembly1.display());
    let amplicon_a = locator.locate(primers, assembly1)?;
    log::info!("Running in-silico PCR on {}", assembly2.display());
    let amplicon_b = locator.locate(primers, assembly2)?;

    log::info!(
        "Aligning amplicons of {} bp and {} bp",
        amplicon_a.len(),
        amplicon_b.len()
    );
    let oriented = OrientationSelector::new(config.scoring())
        .with_tie_break(config.align.tie_break)
        .with_parallel(config.general.parallel_orientations)
        .select(&amplicon_a.sequence, &amplicon_b.sequence)?;

    let mut report = AlignmentReport::from_oriented(&oriented);
    report.amplicon_a = Some(amplicon_a.coordinate.region_label());
    report.amplicon_b = Some(amplicon_b.coordinate.region_label());
    Ok(report)
}

/// Error out before any work when a configured tool cannot be found.
pub(crate) fn ensure_available(available: bool, tool: &str, path: &Path) -> CliResult<()> {
    if available {
        Ok(())
    } else {
        Err(CliError::external_tool(
            tool.to_string(),
            format!("binary not found: {}", path.display()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ampalign_core::tools::ToolResult;
    use ampalign_core::{AmpliconCoordinate, Orientation, SequenceHit};
    use std::cell::Cell;

    const CONTIG: &[u8] = b"TTTTTAAAAACCGGTTGCATTTTTTTTTT";

    /// Primer hits only for assemblies whose file name starts with "good".
    struct FakeSearch;

    impl PrimerSearch for FakeSearch {
        fn search(&self, _primers: &Path, assembly: &Path) -> ToolResult<Vec<SequenceHit>> {
            let name = assembly.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if !name.starts_with("good") {
                return Ok(Vec::new());
            }
            let mut fwd = SequenceHit::new("fwd", "c1", 1, 5);
            let mut rev = SequenceHit::new("rev", "c1", 25, 21);
            for hit in [&mut fwd, &mut rev] {
                hit.alignment_length = 5;
                hit.query_length = 5;
            }
            Ok(vec![fwd, rev])
        }

        fn name(&self) -> &'static str {
            "fake-search"
        }
    }

    /// Returns the contig slice, reverse-complemented for "good_rc" assemblies.
    struct FakeExtractor {
        calls: Cell<usize>,
    }

    impl SubsequenceExtractor for FakeExtractor {
        fn extract(&self, assembly: &Path, coord: &AmpliconCoordinate) -> ToolResult<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            let slice = &CONTIG[coord.start as usize..coord.end as usize];
            if assembly.ends_with("good_rc.fa") {
                Ok(ampalign_core::reverse_complement(slice).unwrap_or_default())
            } else {
                Ok(slice.to_vec())
            }
        }

        fn name(&self) -> &'static str {
            "fake-extract"
        }
    }

    #[test]
    fn test_compare_finds_reverse_orientation() {
        let extractor = FakeExtractor { calls: Cell::new(0) };
        let report = compare_assemblies(
            &Config::default(),
            &FakeSearch,
            &extractor,
            Path::new("good.fa"),
            Path::new("good_rc.fa"),
            Path::new("primers.fa"),
        )
        .unwrap();

        // amplicon is CONTIG[5..21]
        assert_eq!(report.orientation, Some(Orientation::ReverseB));
        assert_eq!(report.score, 16);
        assert_eq!(report.aligned_a, report.aligned_b);
        assert_eq!(report.amplicon_a.as_deref(), Some("c1:5-21"));
        assert_eq!(extractor.calls.get(), 2);
    }

    #[test]
    fn test_missing_amplicon_names_assembly() {
        let extractor = FakeExtractor { calls: Cell::new(0) };
        let err = compare_assemblies(
            &Config::default(),
            &FakeSearch,
            &extractor,
            Path::new("good.fa"),
            Path::new("other.fa"),
            Path::new("primers.fa"),
        )
        .unwrap_err();

        assert!(matches!(&err, CliError::NoAmplicon { assembly } if assembly == Path::new("other.fa")));
        assert_eq!(extractor.calls.get(), 1);
    }

    #[test]
    fn test_ensure_available() {
        assert!(ensure_available(true, "seqtk", Path::new("seqtk")).is_ok());
        let err = ensure_available(false, "blastn", Path::new("/opt/blastn")).unwrap_err();
        assert!(err.to_string().contains("/opt/blastn"));
    }
}
