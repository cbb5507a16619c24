//! Ispcr command implementation - print the amplicon(s) bounded by a primer pair

use anyhow::Result;
use std::path::PathBuf;

use ampalign_core::{AmpliconLocator, PrimerSearch, SubsequenceExtractor};

use super::compare::ensure_available;
use super::require_file;
use crate::config::Config;
use crate::error::CliError;

/// FASTA line width for printed amplicons
const LINE_WIDTH: usize = 60;

pub fn execute(config: &Config, assembly: PathBuf, primers: PathBuf, all: bool) -> Result<()> {
    require_file(&primers)?;
    require_file(&assembly)?;

    let search = config.blastn();
    let extractor = config.seqtk();
    ensure_available(search.is_available(), search.name(), search.binary_path())?;
    ensure_available(extractor.is_available(), extractor.name(), extractor.binary_path())?;

    let locator = AmpliconLocator::new(&search, &extractor, config.locator_params());
    let amplicons = if all {
        locator.locate_all(&primers, &assembly).map_err(CliError::from)?
    } else {
        vec![locator.locate(&primers, &assembly).map_err(CliError::from)?]
    };

    log::info!("Found {} amplicon(s) in {}", amplicons.len(), assembly.display());
    for amplicon in &amplicons {
        print!("{}", amplicon.to_record().to_fasta(LINE_WIDTH));
    }
    Ok(())
}
