//! In-silico PCR
//!
//! Locates the primer-bounded amplicon in an assembly: search primers,
//! keep full-length hits, pair them, then extract the bounded sequence.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::io::FastaRecord;
use crate::primers::{filter_and_sort_hits, find_pairs, PairSelection, DEFAULT_MIN_PERCENT_IDENTITY};
use crate::tools::{PrimerSearch, SubsequenceExtractor, ToolError};
use crate::types::{AmpliconCoordinate, PrimerPair};

#[derive(Debug, Error)]
pub enum IsPcrError {
    #[error("No amplicon found in {}", assembly.display())]
    NoAmpliconFound { assembly: PathBuf },

    #[error("In-silico PCR failed for {}: {source}", assembly.display())]
    Tool {
        assembly: PathBuf,
        #[source]
        source: ToolError,
    },
}

impl IsPcrError {
    pub fn assembly(&self) -> &Path {
        match self {
            IsPcrError::NoAmpliconFound { assembly } | IsPcrError::Tool { assembly, .. } => assembly,
        }
    }
}

pub type IsPcrResult<T> = Result<T, IsPcrError>;

/// Parameters for one in-silico PCR run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatorParams {
    /// Amplicons must be strictly shorter than this
    pub max_amplicon_size: u64,
    /// Minimum percent identity of a kept primer hit
    pub min_percent_identity: f64,
    /// Which pair to extract when several qualify
    pub pair_selection: PairSelection,
}

impl LocatorParams {
    pub fn new(max_amplicon_size: u64) -> Self {
        Self {
            max_amplicon_size,
            ..Default::default()
        }
    }
}

impl Default for LocatorParams {
    fn default() -> Self {
        Self {
            max_amplicon_size: 2000,
            min_percent_identity: DEFAULT_MIN_PERCENT_IDENTITY,
            pair_selection: PairSelection::First,
        }
    }
}

/// A located amplicon: where it is, which primers bound it, and its sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Amplicon {
    pub coordinate: AmpliconCoordinate,
    pub pair: PrimerPair,
    pub sequence: Vec<u8>,
}

impl Amplicon {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn to_record(&self) -> FastaRecord {
        FastaRecord::new(self.coordinate.region_label(), self.sequence.clone())
    }
}

/// Runs in-silico PCR with pluggable search and extraction tools.
pub struct AmpliconLocator<'a> {
    search: &'a dyn PrimerSearch,
    extractor: &'a dyn SubsequenceExtractor,
    params: LocatorParams,
}

impl<'a> AmpliconLocator<'a> {
    pub fn new(
        search: &'a dyn PrimerSearch,
        extractor: &'a dyn SubsequenceExtractor,
        params: LocatorParams,
    ) -> Self {
        Self {
            search,
            extractor,
            params,
        }
    }

    pub fn params(&self) -> &LocatorParams {
        &self.params
    }

    /// Every valid primer pair in `assembly`, in scan order.
    pub fn primer_pairs(&self, primers: &Path, assembly: &Path) -> IsPcrResult<Vec<PrimerPair>> {
        let tool_err = |source: ToolError| IsPcrError::Tool {
            assembly: assembly.to_path_buf(),
            source,
        };

        let hits = self.search.search(primers, assembly).map_err(tool_err)?;
        let total = hits.len();
        let kept = filter_and_sort_hits(hits, self.params.min_percent_identity);
        log::info!(
            "{}: kept {} of {} {} hits (identity >= {}%, full length)",
            assembly.display(),
            kept.len(),
            total,
            self.search.name(),
            self.params.min_percent_identity
        );

        let pairs = find_pairs(&kept, self.params.max_amplicon_size);
        log::info!(
            "{}: {} primer pair(s) below {} bp",
            assembly.display(),
            pairs.len(),
            self.params.max_amplicon_size
        );
        Ok(pairs)
    }

    /// The single amplicon picked by the pair-selection policy.
    pub fn locate(&self, primers: &Path, assembly: &Path) -> IsPcrResult<Amplicon> {
        let pairs = self.primer_pairs(primers, assembly)?;
        let pair = self
            .params
            .pair_selection
            .select(&pairs)
            .ok_or_else(|| IsPcrError::NoAmpliconFound {
                assembly: assembly.to_path_buf(),
            })?;

        if pairs.len() > 1 {
            log::warn!(
                "{}: {} primer pairs qualify, using {:?} selection",
                assembly.display(),
                pairs.len(),
                self.params.pair_selection
            );
        }

        self.extract(assembly, pair.clone())
    }

    /// One amplicon per valid primer pair, in scan order.
    pub fn locate_all(&self, primers: &Path, assembly: &Path) -> IsPcrResult<Vec<Amplicon>> {
        let pairs = self.primer_pairs(primers, assembly)?;
        if pairs.is_empty() {
            return Err(IsPcrError::NoAmpliconFound {
                assembly: assembly.to_path_buf(),
            });
        }
        pairs
            .into_iter()
            .map(|pair| self.extract(assembly, pair))
            .collect()
    }

    fn extract(&self, assembly: &Path, pair: PrimerPair) -> IsPcrResult<Amplicon> {
        let coordinate = pair.coordinate();
        log::info!(
            "{}: extracting {} ({} and {})",
            assembly.display(),
            coordinate.region_label(),
            pair.forward.primer_id,
            pair.reverse.primer_id
        );

        let sequence = self
            .extractor
            .extract(assembly, &coordinate)
            .map_err(|source| IsPcrError::Tool {
                assembly: assembly.to_path_buf(),
                source,
            })?;

        Ok(Amplicon {
            coordinate,
            pair,
            sequence,
        })
    }
}
