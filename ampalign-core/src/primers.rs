//! Primer-pair resolution
//!
//! Turns filtered primer hits into forward/reverse pairs that bound an
//! amplicon. Hits must be sorted ascending by subject start; pairs come out in
//! nested-scan order (outer forward hit, then inner reverse hit, both by
//! start).

use serde::{Deserialize, Serialize};

use crate::types::{PrimerPair, SequenceHit};

/// Minimum percent identity for a primer hit to be kept.
pub const DEFAULT_MIN_PERCENT_IDENTITY: f64 = 80.0;

/// How a single pair is picked when the resolver reports several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairSelection {
    /// First pair in scan order
    #[default]
    First,
    /// Smallest amplicon length; ties keep scan order
    Shortest,
}

impl PairSelection {
    pub fn select<'a>(&self, pairs: &'a [PrimerPair]) -> Option<&'a PrimerPair> {
        match self {
            PairSelection::First => pairs.first(),
            // min_by_key returns the first minimum
            PairSelection::Shortest => pairs.iter().min_by_key(|p| p.amplicon_length()),
        }
    }
}

impl std::str::FromStr for PairSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(PairSelection::First),
            "shortest" => Ok(PairSelection::Shortest),
            other => Err(format!("Unknown pair selection: {} (expected first or shortest)", other)),
        }
    }
}

/// Keep full-length hits at or above `min_identity` and sort them by subject start.
///
/// The sort is stable, so hits sharing a start keep their search-tool order.
pub fn filter_and_sort_hits(hits: Vec<SequenceHit>, min_identity: f64) -> Vec<SequenceHit> {
    let mut kept: Vec<SequenceHit> = hits
        .into_iter()
        .filter(|hit| hit.is_full_length(min_identity))
        .collect();
    kept.sort_by_key(|hit| hit.subject_start);
    kept
}

/// Every plus-strand hit paired with every later minus-strand hit whose
/// amplicon length lies strictly between 0 and `max_amplicon_size`.
pub fn find_pairs(sorted_hits: &[SequenceHit], max_amplicon_size: u64) -> Vec<PrimerPair> {
    debug_assert!(
        sorted_hits.windows(2).all(|w| w[0].subject_start <= w[1].subject_start),
        "hits must be sorted by subject start"
    );

    let mut pairs = Vec::new();
    for (i, forward) in sorted_hits.iter().enumerate() {
        if !forward.is_plus_strand() {
            continue;
        }
        for reverse in &sorted_hits[i + 1..] {
            if !reverse.is_minus_strand() {
                continue;
            }
            let amplicon_length = reverse.min_coord() as i64 - forward.subject_end as i64;
            if amplicon_length > 0 && amplicon_length < max_amplicon_size as i64 {
                log::debug!(
                    "Primer pair {} ({}..{}) / {} ({}..{}) on {}: amplicon length {}",
                    forward.primer_id,
                    forward.subject_start,
                    forward.subject_end,
                    reverse.primer_id,
                    reverse.subject_start,
                    reverse.subject_end,
                    forward.subject_id,
                    amplicon_length
                );
                pairs.push(PrimerPair {
                    forward: forward.clone(),
                    reverse: reverse.clone(),
                });
            }
        }
    }
    pairs
}
