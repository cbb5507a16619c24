use serde::{Deserialize, Serialize};

/// 1-based genomic coordinate as reported by the sequence-search tool.
pub type GenomicPos = u64;

/// One primer-to-assembly match from a BLAST tabular record.
///
/// Coordinates are 1-based and inclusive. `subject_start > subject_end`
/// marks a match on the minus strand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceHit {
    pub primer_id: String,
    pub subject_id: String,
    pub percent_identity: f64,
    pub alignment_length: u64,
    pub query_length: u64,
    pub subject_start: GenomicPos,
    pub subject_end: GenomicPos,
}

impl SequenceHit {
    pub fn new(
        primer_id: impl Into<String>,
        subject_id: impl Into<String>,
        subject_start: GenomicPos,
        subject_end: GenomicPos,
    ) -> Self {
        Self {
            primer_id: primer_id.into(),
            subject_id: subject_id.into(),
            percent_identity: 100.0,
            alignment_length: 0,
            query_length: 0,
            subject_start,
            subject_end,
        }
    }

    pub fn is_plus_strand(&self) -> bool {
        self.subject_start < self.subject_end
    }

    pub fn is_minus_strand(&self) -> bool {
        self.subject_start > self.subject_end
    }

    pub fn min_coord(&self) -> GenomicPos {
        self.subject_start.min(self.subject_end)
    }

    /// True when the primer aligns end-to-end with at least `min_identity` percent identity.
    pub fn is_full_length(&self, min_identity: f64) -> bool {
        self.percent_identity >= min_identity && self.alignment_length == self.query_length
    }
}

/// A plus-strand hit and a later minus-strand hit pointing toward each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimerPair {
    pub forward: SequenceHit,
    pub reverse: SequenceHit,
}

impl PrimerPair {
    /// Distance from the 3' end of the forward hit to the leftmost base of the reverse hit.
    pub fn amplicon_length(&self) -> i64 {
        self.reverse.min_coord() as i64 - self.forward.subject_end as i64
    }

    /// Zero-based, half-open extraction range on the forward hit's contig.
    pub fn coordinate(&self) -> AmpliconCoordinate {
        AmpliconCoordinate {
            contig_id: self.forward.subject_id.clone(),
            start: self.forward.subject_end,
            end: self.reverse.min_coord(),
        }
    }
}

/// Zero-based, half-open range used to request extraction from an assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmpliconCoordinate {
    pub contig_id: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
}

impl AmpliconCoordinate {
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render as a single BED line (no trailing newline).
    pub fn to_bed_line(&self) -> String {
        format!("{}\t{}\t{}", self.contig_id, self.start, self.end)
    }

    /// `contig:start-end` label used for FASTA headers and log lines.
    pub fn region_label(&self) -> String {
        format!("{}:{}-{}", self.contig_id, self.start, self.end)
    }
}

/// Linear-gap scoring: `match_score`/`mismatch_score` per substitution,
/// `gap_score` per inserted or deleted symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringScheme {
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_score: i32,
}

impl ScoringScheme {
    pub fn new(match_score: i32, mismatch_score: i32, gap_score: i32) -> Self {
        Self {
            match_score,
            mismatch_score,
            gap_score,
        }
    }

    #[inline]
    pub fn substitution(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            match_score: 1,
            mismatch_score: -1,
            gap_score: -1,
        }
    }
}
