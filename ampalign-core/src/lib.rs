//! AmpAlign Core Library
//!
//! In-silico PCR against genome assemblies and global alignment of the
//! resulting amplicons across all four strand orientations.

pub mod types;
pub mod sequence;
pub mod align;
pub mod primers;
pub mod orientation;
pub mod io;
pub mod tools;
pub mod ispcr;

// Re-export commonly used types and functions
pub use types::{AmpliconCoordinate, PrimerPair, ScoringScheme, SequenceHit};
pub use align::{align, AlignError, AlignmentResult, AlignmentStats, GlobalAligner};
pub use primers::{filter_and_sort_hits, find_pairs, PairSelection};
pub use orientation::{best_alignment, Orientation, OrientationSelector, OrientedAlignment, TieBreak};
pub use sequence::{reverse_complement, validate_nucleotides, SequenceError};
pub use ispcr::{Amplicon, AmpliconLocator, IsPcrError, LocatorParams};
pub use tools::{BlastnSearch, PrimerSearch, SeqtkExtractor, SubsequenceExtractor, ToolError};

/// Version information for the AmpAlign core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
