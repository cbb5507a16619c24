//! File format I/O for AmpAlign
//!
//! BLAST tabular parsing for primer hits, FASTA parsing for extracted
//! amplicons and BED writing for extraction requests.

pub mod blast;
pub mod fasta;

pub use blast::{BlastError, BlastParser, BLAST_OUTFMT};
pub use fasta::{write_bed_file, FastaError, FastaParser, FastaRecord};
