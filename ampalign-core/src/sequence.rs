//! Nucleotide sequence helpers
//!
//! Reverse complementation accepts `A C G T N` in either case. The case of
//! each base is preserved and `N` maps to itself. Any other symbol is
//! rejected rather than passed through, so a malformed amplicon never reaches
//! the aligner silently.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Invalid nucleotide '{base}' at position {position}")]
    InvalidBase { base: char, position: usize },
}

pub type SequenceResult<T> = Result<T, SequenceError>;

#[inline]
fn complement(base: u8) -> Option<u8> {
    match base {
        b'A' => Some(b'T'),
        b'T' => Some(b'A'),
        b'C' => Some(b'G'),
        b'G' => Some(b'C'),
        b'N' => Some(b'N'),
        b'a' => Some(b't'),
        b't' => Some(b'a'),
        b'c' => Some(b'g'),
        b'g' => Some(b'c'),
        b'n' => Some(b'n'),
        _ => None,
    }
}

/// Reverse complement a DNA sequence.
pub fn reverse_complement(seq: &[u8]) -> SequenceResult<Vec<u8>> {
    let mut out = Vec::with_capacity(seq.len());
    for (offset, &base) in seq.iter().rev().enumerate() {
        match complement(base) {
            Some(c) => out.push(c),
            None => {
                return Err(SequenceError::InvalidBase {
                    base: base as char,
                    position: seq.len() - 1 - offset,
                })
            }
        }
    }
    Ok(out)
}

/// Check that every symbol is one the reverse complement understands.
pub fn validate_nucleotides(seq: &[u8]) -> SequenceResult<()> {
    match seq.iter().position(|&b| complement(b).is_none()) {
        Some(position) => Err(SequenceError::InvalidBase {
            base: seq[position] as char,
            position,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"ACGT").unwrap(), b"ACGT"); // palindrome
        assert_eq!(reverse_complement(b"AAAA").unwrap(), b"TTTT");
        assert_eq!(reverse_complement(b"AACCG").unwrap(), b"CGGTT");
    }

    #[test]
    fn test_reverse_complement_preserves_case() {
        assert_eq!(reverse_complement(b"acGT").unwrap(), b"ACgt");
        assert_eq!(reverse_complement(b"ANt").unwrap(), b"aNT");
    }

    #[test]
    fn test_reverse_complement_rejects_ambiguity_codes() {
        let err = reverse_complement(b"ACRT").unwrap_err();
        assert_eq!(
            err,
            SequenceError::InvalidBase {
                base: 'R',
                position: 2
            }
        );
    }

    #[test]
    fn test_validate_nucleotides() {
        assert!(validate_nucleotides(b"ACGTNacgtn").is_ok());
        assert!(validate_nucleotides(b"").is_ok());
        assert!(matches!(
            validate_nucleotides(b"AC-T"),
            Err(SequenceError::InvalidBase { base: '-', position: 2 })
        ));
    }

    proptest! {
        #[test]
        fn reverse_complement_is_an_involution(seq in "[ACGT]{0,200}") {
            let once = reverse_complement(seq.as_bytes()).unwrap();
            let twice = reverse_complement(&once).unwrap();
            prop_assert_eq!(twice, seq.as_bytes().to_vec());
        }
    }
}
