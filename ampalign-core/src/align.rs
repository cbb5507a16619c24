//! Global alignment engine
//!
//! Needleman-Wunsch over two nucleotide sequences with a linear gap penalty.
//! The DP table holds integer scores and every cell records the predecessor
//! move that produced it. When several moves reach the same score the
//! diagonal wins, then the up move (gap in `seq_b`), then the left move
//! (gap in `seq_a`), which makes the traceback fully deterministic.

use serde::Serialize;
use thiserror::Error;

use crate::sequence::SequenceError;
use crate::types::ScoringScheme;

/// Gap marker used in aligned output.
pub const GAP: u8 = b'-';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignError {
    #[error("Cannot align an empty sequence ({which})")]
    EmptySequence { which: &'static str },

    #[error("Alignment score {score} does not fit in a 32-bit integer")]
    ScoreOverflow { score: i64 },

    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

pub type AlignResult<T> = Result<T, AlignError>;

/// Two gapped sequences of equal length and the global alignment score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentResult {
    pub aligned_a: Vec<u8>,
    pub aligned_b: Vec<u8>,
    pub score: i32,
}

/// Column counts of an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AlignmentStats {
    pub matches: u32,
    pub mismatches: u32,
    /// Gap in `seq_b` (symbol present only in `seq_a`)
    pub insertions: u32,
    /// Gap in `seq_a` (symbol present only in `seq_b`)
    pub deletions: u32,
}

impl AlignmentStats {
    pub fn columns(&self) -> u32 {
        self.matches + self.mismatches + self.insertions + self.deletions
    }

    /// Identity percentage (0.0 to 100.0)
    pub fn identity(&self) -> f64 {
        let total = self.columns();
        if total == 0 {
            return 0.0;
        }
        self.matches as f64 / total as f64 * 100.0
    }
}

impl AlignmentResult {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.aligned_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_a.is_empty()
    }

    pub fn stats(&self) -> AlignmentStats {
        let mut stats = AlignmentStats::default();
        for (&a, &b) in self.aligned_a.iter().zip(&self.aligned_b) {
            match (a, b) {
                (GAP, _) => stats.deletions += 1,
                (_, GAP) => stats.insertions += 1,
                (a, b) if a == b => stats.matches += 1,
                _ => stats.mismatches += 1,
            }
        }
        stats
    }

    /// Extended CIGAR string (`=`, `X`, `I`, `D`) with `seq_a` as the query.
    pub fn cigar(&self) -> String {
        let mut cigar = String::new();
        let mut last: Option<char> = None;
        let mut run = 0usize;

        for (&a, &b) in self.aligned_a.iter().zip(&self.aligned_b) {
            let op = match (a, b) {
                (GAP, _) => 'D',
                (_, GAP) => 'I',
                (a, b) if a == b => '=',
                _ => 'X',
            };
            if Some(op) == last {
                run += 1;
            } else {
                if let Some(prev) = last {
                    cigar.push_str(&format!("{}{}", run, prev));
                }
                last = Some(op);
                run = 1;
            }
        }
        if let Some(prev) = last {
            cigar.push_str(&format!("{}{}", run, prev));
        }
        cigar
    }

    pub fn aligned_a_str(&self) -> String {
        String::from_utf8_lossy(&self.aligned_a).into_owned()
    }

    pub fn aligned_b_str(&self) -> String {
        String::from_utf8_lossy(&self.aligned_b).into_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TracebackOp {
    None,
    Diagonal,
    Up,
    Left,
}

/// Needleman-Wunsch aligner bound to one scoring scheme.
#[derive(Debug, Clone, Copy)]
pub struct GlobalAligner {
    scoring: ScoringScheme,
}

impl GlobalAligner {
    pub fn new(scoring: ScoringScheme) -> Self {
        Self { scoring }
    }

    pub fn scoring(&self) -> &ScoringScheme {
        &self.scoring
    }

    /// Optimal end-to-end alignment of `seq_a` against `seq_b`.
    pub fn align(&self, seq_a: &[u8], seq_b: &[u8]) -> AlignResult<AlignmentResult> {
        if seq_a.is_empty() {
            return Err(AlignError::EmptySequence { which: "seq_a" });
        }
        if seq_b.is_empty() {
            return Err(AlignError::EmptySequence { which: "seq_b" });
        }

        let (dp, traceback) = self.fill(seq_a, seq_b);
        let m = seq_a.len();
        let n = seq_b.len();

        let mut aligned_a = Vec::with_capacity(m + n);
        let mut aligned_b = Vec::with_capacity(m + n);
        let mut i = m;
        let mut j = n;

        // Built back to front, reversed once at the end
        while i > 0 || j > 0 {
            match traceback[i][j] {
                TracebackOp::Diagonal => {
                    aligned_a.push(seq_a[i - 1]);
                    aligned_b.push(seq_b[j - 1]);
                    i -= 1;
                    j -= 1;
                }
                TracebackOp::Up => {
                    aligned_a.push(seq_a[i - 1]);
                    aligned_b.push(GAP);
                    i -= 1;
                }
                TracebackOp::Left => {
                    aligned_a.push(GAP);
                    aligned_b.push(seq_b[j - 1]);
                    j -= 1;
                }
                TracebackOp::None => break,
            }
        }
        aligned_a.reverse();
        aligned_b.reverse();

        let score = i32::try_from(dp[m][n]).map_err(|_| AlignError::ScoreOverflow { score: dp[m][n] })?;

        Ok(AlignmentResult {
            aligned_a,
            aligned_b,
            score,
        })
    }

    // Accumulated in i64; `align` narrows the final score back to i32
    fn fill(&self, seq_a: &[u8], seq_b: &[u8]) -> (Vec<Vec<i64>>, Vec<Vec<TracebackOp>>) {
        let m = seq_a.len();
        let n = seq_b.len();
        let gap = i64::from(self.scoring.gap_score);

        let mut dp = vec![vec![0i64; n + 1]; m + 1];
        let mut traceback = vec![vec![TracebackOp::None; n + 1]; m + 1];

        for i in 1..=m {
            dp[i][0] = i as i64 * gap;
            traceback[i][0] = TracebackOp::Up;
        }
        for j in 1..=n {
            dp[0][j] = j as i64 * gap;
            traceback[0][j] = TracebackOp::Left;
        }

        for i in 1..=m {
            for j in 1..=n {
                let diagonal =
                    dp[i - 1][j - 1] + i64::from(self.scoring.substitution(seq_a[i - 1], seq_b[j - 1]));
                let up = dp[i - 1][j] + gap;
                let left = dp[i][j - 1] + gap;

                let (best, op) = if diagonal >= up && diagonal >= left {
                    (diagonal, TracebackOp::Diagonal)
                } else if up >= left {
                    (up, TracebackOp::Up)
                } else {
                    (left, TracebackOp::Left)
                };

                dp[i][j] = best;
                traceback[i][j] = op;
            }
        }

        (dp, traceback)
    }
}

/// Align `seq_a` against `seq_b` with an explicit scoring scheme.
pub fn align(seq_a: &[u8], seq_b: &[u8], scoring: &ScoringScheme) -> AlignResult<AlignmentResult> {
    GlobalAligner::new(*scoring).align(seq_a, seq_b)
}
