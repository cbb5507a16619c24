//! Orientation selection
//!
//! Aligns two amplicons in all four strand combinations and keeps the
//! highest-scoring one.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::align::{AlignResult, AlignmentResult, GlobalAligner};
use crate::sequence::reverse_complement;
use crate::types::ScoringScheme;

/// The four strand combinations, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// A vs B
    Forward,
    /// revcomp(A) vs B
    ReverseA,
    /// A vs revcomp(B)
    ReverseB,
    /// revcomp(A) vs revcomp(B)
    ReverseBoth,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Forward,
        Orientation::ReverseA,
        Orientation::ReverseB,
        Orientation::ReverseBoth,
    ];

    pub fn reverses_a(&self) -> bool {
        matches!(self, Orientation::ReverseA | Orientation::ReverseBoth)
    }

    pub fn reverses_b(&self) -> bool {
        matches!(self, Orientation::ReverseB | Orientation::ReverseBoth)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Forward => "A/B",
            Orientation::ReverseA => "rc(A)/B",
            Orientation::ReverseB => "A/rc(B)",
            Orientation::ReverseBoth => "rc(A)/rc(B)",
        }
    }
}

/// How equal scores across orientations are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// The earliest orientation holding the top score wins.
    Earliest,
    /// An orientation wins only when it strictly beats every later one;
    /// `ReverseBoth` is the fallback. Ties go to the later orientation.
    #[default]
    Legacy,
}

impl TieBreak {
    /// Index into [`Orientation::ALL`] of the winning score.
    pub fn pick(&self, scores: &[i32; 4]) -> usize {
        match self {
            TieBreak::Earliest => {
                let best = scores.iter().copied().max().unwrap_or(i32::MIN);
                scores.iter().position(|&s| s == best).unwrap_or(3)
            }
            TieBreak::Legacy => (0..3)
                .find(|&i| scores[i + 1..].iter().all(|&later| scores[i] > later))
                .unwrap_or(3),
        }
    }
}

impl std::str::FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "earliest" => Ok(TieBreak::Earliest),
            "legacy" => Ok(TieBreak::Legacy),
            other => Err(format!("Unknown tie break: {} (expected earliest or legacy)", other)),
        }
    }
}

/// Winning alignment plus the scores of all four orientations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrientedAlignment {
    pub orientation: Orientation,
    pub alignment: AlignmentResult,
    /// Scores in [`Orientation::ALL`] order
    pub scores: [i32; 4],
}

#[derive(Debug, Clone, Copy)]
pub struct OrientationSelector {
    aligner: GlobalAligner,
    tie_break: TieBreak,
    parallel: bool,
}

impl OrientationSelector {
    pub fn new(scoring: ScoringScheme) -> Self {
        Self {
            aligner: GlobalAligner::new(scoring),
            tie_break: TieBreak::default(),
            parallel: false,
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Run the four alignments on the rayon pool. Results are identical to the sequential path.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn select(&self, seq_a: &[u8], seq_b: &[u8]) -> AlignResult<OrientedAlignment> {
        let rc_a = reverse_complement(seq_a)?;
        let rc_b = reverse_complement(seq_b)?;

        let inputs: Vec<(&[u8], &[u8])> = Orientation::ALL
            .iter()
            .map(|o| {
                let a: &[u8] = if o.reverses_a() { &rc_a } else { seq_a };
                let b: &[u8] = if o.reverses_b() { &rc_b } else { seq_b };
                (a, b)
            })
            .collect();

        let mut results: Vec<AlignmentResult> = if self.parallel {
            inputs
                .par_iter()
                .map(|(a, b)| self.aligner.align(a, b))
                .collect::<AlignResult<Vec<_>>>()?
        } else {
            inputs
                .iter()
                .map(|(a, b)| self.aligner.align(a, b))
                .collect::<AlignResult<Vec<_>>>()?
        };

        let scores = [
            results[0].score,
            results[1].score,
            results[2].score,
            results[3].score,
        ];
        let winner = self.tie_break.pick(&scores);
        let orientation = Orientation::ALL[winner];

        for (o, score) in Orientation::ALL.iter().zip(scores) {
            log::debug!("Orientation {}: score {}", o.label(), score);
        }
        log::info!(
            "Best orientation {} with score {}",
            orientation.label(),
            scores[winner]
        );

        let alignment = results.swap_remove(winner);

        Ok(OrientedAlignment {
            orientation,
            alignment,
            scores,
        })
    }
}

/// Best-scoring alignment over the four strand combinations of `seq_a` and `seq_b`.
pub fn best_alignment(
    seq_a: &[u8],
    seq_b: &[u8],
    scoring: &ScoringScheme,
) -> AlignResult<AlignmentResult> {
    OrientationSelector::new(*scoring)
        .select(seq_a, seq_b)
        .map(|oriented| oriented.alignment)
}
