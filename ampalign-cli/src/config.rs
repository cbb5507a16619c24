//! Configuration handling for the ampalign CLI
//!
//! Supports loading configuration from ampalign.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use ampalign_core::tools::resolve_binary;
use ampalign_core::{BlastnSearch, LocatorParams, PairSelection, ScoringScheme, SeqtkExtractor, TieBreak};

/// Name of the configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ampalign.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ispcr: IsPcrConfig,
    #[serde(default)]
    pub align: AlignConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default number of threads to use
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Align the four strand combinations concurrently
    #[serde(default = "default_true")]
    pub parallel_orientations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsPcrConfig {
    /// Amplicons must be strictly shorter than this
    #[serde(default = "default_max_amplicon_size")]
    pub max_amplicon_size: u64,

    /// Minimum percent identity for a primer hit
    #[serde(default = "default_min_percent_identity")]
    pub min_percent_identity: f64,

    /// Pair used when several qualify: "first" or "shortest"
    #[serde(default)]
    pub pair_selection: PairSelection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignConfig {
    #[serde(default = "default_match_score")]
    pub match_score: i32,

    #[serde(default = "default_mismatch_score")]
    pub mismatch_score: i32,

    #[serde(default = "default_gap_score")]
    pub gap_score: i32,

    /// Orientation tie-break: "earliest" or "legacy"
    #[serde(default)]
    pub tie_break: TieBreak,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// blastn binary; looked up on PATH when unset
    #[serde(default)]
    pub blastn: Option<PathBuf>,

    /// seqtk binary; looked up on PATH when unset
    #[serde(default)]
    pub seqtk: Option<PathBuf>,

    #[serde(default = "default_blastn_task")]
    pub blastn_task: String,
}

// Default value functions
fn default_threads() -> usize { num_cpus::get() }
fn default_true() -> bool { true }
fn default_max_amplicon_size() -> u64 { LocatorParams::default().max_amplicon_size }
fn default_min_percent_identity() -> f64 { LocatorParams::default().min_percent_identity }
fn default_match_score() -> i32 { ScoringScheme::default().match_score }
fn default_mismatch_score() -> i32 { ScoringScheme::default().mismatch_score }
fn default_gap_score() -> i32 { ScoringScheme::default().gap_score }
fn default_blastn_task() -> String { ampalign_core::tools::blastn::DEFAULT_TASK.to_string() }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            parallel_orientations: true,
        }
    }
}

impl Default for IsPcrConfig {
    fn default() -> Self {
        Self {
            max_amplicon_size: default_max_amplicon_size(),
            min_percent_identity: default_min_percent_identity(),
            pair_selection: PairSelection::default(),
        }
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            match_score: default_match_score(),
            mismatch_score: default_mismatch_score(),
            gap_score: default_gap_score(),
            tie_break: TieBreak::default(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            blastn: None,
            seqtk: None,
            blastn_task: default_blastn_task(),
        }
    }
}

/// Values given on the command line; each one replaces the file value when set.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub threads: Option<usize>,
    pub max_amplicon_size: Option<u64>,
    pub match_score: Option<i32>,
    pub mismatch_score: Option<i32>,
    pub gap_score: Option<i32>,
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(threads) = overrides.threads {
            self.general.threads = threads;
        }
        if let Some(max) = overrides.max_amplicon_size {
            self.ispcr.max_amplicon_size = max;
        }
        if let Some(score) = overrides.match_score {
            self.align.match_score = score;
        }
        if let Some(score) = overrides.mismatch_score {
            self.align.mismatch_score = score;
        }
        if let Some(score) = overrides.gap_score {
            self.align.gap_score = score;
        }
    }

    pub fn scoring(&self) -> ScoringScheme {
        ScoringScheme::new(
            self.align.match_score,
            self.align.mismatch_score,
            self.align.gap_score,
        )
    }

    pub fn locator_params(&self) -> LocatorParams {
        LocatorParams {
            max_amplicon_size: self.ispcr.max_amplicon_size,
            min_percent_identity: self.ispcr.min_percent_identity,
            pair_selection: self.ispcr.pair_selection,
        }
    }

    pub fn blastn(&self) -> BlastnSearch {
        BlastnSearch::with_binary_path(resolve_binary(self.tools.blastn.as_deref(), "blastn"))
            .with_task(self.tools.blastn_task.clone())
    }

    pub fn seqtk(&self) -> SeqtkExtractor {
        SeqtkExtractor::with_binary_path(resolve_binary(self.tools.seqtk.as_deref(), "seqtk"))
    }
}
