use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::{Config, Overrides};
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "ampalign")]
#[command(about = "In-silico PCR on two assemblies and global alignment of the amplicons")]
#[command(version)]
#[command(long_about = "
ampalign finds the amplicon bounded by a primer pair in each of two assemblies
(blastn for primer search, seqtk for extraction) and reports the best-scoring
Needleman-Wunsch alignment over the four strand combinations.

Examples:
  ampalign compare -1 asm1.fa -2 asm2.fa -p primers.fa -m 2000 --match 1 --mismatch -1 --gap -1
  ampalign ispcr -a asm1.fa -p primers.fa -m 2000 --all
  ampalign align a.fa b.fa --orient
  ampalign config --example > ampalign.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads to use
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Locate the amplicon in two assemblies and align them
    Compare {
        /// First assembly (FASTA)
        #[arg(short = '1', long = "assembly1")]
        assembly1: PathBuf,

        /// Second assembly (FASTA)
        #[arg(short = '2', long = "assembly2")]
        assembly2: PathBuf,

        /// Primer file (FASTA)
        #[arg(short, long)]
        primers: PathBuf,

        /// Maximum amplicon size (exclusive)
        #[arg(short = 'm', long = "max-amplicon-size")]
        max_amplicon_size: Option<u64>,

        /// Match score
        #[arg(long = "match", allow_hyphen_values = true)]
        match_score: Option<i32>,

        /// Mismatch score
        #[arg(long = "mismatch", allow_hyphen_values = true)]
        mismatch_score: Option<i32>,

        /// Gap score
        #[arg(long = "gap", allow_hyphen_values = true)]
        gap_score: Option<i32>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the amplicon(s) found in one assembly as FASTA
    Ispcr {
        /// Assembly (FASTA)
        #[arg(short, long)]
        assembly: PathBuf,

        /// Primer file (FASTA)
        #[arg(short, long)]
        primers: PathBuf,

        /// Maximum amplicon size (exclusive)
        #[arg(short = 'm', long = "max-amplicon-size")]
        max_amplicon_size: Option<u64>,

        /// Print every qualifying amplicon instead of one
        #[arg(long)]
        all: bool,
    },

    /// Globally align the first records of two FASTA files
    Align {
        /// First sequence file (FASTA)
        seq_a: PathBuf,

        /// Second sequence file (FASTA)
        seq_b: PathBuf,

        /// Try all four strand combinations and keep the best
        #[arg(long)]
        orient: bool,

        /// Match score
        #[arg(long = "match", allow_hyphen_values = true)]
        match_score: Option<i32>,

        /// Mismatch score
        #[arg(long = "mismatch", allow_hyphen_values = true)]
        mismatch_score: Option<i32>,

        /// Gap score
        #[arg(long = "gap", allow_hyphen_values = true)]
        gap_score: Option<i32>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Configuration helpers
    Config {
        /// Print the default configuration as TOML
        #[arg(long)]
        example: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    // RUST_LOG wins over the flags when set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())
        .map_err(|e| CliError::config(format!("{:#}", e)))?;

    let overrides = match &cli.command {
        Commands::Compare {
            max_amplicon_size,
            match_score,
            mismatch_score,
            gap_score,
            ..
        } => Overrides {
            threads: cli.threads,
            max_amplicon_size: *max_amplicon_size,
            match_score: *match_score,
            mismatch_score: *mismatch_score,
            gap_score: *gap_score,
        },
        Commands::Ispcr { max_amplicon_size, .. } => Overrides {
            threads: cli.threads,
            max_amplicon_size: *max_amplicon_size,
            ..Default::default()
        },
        Commands::Align {
            match_score,
            mismatch_score,
            gap_score,
            ..
        } => Overrides {
            threads: cli.threads,
            match_score: *match_score,
            mismatch_score: *mismatch_score,
            gap_score: *gap_score,
            ..Default::default()
        },
        Commands::Config { .. } => Overrides::default(),
    };
    config.apply(&overrides);

    if config.general.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.general.threads)
            .build_global()
            .context("Failed to set thread count")?;
    }

    match cli.command {
        Commands::Compare {
            assembly1,
            assembly2,
            primers,
            format,
            ..
        } => commands::compare::execute(&config, assembly1, assembly2, primers, format),

        Commands::Ispcr {
            assembly,
            primers,
            all,
            ..
        } => commands::ispcr::execute(&config, assembly, primers, all),

        Commands::Align {
            seq_a,
            seq_b,
            orient,
            format,
            ..
        } => commands::align::execute(&config, seq_a, seq_b, orient, format),

        Commands::Config { example } => {
            if example {
                print!("{}", Config::example_toml()?);
            } else {
                println!("Use 'ampalign config --example' to print the default configuration");
            }
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => print_error_and_exit(cli_err),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}
