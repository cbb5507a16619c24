//! Error handling for the ampalign CLI

use std::path::PathBuf;
use thiserror::Error;

use ampalign_core::{AlignError, IsPcrError, ToolError};

/// Main error type for ampalign CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("No amplicon found in {}", assembly.display())]
    NoAmplicon { assembly: PathBuf },

    #[error("External tool error: {tool} - {message}")]
    ExternalTool { tool: String, message: String },

    #[error("Alignment error: {message}")]
    Alignment { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    pub fn external_tool<S: Into<String>>(tool: S, message: S) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

impl From<IsPcrError> for CliError {
    fn from(err: IsPcrError) -> Self {
        match err {
            IsPcrError::NoAmpliconFound { assembly } => Self::NoAmplicon { assembly },
            IsPcrError::Tool { assembly, source } => {
                let message = format!("{} ({})", source, assembly.display());
                match source.tool() {
                    Some(tool) => Self::external_tool(tool.to_string(), message),
                    None => Self::invalid_input(message),
                }
            }
        }
    }
}

impl From<ToolError> for CliError {
    fn from(err: ToolError) -> Self {
        match err.tool() {
            Some(tool) => Self::external_tool(tool.to_string(), err.to_string()),
            None => Self::invalid_input(err.to_string()),
        }
    }
}

impl From<AlignError> for CliError {
    fn from(err: AlignError) -> Self {
        Self::Alignment { message: err.to_string() }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

fn install_hint(tool: &str) -> &'static str {
    match tool {
        "blastn" => "Install BLAST+: https://blast.ncbi.nlm.nih.gov/doc/blast-help/downloadblastdata.html",
        "seqtk" => "Install seqtk: https://github.com/lh3/seqtk",
        _ => "Install the missing tool",
    }
}

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::NoAmplicon { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check that the primers match this assembly\n\
                 • Increase the maximum amplicon size with -m\n\
                 • Lower [ispcr] min_percent_identity in ampalign.toml",
            );
        }

        CliError::ExternalTool { tool, .. } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • {}\n\
                 • Ensure {} is in your PATH or set its path under [tools] in ampalign.toml",
                install_hint(tool),
                tool
            ));
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your ampalign.toml configuration file\n\
                 • Use 'ampalign config --example' to generate a sample configuration",
            );
        }

        CliError::InvalidInput { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Sequences must contain only A, C, G, T or N\n\
                 • Ensure the FASTA files are not empty or truncated",
            );
        }

        CliError::Alignment { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Sequences must contain only A, C, G, T or N\n\
                 • Keep --match, --mismatch and --gap within a few orders of magnitude",
            );
        }
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
