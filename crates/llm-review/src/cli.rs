use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use llm_review_core::config::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS};

/// Request an LLM review of a diff or source file.
///
/// Reads LLM_API_KEY, LLM_ENDPOINT and LLM_MODEL_NAME from the environment.
/// The review, or an error message starting with "Error", is always written
/// to OUTPUT_PATH.
#[derive(Parser, Debug)]
#[command(name = "review", version)]
pub struct Cli {
    /// Diff or source file to review
    pub artifact_path: PathBuf,

    /// File the review is written to (parent directories are created)
    pub output_path: PathBuf,

    /// Treat the artifact as a diff instead of a whole source file
    #[arg(long)]
    pub diff: bool,

    /// Maximum tokens the model may generate
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Sampling temperature
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f64,

    /// Seconds to wait for the LLM before giving up
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Output machine-readable JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(long, conflicts_with = "json")]
    pub quiet: bool,

    /// Color mode
    #[arg(long, default_value = "auto")]
    pub color: ColorMode,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}
