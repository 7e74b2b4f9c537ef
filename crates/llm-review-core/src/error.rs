use std::time::Duration;

use thiserror::Error;

/// Every way a review invocation can fail.
///
/// The rendered message of each variant starts with the word `Error` so CI
/// callers can detect a failed review by inspecting the output file.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error(
        "Error: The following required environment variables are missing or not set properly: {}.",
        .missing.join(", ")
    )]
    Config { missing: Vec<&'static str> },

    #[error("Error: LLM API request timed out after {}.", seconds(.secs))]
    Timeout { secs: f64 },

    #[error("Error: LLM API returned HTTP {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Error calling LLM API: {0}")]
    Transport(String),

    #[error("Error: Could not parse LLM API response ({reason}). Raw response: {body}")]
    Parse { reason: String, body: String },

    #[error("Error: An unexpected error occurred: {0}")]
    Unexpected(String),
}

fn seconds(secs: &f64) -> String {
    if *secs == 1.0 {
        "1 second".to_string()
    } else {
        format!("{secs} seconds")
    }
}

impl From<std::io::Error> for ReviewError {
    fn from(err: std::io::Error) -> Self {
        ReviewError::Unexpected(format!("IO error: {err}"))
    }
}

impl ReviewError {
    /// Classifies a `reqwest` failure into the timeout/transport split.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ReviewError::Timeout {
                secs: timeout.as_secs_f64(),
            }
        } else {
            ReviewError::Transport(err.to_string())
        }
    }

    /// Short machine-readable name of the failure category.
    pub fn kind(&self) -> &'static str {
        match self {
            ReviewError::Config { .. } => "config",
            ReviewError::Timeout { .. } => "timeout",
            ReviewError::Http { .. } => "http",
            ReviewError::Transport(_) => "transport",
            ReviewError::Parse { .. } => "parse",
            ReviewError::Unexpected(_) => "unexpected",
        }
    }
}
