use std::io::{self, Write};

use colored::*;
use serde::Serialize;

/// Output mode for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Quiet,
}

/// Accumulated JSON result entry.
#[derive(Debug, Serialize, Clone)]
pub struct JsonResultEntry {
    #[serde(rename = "type")]
    pub result_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Accumulated JSON output.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub results: Vec<JsonResultEntry>,
}

/// Write a line to stdout, ignoring a closed pipe or any other failure.
macro_rules! out {
    ($($arg:tt)*) => {{
        let _ = writeln!(io::stdout(), $($arg)*);
    }};
}

/// Like `out!` but for stderr.
macro_rules! eout {
    ($($arg:tt)*) => {{
        let _ = writeln!(io::stderr(), $($arg)*);
    }};
}

/// Reporter handles all console output; the review file is written separately.
///
/// Console writes never fail the run: if stdout or stderr has gone away the
/// message is dropped.
pub struct Reporter {
    mode: OutputMode,
    json_results: Vec<JsonResultEntry>,
}

impl Reporter {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            json_results: Vec::new(),
        }
    }

    /// Returns the current output mode.
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    fn push(&mut self, result_type: &str, message: &str, details: Option<&str>) {
        self.json_results.push(JsonResultEntry {
            result_type: result_type.to_string(),
            message: message.to_string(),
            details: details.map(str::to_string),
        });
    }

    pub fn error(&mut self, message: &str) {
        match self.mode {
            OutputMode::Human | OutputMode::Quiet => {
                eout!("{} {}", "ERROR:".red(), message);
            }
            OutputMode::Json => self.push("error", message, None),
        }
    }

    pub fn success(&mut self, message: &str) {
        match self.mode {
            OutputMode::Human => {
                out!("{} {}", "✓".green(), message);
            }
            OutputMode::Json => self.push("success", message, None),
            OutputMode::Quiet => {}
        }
    }

    pub fn info(&mut self, message: &str) {
        match self.mode {
            OutputMode::Human => {
                out!("{} {}", "INFO:".blue(), message);
            }
            OutputMode::Json => self.push("info", message, None),
            OutputMode::Quiet => {}
        }
    }

    /// Free-form guidance attached to the previous error.
    pub fn hint(&mut self, text: &str) {
        match self.mode {
            OutputMode::Human => eout!("{text}"),
            OutputMode::Json => self.push("hint", text, None),
            OutputMode::Quiet => {}
        }
    }

    pub fn section(&mut self, title: &str) {
        if self.mode == OutputMode::Human {
            out!("{}", format!("=== {title} ===").cyan());
        }
    }

    /// Echo the review text itself.
    pub fn review(&mut self, text: &str) {
        match self.mode {
            OutputMode::Human => out!("{text}"),
            OutputMode::Json => self.push("review", "Review received", Some(text)),
            OutputMode::Quiet => {}
        }
    }

    pub fn finish(&self) {
        if self.mode == OutputMode::Json {
            let output = JsonOutput {
                results: self.json_results.clone(),
            };
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                out!("{json}");
            }
        }
    }
}
