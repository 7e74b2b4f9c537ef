//! The single result of a review invocation and its persistence.
//!
//! [`OutputGuard`] makes sure the output file is written exactly once on
//! every path: call [`OutputGuard::finalize`] with the outcome, and if the
//! guard is dropped without being finalized (early return or unwinding) a
//! fallback error message is written instead.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::artifact::ArtifactKind;
use crate::error::ReviewError;

/// Written when the guard is dropped before an outcome was recorded.
pub const INTERRUPTED_MESSAGE: &str =
    "Error: The review did not complete; no result was produced.";

#[derive(Debug)]
pub enum ReviewOutcome {
    /// The LLM returned review text (already trimmed).
    Reviewed(String),
    /// The artifact was empty; no request was made.
    NothingToReview(ArtifactKind),
    Failed(ReviewError),
}

impl ReviewOutcome {
    /// Text written to the output file.
    pub fn contents(&self) -> Cow<'_, str> {
        match self {
            ReviewOutcome::Reviewed(text) => Cow::Borrowed(text),
            ReviewOutcome::NothingToReview(kind) => Cow::Borrowed(kind.nothing_to_review()),
            ReviewOutcome::Failed(err) => Cow::Owned(err.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, ReviewOutcome::Failed(_))
    }

    /// `0` for a review or nothing-to-review, `1` for any failure.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

impl From<Result<String, ReviewError>> for ReviewOutcome {
    fn from(result: Result<String, ReviewError>) -> Self {
        match result {
            Ok(text) => ReviewOutcome::Reviewed(text),
            Err(err) => ReviewOutcome::Failed(err),
        }
    }
}

/// Write `contents` to `path`, creating the parent directory if needed.
pub fn write_output(path: &Path, contents: &str) -> Result<(), ReviewError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    debug!(path = %path.display(), bytes = contents.len(), "Wrote review output");
    Ok(())
}

/// An RAII guard that guarantees the output file gets written.
pub struct OutputGuard {
    path: PathBuf,
    finalized: bool,
}

impl OutputGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            finalized: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the outcome and consumes the guard.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Unexpected`] if the file cannot be written. The
    /// guard is marked finalized either way so `Drop` does not overwrite it.
    pub fn finalize(mut self, outcome: &ReviewOutcome) -> Result<(), ReviewError> {
        self.finalized = true;
        write_output(&self.path, &outcome.contents())
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }

        warn!(path = %self.path.display(), "Review did not finish; writing fallback output");
        // Nothing more can be done from a destructor if this fails.
        let _ = write_output(&self.path, INTERRUPTED_MESSAGE);
    }
}
