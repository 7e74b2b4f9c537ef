//! The text submitted for review.

use std::fmt;
use std::path::Path;

use crate::error::ReviewError;

/// Whether the artifact is a diff or a whole source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Diff,
    File,
}

impl ArtifactKind {
    /// Language tag used on the fenced block that wraps the artifact.
    pub fn fence_label(self) -> &'static str {
        match self {
            ArtifactKind::Diff => "diff",
            ArtifactKind::File => "python",
        }
    }

    /// Result text when the artifact has nothing in it.
    pub fn nothing_to_review(self) -> &'static str {
        match self {
            ArtifactKind::Diff => "No changes detected to review.",
            ArtifactKind::File => "No code detected to review.",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Diff => write!(f, "diff"),
            ArtifactKind::File => write!(f, "file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub text: String,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Reads the artifact from `path` as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Unexpected`] if the file cannot be read or is
    /// not valid UTF-8.
    pub fn read(kind: ArtifactKind, path: &Path) -> Result<Self, ReviewError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReviewError::Unexpected(format!("Failed to read {}: {e}", path.display()))
        })?;
        Ok(Self { kind, text })
    }

    /// True when the text is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
