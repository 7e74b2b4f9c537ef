//! AI-powered code review.
//!
//! [`run_review`] drives one invocation end to end: read the artifact, skip
//! empty input, load configuration, build the prompt, make one request and
//! fold every failure into a [`ReviewOutcome`].

pub mod prompt;
pub mod provider;
pub mod response;

use std::path::Path;

use tracing::{debug, info, warn};

use crate::artifact::{Artifact, ArtifactKind};
use crate::config::{RequestSettings, ReviewConfig};
use crate::error::ReviewError;
use crate::outcome::ReviewOutcome;

pub use prompt::build_review_prompt;
pub use provider::{ChatCompletionProvider, LlmProvider, MockProvider};
pub use response::extract_review_text;

/// Review an already-loaded artifact with `provider`.
///
/// Blank artifacts short-circuit to [`ReviewOutcome::NothingToReview`]
/// without calling the provider.
pub fn review_artifact(artifact: &Artifact, provider: &dyn LlmProvider) -> ReviewOutcome {
    review_with(artifact, || Ok(provider))
}

/// Run one complete review invocation.
///
/// `env` looks up configuration variables; pass `|k| std::env::var(k).ok()`
/// for the process environment. Configuration is only consulted once the
/// artifact is known to be non-blank. This never fails: every error becomes
/// a [`ReviewOutcome::Failed`].
pub fn run_review<F>(
    artifact_path: &Path,
    kind: ArtifactKind,
    settings: RequestSettings,
    env: F,
) -> ReviewOutcome
where
    F: Fn(&str) -> Option<String>,
{
    let artifact = match Artifact::read(kind, artifact_path) {
        Ok(a) => a,
        Err(e) => return ReviewOutcome::Failed(e),
    };

    review_with(&artifact, || {
        let config = ReviewConfig::from_lookup(env)?;
        ChatCompletionProvider::new(config, settings)
    })
}

/// Skip blank artifacts, then connect lazily and request the review.
fn review_with<P, C>(artifact: &Artifact, connect: C) -> ReviewOutcome
where
    P: LlmProvider,
    C: FnOnce() -> Result<P, ReviewError>,
{
    if artifact.is_blank() {
        info!(kind = %artifact.kind, "Artifact is empty; skipping review");
        return ReviewOutcome::NothingToReview(artifact.kind);
    }

    let provider = match connect() {
        Ok(p) => p,
        Err(e) => return ReviewOutcome::Failed(e),
    };

    let prompt = build_review_prompt(artifact);
    debug!(
        provider = provider.name(),
        model = provider.model(),
        kind = %artifact.kind,
        "Requesting review"
    );

    let outcome = ReviewOutcome::from(provider.complete(&prompt));
    match &outcome {
        ReviewOutcome::Failed(err) => warn!(kind = err.kind(), "Review request failed"),
        _ => info!(model = provider.model(), "Review received"),
    }
    outcome
}
