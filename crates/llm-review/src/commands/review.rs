use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use llm_review_core::config::describe_env;
use llm_review_core::{
    run_review, ArtifactKind, OutputGuard, RequestSettings, ReviewError, ReviewOutcome,
};

use crate::cli::Cli;
use crate::output::{OutputMode, Reporter};

const WORKFLOW_SNIPPET: &str = "In your GitHub workflow, set these with:

      env:
        LLM_API_KEY: ${{ secrets.LLM_API_KEY }}
        LLM_ENDPOINT: ${{ secrets.LLM_ENDPOINT }}
        LLM_MODEL_NAME: ${{ secrets.LLM_MODEL_NAME }}";

/// Run the review and write its outcome to the output file.
///
/// Returns `true` when the process should exit 0.
pub fn run_review_command(cli: &Cli, reporter: &mut Reporter) -> bool {
    let kind = if cli.diff {
        ArtifactKind::Diff
    } else {
        ArtifactKind::File
    };
    let settings = RequestSettings {
        max_tokens: cli.max_tokens,
        temperature: cli.temperature,
        timeout: Duration::from_secs(cli.timeout),
    };

    let guard = OutputGuard::new(&cli.output_path);
    let spinner = start_spinner(reporter.mode(), kind);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        run_review(&cli.artifact_path, kind, settings, |name| {
            std::env::var(name).ok()
        })
    }))
    .unwrap_or_else(|payload| {
        ReviewOutcome::Failed(ReviewError::Unexpected(panic_message(payload.as_ref())))
    });

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let output_display = guard.path().display().to_string();
    let written = guard.finalize(&outcome);

    report_outcome(&outcome, reporter);

    if let Err(e) = written {
        reporter.error(&format!("Failed to write {output_display}: {e}"));
        return false;
    }

    if outcome.is_success() {
        reporter.success(&format!("Review written to {output_display}"));
        true
    } else {
        reporter.error(&format!(
            "Review finished with errors. Output written to {output_display}"
        ));
        false
    }
}

fn report_outcome(outcome: &ReviewOutcome, reporter: &mut Reporter) {
    match outcome {
        ReviewOutcome::Reviewed(text) => {
            reporter.section("Review");
            reporter.review(text);
        }
        ReviewOutcome::NothingToReview(kind) => {
            reporter.info(kind.nothing_to_review());
        }
        ReviewOutcome::Failed(err @ ReviewError::Config { .. }) => {
            reporter.error(&err.to_string());
            let current = describe_env(|name| std::env::var(name).ok())
                .iter()
                .map(|line| format!("  {line}"))
                .collect::<Vec<_>>()
                .join("\n");
            reporter.hint(&format!("Current values:\n{current}"));
            reporter.hint(WORKFLOW_SNIPPET);
        }
        ReviewOutcome::Failed(err) => {
            reporter.error(&err.to_string());
        }
    }
}

fn start_spinner(mode: OutputMode, kind: ArtifactKind) -> Option<ProgressBar> {
    if mode != OutputMode::Human {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Requesting LLM review of {kind}..."));
    spinner.enable_steady_tick(Duration::from_millis(120));
    Some(spinner)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic with unknown payload".to_string()
    }
}
