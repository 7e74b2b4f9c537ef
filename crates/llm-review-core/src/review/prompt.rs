//! Review prompt construction.

use crate::artifact::{Artifact, ArtifactKind};

/// Build the review instruction with the artifact embedded verbatim.
///
/// Pure function, no I/O.
pub fn build_review_prompt(artifact: &Artifact) -> String {
    let subject = match artifact.kind {
        ArtifactKind::Diff => "the following code changes (diff)",
        ArtifactKind::File => "the following Python code file",
    };

    let mut prompt = String::with_capacity(artifact.text.len() + 1024);

    prompt.push_str("You are an expert AI code reviewer.\n");
    prompt.push_str(&format!(
        "Please perform a security and design review of {subject}.\n"
    ));
    prompt.push_str(
        "Focus on:\n\
         1.  **Security Vulnerabilities**: Identify potential issues like injection flaws, XSS, \
         CSRF, insecure data handling, hardcoded secrets, authentication/authorization bypasses, \
         etc.\n\
         2.  **Design Flaws**: Look for anti-patterns, code smells, poor readability, lack of \
         modularity, performance bottlenecks, and deviations from best practices.\n\
         3.  **Maintainability & Scalability**: Assess if the code is easy to understand, \
         maintain, and scale.\n\n\
         Provide clear, concise, and actionable feedback. If possible, suggest improvements or \
         alternatives.\n\
         If no significant issues are found, please state that.\n\n",
    );

    prompt.push_str("```");
    prompt.push_str(artifact.kind.fence_label());
    prompt.push('\n');
    prompt.push_str(&artifact.text);
    prompt.push_str("\n```\n\nReview:\n");

    prompt
}
