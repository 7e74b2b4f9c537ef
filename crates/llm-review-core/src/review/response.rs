//! Extraction of review text from chat-completion response bodies.
//!
//! Two response shapes are recognised, tried in order:
//!
//! 1. OpenAI-style: `choices[0].message.content`
//! 2. Anthropic-style: `content[0].text`
//!
//! Anything else is a [`ReviewError::Parse`] carrying the raw body.

use serde_json::Value;

use crate::error::ReviewError;

/// Pull the review text out of a response body and trim it.
pub fn extract_review_text(body: &str) -> Result<String, ReviewError> {
    let json: Value = serde_json::from_str(body).map_err(|e| ReviewError::Parse {
        reason: format!("invalid JSON: {e}"),
        body: body.to_string(),
    })?;

    json["choices"][0]["message"]["content"]
        .as_str()
        .or_else(|| json["content"][0]["text"].as_str())
        .map(|text| text.trim().to_string())
        .ok_or_else(|| ReviewError::Parse {
            reason: "unrecognized response format".into(),
            body: body.to_string(),
        })
}
