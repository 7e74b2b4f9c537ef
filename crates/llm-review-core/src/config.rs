//! Review configuration read from the process environment.
//!
//! Three variables are required: [`API_KEY_VAR`], [`ENDPOINT_VAR`] and
//! [`MODEL_VAR`]. A variable counts as missing when it is unset, empty, or
//! still holds the template placeholder shipped in example workflows.

use std::fmt;
use std::time::Duration;

use crate::error::ReviewError;

pub const API_KEY_VAR: &str = "LLM_API_KEY";
pub const ENDPOINT_VAR: &str = "LLM_ENDPOINT";
pub const MODEL_VAR: &str = "LLM_MODEL_NAME";

/// Template value for `LLM_ENDPOINT` that must be replaced before use.
pub const ENDPOINT_PLACEHOLDER: &str = "YOUR_LLM_API_ENDPOINT_HERE";
/// Template value for `LLM_MODEL_NAME` that must be replaced before use.
pub const MODEL_PLACEHOLDER: &str = "YOUR_LLM_MODEL_NAME_HERE";

pub const DEFAULT_MAX_TOKENS: u32 = 3000;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Credentials and target for the chat-completion endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ReviewConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
}

impl fmt::Debug for ReviewConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl ReviewConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ReviewError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// Returns [`ReviewError::Config`] naming every variable that is missing
    /// or set to its placeholder, in the order key, endpoint, model.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReviewError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = usable(lookup(API_KEY_VAR), None);
        let endpoint = usable(lookup(ENDPOINT_VAR), Some(ENDPOINT_PLACEHOLDER));
        let model = usable(lookup(MODEL_VAR), Some(MODEL_PLACEHOLDER));

        match (api_key, endpoint, model) {
            (Some(api_key), Some(endpoint), Some(model)) => Ok(Self {
                api_key,
                endpoint,
                model,
            }),
            (api_key, endpoint, model) => {
                let missing = [
                    (API_KEY_VAR, api_key.is_none()),
                    (ENDPOINT_VAR, endpoint.is_none()),
                    (MODEL_VAR, model.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, is_missing)| is_missing.then_some(name))
                .collect();
                Err(ReviewError::Config { missing })
            }
        }
    }
}

fn usable(value: Option<String>, placeholder: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty() && Some(v.as_str()) != placeholder)
}

/// Per-request tuning sent alongside the prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestSettings {
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// One line per variable describing its current state, for diagnostics.
///
/// The API key is only ever reported as `set` or `NOT SET`.
pub fn describe_env<F>(lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let or_unset = |v: Option<String>| v.filter(|s| !s.is_empty());
    vec![
        format!(
            "{API_KEY_VAR}: {}",
            if or_unset(lookup(API_KEY_VAR)).is_some() {
                "set"
            } else {
                "NOT SET"
            }
        ),
        format!(
            "{ENDPOINT_VAR}: {}",
            or_unset(lookup(ENDPOINT_VAR)).unwrap_or_else(|| "NOT SET".into())
        ),
        format!(
            "{MODEL_VAR}: {}",
            or_unset(lookup(MODEL_VAR)).unwrap_or_else(|| "NOT SET".into())
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (API_KEY_VAR, "sk-test"),
            (ENDPOINT_VAR, "https://llm.example.com/v1/chat/completions"),
            (MODEL_VAR, "gpt-4o"),
        ]
    }

    fn missing_of(pairs: &[(&str, &str)]) -> Vec<&'static str> {
        match ReviewConfig::from_lookup(lookup_from(pairs)) {
            Err(ReviewError::Config { missing }) => missing,
            other => panic!("Expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn complete_environment_loads() {
        let config = ReviewConfig::from_lookup(lookup_from(&complete())).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.endpoint, "https://llm.example.com/v1/chat/completions");
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn each_unset_variable_is_named_alone() {
        for var in [API_KEY_VAR, ENDPOINT_VAR, MODEL_VAR] {
            let pairs: Vec<_> = complete().into_iter().filter(|(k, _)| *k != var).collect();
            assert_eq!(missing_of(&pairs), vec![var]);
        }
    }

    #[test]
    fn placeholders_count_as_missing() {
        let pairs = vec![
            (API_KEY_VAR, "sk-test"),
            (ENDPOINT_VAR, ENDPOINT_PLACEHOLDER),
            (MODEL_VAR, MODEL_PLACEHOLDER),
        ];
        assert_eq!(missing_of(&pairs), vec![ENDPOINT_VAR, MODEL_VAR]);
    }

    #[test]
    fn empty_values_count_as_missing() {
        let pairs = vec![(API_KEY_VAR, ""), (ENDPOINT_VAR, "https://x"), (MODEL_VAR, "m")];
        assert_eq!(missing_of(&pairs), vec![API_KEY_VAR]);
    }

    #[test]
    fn nothing_set_names_all_three() {
        assert_eq!(missing_of(&[]), vec![API_KEY_VAR, ENDPOINT_VAR, MODEL_VAR]);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ReviewConfig::from_lookup(lookup_from(&complete())).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-test"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn describe_env_hides_key_value() {
        let lines = describe_env(lookup_from(&[(API_KEY_VAR, "sk-secret")]));
        assert_eq!(
            lines,
            vec![
                "LLM_API_KEY: set".to_string(),
                "LLM_ENDPOINT: NOT SET".to_string(),
                "LLM_MODEL_NAME: NOT SET".to_string(),
            ]
        );
    }

    #[test]
    fn default_settings() {
        let settings = RequestSettings::default();
        assert_eq!(settings.max_tokens, 3000);
        assert_eq!(settings.temperature, 0.2);
        assert_eq!(settings.timeout, Duration::from_secs(300));
    }
}
