//! Error types for locale resolution.

use strsim::levenshtein;
use thiserror::Error;

use crate::interpolate::InterpolateError;

/// An error returned by a resolution operation.
#[derive(Debug, Error)]
pub enum LocaleError {
    /// No locale in the fallback chain registers the requested rule.
    #[error("rule '{rule_id}' not found in locale '{locale}'{}", did_you_mean(suggestions))]
    RuleNotFound {
        rule_id: String,
        locale: String,
        suggestions: Vec<String>,
    },

    /// Text interpolation arguments do not match the resolved text.
    #[error("cannot interpolate text '{key}': {source}")]
    FormatMismatch {
        key: String,
        #[source]
        source: InterpolateError,
    },
}

/// An error raised while wiring locales into fallback chains.
#[derive(Debug, Error)]
pub enum ChainError {
    /// A locale would appear twice in its own fallback chain.
    #[error("fallback cycle detected: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    /// The fallback chain is longer than [`MAX_CHAIN_DEPTH`](crate::MAX_CHAIN_DEPTH).
    #[error("fallback chain of '{locale}' exceeds {max} locales")]
    TooDeep { locale: String, max: usize },

    /// A locale definition names a fallback that is not defined.
    #[error("locale '{locale}' falls back to unknown locale '{fallback}'")]
    UnknownFallback { locale: String, fallback: String },
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

/// Compute "did you mean" suggestions for an unknown id.
///
/// Ids within Levenshtein distance 1 (for targets of at most three
/// characters) or 2 (otherwise) are returned, closest first, at most three.
pub fn compute_suggestions(target: &str, available: &[String]) -> Vec<String> {
    let max_distance = if target.chars().count() <= 3 { 1 } else { 2 };

    let mut scored: Vec<(usize, &String)> = available
        .iter()
        .map(|candidate| (levenshtein(target, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}
