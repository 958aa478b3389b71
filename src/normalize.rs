//! Repairs raw model output into a structured analysis.
//!
//! The model is instructed to answer with a bare JSON object, but the
//! instruction is routinely ignored: the payload arrives wrapped in
//! markdown fences or surrounding prose, with fields missing, or as
//! invalid JSON. This module is the only defense layer between that
//! output and the wire types.

use serde::Deserialize;
use thiserror::Error;

const RAW_SNIPPET_LIMIT: usize = 500;

/// The model-produced analysis fields, with defaults backfilled.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub time_complexity: String,
    pub space_complexity: String,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
    pub optimized_code: String,
}

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("no JSON object found in model output: {0}")]
    NoJsonFound(String),
    #[error("model output contains malformed JSON ({error}): {payload}")]
    MalformedJson { error: String, payload: String },
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    time_complexity: Option<String>,
    space_complexity: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
    optimized_code: Option<String>,
}

/// Extracts the JSON object from `raw` and completes it into an
/// [`Analysis`], substituting `original_code` when the model omitted
/// `optimized_code`.
pub fn normalize(raw: &str, original_code: &str) -> Result<Analysis, NormalizeError> {
    let text = strip_fences(raw.trim());

    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start <= end => &text[start..=end],
        _ => return Err(NormalizeError::NoJsonFound(truncate(raw))),
    };

    let parsed: RawAnalysis =
        serde_json::from_str(span).map_err(|e| NormalizeError::MalformedJson {
            error: e.to_string(),
            payload: span.to_string(),
        })?;

    Ok(Analysis {
        time_complexity: parsed.time_complexity.unwrap_or_else(|| "Unknown".to_string()),
        space_complexity: parsed
            .space_complexity
            .unwrap_or_else(|| "Unknown".to_string()),
        errors: parsed.errors,
        suggestions: parsed.suggestions,
        optimized_code: parsed
            .optimized_code
            .unwrap_or_else(|| original_code.to_string()),
    })
}

/// Removes a leading fence marker (bare or language-tagged) and a
/// trailing one. No-op on unfenced text.
fn strip_fences(text: &str) -> &str {
    let mut text = text;
    if let Some(rest) = text.strip_prefix("```") {
        // drop the info string ("json", "cpp", ...) with the marker line
        text = match rest.split_once('\n') {
            Some((_, body)) => body,
            None => rest,
        };
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn truncate(raw: &str) -> String {
    raw.chars().take(RAW_SNIPPET_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_with_missing_fields_gets_defaults() {
        let analysis = normalize("```json\n{\"errors\":[]}\n```", "int main() {}").unwrap();
        assert_eq!(analysis.errors, Vec::<String>::new());
        assert_eq!(analysis.suggestions, Vec::<String>::new());
        assert_eq!(analysis.time_complexity, "Unknown");
        assert_eq!(analysis.space_complexity, "Unknown");
        assert_eq!(analysis.optimized_code, "int main() {}");
    }

    #[test]
    fn bare_fence_is_stripped() {
        let analysis = normalize("```\n{\"time_complexity\":\"O(n)\"}\n```", "x").unwrap();
        assert_eq!(analysis.time_complexity, "O(n)");
    }

    #[test]
    fn strip_fences_is_noop_without_fences() {
        assert_eq!(strip_fences("{\"errors\":[]}"), "{\"errors\":[]}");
        assert_eq!(strip_fences("plain text"), "plain text");
    }

    #[test]
    fn json_embedded_in_prose_is_extracted() {
        let raw = "Here is the analysis you asked for:\n{\"errors\":[\"off by one\"],\"suggestions\":[\"use iterators\"],\"time_complexity\":\"O(n^2)\",\"space_complexity\":\"O(1)\",\"optimized_code\":\"fixed\"}\nHope this helps!";
        let analysis = normalize(raw, "orig").unwrap();
        assert_eq!(analysis.errors, vec!["off by one"]);
        assert_eq!(analysis.suggestions, vec!["use iterators"]);
        assert_eq!(analysis.time_complexity, "O(n^2)");
        assert_eq!(analysis.optimized_code, "fixed");
    }

    #[test]
    fn text_without_braces_is_rejected() {
        let err = normalize("no braces here", "x").unwrap_err();
        assert!(matches!(err, NormalizeError::NoJsonFound(_)));
    }

    #[test]
    fn inverted_braces_are_rejected() {
        let err = normalize("} nothing usable {", "x").unwrap_err();
        assert!(matches!(err, NormalizeError::NoJsonFound(_)));
    }

    #[test]
    fn no_json_diagnostic_is_truncated() {
        let raw = "x".repeat(2000);
        match normalize(&raw, "y").unwrap_err() {
            NormalizeError::NoJsonFound(snippet) => {
                assert_eq!(snippet.chars().count(), RAW_SNIPPET_LIMIT)
            }
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn invalid_json_reports_parse_error_and_payload() {
        match normalize("{\"errors\": [unquoted]}", "x").unwrap_err() {
            NormalizeError::MalformedJson { error, payload } => {
                assert!(!error.is_empty());
                assert_eq!(payload, "{\"errors\": [unquoted]}");
            }
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn present_optimized_code_is_kept() {
        let raw = "{\"optimized_code\":\"better\"}";
        let analysis = normalize(raw, "orig").unwrap();
        assert_eq!(analysis.optimized_code, "better");
    }
}
