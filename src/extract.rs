//! Tolerant recovery of a single JSON object from free-form model output.
//!
//! Model replies are supposed to be one JSON object but routinely arrive wrapped in
//! prose or markdown fences, with trailing commas or typographic quotes. [`extract`]
//! locates the candidate span, tries a strict parse, then one repaired parse.

use log::debug;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use thiserror::Error;

/// A JSON object: string keys to arbitrary JSON values, in document order.
pub type JsonObject = Map<String, Value>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The text holds no `{ ... }` span at all.
    #[error("no JSON object found in text")]
    NoCandidateFound,

    /// A span was found but neither the strict nor the repaired parse accepted it.
    #[error("candidate span is not valid JSON: {reason}")]
    UnparseableJson { candidate: String, reason: String },
}

impl ExtractionError {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::NoCandidateFound => "NoCandidateFound",
            ExtractionError::UnparseableJson { .. } => "UnparseableJSON",
        }
    }
}

/// How the candidate span is located inside the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanMode {
    /// First `{` through the last `}` in the whole text, regardless of nesting.
    #[default]
    Greedy,
    /// First `{` through its depth-matching `}`, skipping braces inside strings.
    Balanced,
}

/// Extract the first JSON object from `text` using the greedy span.
pub fn extract(text: &str) -> Result<JsonObject, ExtractionError> {
    extract_with(text, SpanMode::Greedy)
}

/// Extract the first JSON object from `text` with an explicit span mode.
pub fn extract_with(text: &str, mode: SpanMode) -> Result<JsonObject, ExtractionError> {
    let candidate = candidate_span(text, mode).ok_or(ExtractionError::NoCandidateFound)?;

    match serde_json::from_str::<JsonObject>(candidate) {
        Ok(object) => {
            debug!("Strict parse succeeded ({} keys)", object.len());
            return Ok(object);
        }
        Err(e) => debug!("Strict parse failed: {}", e),
    }

    let repaired = repair(candidate);
    match serde_json::from_str::<JsonObject>(&repaired) {
        Ok(object) => {
            debug!("Repaired parse succeeded ({} keys)", object.len());
            Ok(object)
        }
        Err(e) => Err(ExtractionError::UnparseableJson {
            candidate: candidate.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Locate the candidate span, or `None` when the text has no usable braces.
pub fn candidate_span(text: &str, mode: SpanMode) -> Option<&str> {
    let start = text.find('{')?;
    let end = match mode {
        SpanMode::Greedy => text.rfind('}')?,
        SpanMode::Balanced => matching_close(&text[start..])? + start,
    };
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Byte offset of the `}` closing the object that opens at offset 0.
fn matching_close(span: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in span.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Apply the fixed textual repairs: drop trailing commas, normalise curly quotes.
pub fn repair(span: &str) -> String {
    let cleaned = trailing_comma_before_brace().replace_all(span, "}");
    let cleaned = trailing_comma_before_bracket().replace_all(&cleaned, "]");
    cleaned
        .replace(&['\u{201C}', '\u{201D}'][..], "\"")
        .replace(&['\u{2018}', '\u{2019}'][..], "'")
}

fn trailing_comma_before_brace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*\}").expect("Invalid trailing comma regex"))
}

fn trailing_comma_before_bracket() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*\]").expect("Invalid trailing comma regex"))
}
