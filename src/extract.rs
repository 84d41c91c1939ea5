//! Normalizes a generation response into a single string.
//!
//! The response body is not contractually fixed, so it is classified into
//! one of three shapes and every shape has a textual rendering.

use serde_json::Value;

/// Logical view of a generation response.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResponse {
    /// A top-level, non-null `text` field.
    DirectText(String),
    /// A `candidates` array.
    CandidateList(Vec<Candidate>),
    /// Anything else; rendered as a whole.
    Unknown(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub text: Option<String>,
    pub raw: Value,
}

impl Candidate {
    pub fn from_value(raw: Value) -> Self {
        let text = candidate_text(&raw);
        Self { text, raw }
    }
}

impl GenerationResponse {
    pub fn from_value(value: Value) -> Self {
        if let Some(text) = value.get("text").and_then(Value::as_str) {
            return Self::DirectText(text.to_string());
        }

        match value.get("candidates") {
            Some(Value::Array(candidates)) => Self::CandidateList(
                candidates
                    .iter()
                    .cloned()
                    .map(Candidate::from_value)
                    .collect(),
            ),
            _ => Self::Unknown(value),
        }
    }
}

// A candidate carries either its own `text` or `content.parts[*].text`.
fn candidate_text(candidate: &Value) -> Option<String> {
    if let Some(text) = candidate.get("text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let texts: Vec<&str> = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)?
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

pub fn extract_text(response: &GenerationResponse) -> String {
    match response {
        GenerationResponse::DirectText(text) => text.clone(),
        GenerationResponse::CandidateList(candidates) => candidates
            .iter()
            .map(|candidate| match &candidate.text {
                Some(text) if !text.is_empty() => text.clone(),
                _ => candidate.raw.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        GenerationResponse::Unknown(value) => value.to_string(),
    }
}
