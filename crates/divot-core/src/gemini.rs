//! Wire format of the hosted completion API (`streamGenerateContent`, SSE).

use crate::error::CompletionError;
use serde::{Deserialize, Serialize};

pub const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest<'a> {
    pub system_instruction: Content<'a>,
    pub contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a str>,
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Part<'a> {
    pub text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    /// One system instruction plus a single user turn.
    pub fn single_turn(context: &'a str, message: &'a str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: context }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: message }],
            }],
        }
    }

    pub fn to_json(&self) -> String {
        // Only borrowed strings and vectors; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// `{endpoint}/models/{model}:streamGenerateContent?alt=sse`
pub fn stream_url(endpoint: &str, model: &str) -> String {
    format!(
        "{}/models/{}:streamGenerateContent?alt=sse",
        endpoint.trim_end_matches('/'),
        model
    )
}

#[derive(Debug, Deserialize)]
struct ResponseChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Text carried by one SSE `data` payload. `Ok(None)` for chunks without text
/// (e.g. a final chunk carrying only usage metadata).
pub fn parse_chunk(data: &str) -> Result<Option<String>, CompletionError> {
    let chunk: ResponseChunk =
        serde_json::from_str(data).map_err(|e| CompletionError::Malformed(e.to_string()))?;
    if let Some(err) = chunk.error {
        return Err(CompletionError::Provider {
            code: err.code,
            message: err.message,
        });
    }
    let text: String = chunk
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
        .unwrap_or_default();
    Ok(if text.is_empty() { None } else { Some(text) })
}

/// Best-effort message from a non-2xx response body.
pub fn error_message(status: u16, body: &str) -> CompletionError {
    let message = serde_json::from_str::<ResponseChunk>(body)
        .ok()
        .and_then(|c| c.error)
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.chars().take(200).collect());
    CompletionError::Http { status, message }
}
