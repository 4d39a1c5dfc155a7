//! Wire types for the `generateContent` API
//!
//! Field names follow the API's camelCase JSON.

use serde::{Deserialize, Serialize};

/// A text fragment of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// A single message made of parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Sampling options sent alongside the prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_output_tokens: u32,
}

/// Request body for `generateContent`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationOptions,
}

impl GenerateRequest {
    /// Create a request carrying a single text prompt
    pub fn from_prompt(prompt: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
            generation_config: options,
        }
    }

    /// The prompt text carried by this request
    pub fn prompt(&self) -> Option<&str> {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
    }
}

/// One candidate completion
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response body for `generateContent`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
            .map(|p| p.text.as_str())
    }
}

/// Extract `candidates[0].content.parts[0].text` from a raw response body
///
/// Any deviation from that shape, a non-JSON body included, is reported as
/// a description of what was wrong.
pub fn extract_text(body: &str) -> Result<String, String> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| format!("invalid response body: {}", e))?;
    response
        .first_text()
        .map(str::to_string)
        .ok_or_else(|| match response.candidates.first() {
            None => "response has no candidates".to_string(),
            Some(candidate) => format!(
                "first candidate has no text part (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ),
        })
}
