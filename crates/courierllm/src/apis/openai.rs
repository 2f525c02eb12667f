//! Serde shapes for the OpenAI chat-completions API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Payload sent to the chat-completions endpoint. The gateway pins
/// `max_tokens`, `temperature` and `stream`, so they are always serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionsRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token accounting, relayed verbatim. An absent field becomes `{}`.
    #[serde(default)]
    pub usage: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum OpenAIError {
    #[error("invalid chat completions payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

impl TryFrom<&[u8]> for ChatCompletionsResponse {
    type Error = OpenAIError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Error body returned by OpenAI-compatible endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<Value>,
}

/// Extract a human-readable error from a non-200 upstream body.
///
/// Two fallback levels: a JSON body without `error.message` yields a
/// status-only string, a body that is not a JSON object yields the status
/// plus the raw text.
pub fn upstream_error_message(status: u16, body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope
            .error
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("OpenAI API error: {status}")),
        Err(_) => format!(
            "OpenAI API error: {} - {}",
            status,
            String::from_utf8_lossy(body)
        ),
    }
}
