//! Gemini API wire types
//!
//! Structs that mirror the Gemini `generateContent` JSON request and
//! response formats. Used to build typed requests and deserialize API
//! responses.

use serde::{Deserialize, Serialize};

/// Role tag for a conversation turn, as the Gemini API expects it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Turn authored by the end user
    User,
    /// Turn authored by the model
    Model,
}

/// Request structure for the `generateContent` endpoint
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Ordered, role-tagged conversation turns
    pub contents: Vec<RequestContent>,
    /// Fixed generation parameters
    pub generation_config: GenerationConfig,
    /// System instruction (the persona) applied to the whole conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<RequestContent>,
}

/// A single role-tagged content item in a request
#[derive(Serialize, Debug)]
pub struct RequestContent {
    /// Role of this turn; omitted for the system instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<TurnRole>,
    /// Content parts (typically one text part)
    pub parts: Vec<RequestPart>,
}

impl RequestContent {
    /// A role-tagged conversation turn with a single text part
    pub fn turn(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role: Some(role),
            parts: vec![RequestPart { text: text.into() }],
        }
    }

    /// A role-less content item, used for the system instruction
    pub fn instruction(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![RequestPart { text: text.into() }],
        }
    }
}

/// A single part of request content (always text here)
#[derive(Serialize, Debug)]
pub struct RequestPart {
    /// The text content
    pub text: String,
}

/// Generation parameters attached to every request
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f32,
    /// Top-k sampling width
    pub top_k: u32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    /// Output length ceiling in tokens
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

/// Top-level Gemini API response
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// List of candidate responses from the model
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Optional feedback about the prompt (e.g., if it was blocked)
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A single candidate response from the model
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of this candidate; absent when generation was cut off
    #[serde(default)]
    pub content: Option<Content>,
}

/// Content structure containing parts of the response
#[derive(Deserialize, Debug)]
pub struct Content {
    /// List of content parts (typically one text part)
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single part of response content
#[derive(Deserialize, Debug)]
pub struct Part {
    /// The text content of this part
    #[serde(default)]
    pub text: String,
}

/// Feedback about the prompt (e.g., if it was blocked)
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked (if applicable)
    #[serde(default)]
    pub block_reason: Option<String>,
}
