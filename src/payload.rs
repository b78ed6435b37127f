//! Wire types for the Gemini `generateContent` endpoint.
//!
//! Requests are written with the snake_case field names the endpoint accepts
//! (`inline_data`, `mime_type`, `generation_config`). Responses are read
//! leniently: unknown fields are ignored and missing collections count as empty.

use crate::types::GenerationConfig;
use serde::{Deserialize, Serialize};

/// Media type of every inline image; images are re-encoded to JPEG first.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Top-level `generateContent` request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// A single-turn request: one prompt text part followed by one JPEG image.
    pub fn new(prompt: &str, image_b64: &str, generation_config: GenerationConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: IMAGE_MIME_TYPE.to_string(),
                            data: image_b64.to_string(),
                        },
                    },
                ],
            }],
            generation_config,
        }
    }
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Text or inline media. Serialized without a tag, as the endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

/// Base64 payload tagged with its media type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

/// A response part. Non-text parts deserialize with `text: None`.
#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}
