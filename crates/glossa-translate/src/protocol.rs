//! `OpenAI` chat completion wire types accepted and produced by the gateway

use serde::{Deserialize, Serialize};

// -- Request types --

/// Inbound chat completion request
///
/// Only the fields the translation flow reads are modeled; anything else a
/// chat client sends (`stream`, `temperature`, ...) is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier, echoed back in chunks
    #[serde(default)]
    pub model: Option<String>,
    /// Conversation; only the last entry is translated
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Source language code, `auto` when absent
    #[serde(default)]
    pub source_lang: Option<String>,
    /// Target language code, inferred from the text when absent
    #[serde(default)]
    pub target_lang: Option<String>,
}

/// Message within a chat request
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    /// Message role
    pub role: String,
    /// Content (string, array of parts, or null)
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// Message content can be a string or array of content parts
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content
    Text(String),
    /// Array of content parts
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Flatten into the text to translate; non-text parts contribute nothing
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Parts(parts) => parts
                .into_iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text),
                    ContentPart::Other => None,
                })
                .collect(),
        }
    }
}

/// Individual content part
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content
    Text {
        /// The text string
        text: String,
    },
    /// Images, audio, and anything else the backend cannot translate
    #[serde(other)]
    Other,
}

// -- Streaming types --

/// Streaming chunk sent as one server-sent event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    /// Identifier shared by every chunk of a response
    pub id: String,
    /// Object type (always "chat.completion.chunk")
    pub object: String,
    /// Creation timestamp
    pub created: u64,
    /// Model echoed from the request
    pub model: String,
    /// Delta choices, always exactly one
    pub choices: Vec<ChunkChoice>,
}

/// Choice within a streaming chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkChoice {
    /// Choice index
    pub index: u32,
    /// Incremental delta
    pub delta: ChunkDelta,
    /// `null` until the terminal chunk, then `"stop"`
    pub finish_reason: Option<String>,
}

/// Delta content within a streaming choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkDelta {
    /// Role, always "assistant"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Incremental text content, possibly empty
    pub content: String,
}

// -- Model listing --

/// Model list returned by `/v1/models`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    /// Object type (always "list")
    pub object: String,
    /// Available models
    pub data: Vec<Model>,
}

/// Model entry in a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Model identifier
    pub id: String,
    /// Object type (always "model")
    pub object: String,
    /// Creation timestamp
    pub created: u64,
    /// Owner label
    pub owned_by: String,
}
