//! Frames one translation outcome as a short server-sent event sequence

use std::time::{SystemTime, UNIX_EPOCH};

use axum::response::sse::Event;

use crate::error::{Result, TranslateError};
use crate::protocol::{ChatCompletionChunk, ChunkChoice, ChunkDelta};

/// Terminal sentinel payload
pub const DONE: &str = "[DONE]";

const CHUNK_OBJECT: &str = "chat.completion.chunk";
const FINISH_STOP: &str = "stop";

/// One server-sent event of the outward stream
#[derive(Debug, Clone)]
pub enum Frame {
    /// A serialized [`ChatCompletionChunk`]
    Chunk(ChatCompletionChunk),
    /// The `[DONE]` sentinel, always last
    Done,
}

impl Frame {
    /// Payload carried after `data: `
    pub fn data(&self) -> String {
        match self {
            Self::Chunk(chunk) => serde_json::to_string(chunk).unwrap_or_else(|e| {
                tracing::error!(request_id = %chunk.id, "failed to serialize stream chunk: {e}");
                fallback_chunk(chunk)
            }),
            Self::Done => DONE.to_owned(),
        }
    }

    pub fn into_event(self) -> Event {
        Event::default().data(self.data())
    }

    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Stop chunk sent in place of one that could not be serialized
fn fallback_chunk(chunk: &ChatCompletionChunk) -> String {
    serde_json::json!({
        "id": chunk.id,
        "object": CHUNK_OBJECT,
        "created": chunk.created,
        "model": chunk.model,
        "choices": [{
            "index": 0,
            "delta": {"content": "Translation failed: internal error"},
            "finish_reason": FINISH_STOP,
        }],
    })
    .to_string()
}

/// Builds the frames of a single response
///
/// Every chunk shares the same id, model, and timestamp.
#[derive(Debug, Clone)]
pub struct StreamFramer {
    id: String,
    model: String,
    created: u64,
}

impl StreamFramer {
    pub fn new(model: impl Into<String>) -> Self {
        let created = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            id: format!("chatcmpl-{}", uuid::Uuid::new_v4()),
            model: model.into(),
            created,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Frame either outcome; errors never escape as a broken stream
    pub fn frames(&self, outcome: Result<String>) -> Vec<Frame> {
        match outcome {
            Ok(text) => self.success(text),
            Err(error) => self.failure(&error),
        }
    }

    /// Content chunk, empty stop chunk, sentinel
    pub fn success(&self, text: String) -> Vec<Frame> {
        vec![
            self.chunk(Some("assistant"), text, None),
            self.chunk(None, String::new(), Some(FINISH_STOP)),
            Frame::Done,
        ]
    }

    /// Stop chunk carrying the error description, sentinel
    pub fn failure(&self, error: &TranslateError) -> Vec<Frame> {
        vec![
            self.chunk(Some("assistant"), format!("Translation failed: {error}"), Some(FINISH_STOP)),
            Frame::Done,
        ]
    }

    fn chunk(&self, role: Option<&str>, content: String, finish_reason: Option<&str>) -> Frame {
        Frame::Chunk(ChatCompletionChunk {
            id: self.id.clone(),
            object: CHUNK_OBJECT.to_owned(),
            created: self.created,
            model: self.model.clone(),
            choices: vec![ChunkChoice {
                index: 0,
                delta: ChunkDelta {
                    role: role.map(str::to_owned),
                    content,
                },
                finish_reason: finish_reason.map(str::to_owned),
            }],
        })
    }
}
