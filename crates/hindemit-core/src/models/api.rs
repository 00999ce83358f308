//! Request and response bodies of the HTTP endpoints.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::models::message::Message;
use crate::sse::SseFrame;

/// Body of `POST /api/chat` and `POST /api/suggestions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConversationRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub model: Option<String>,
}

/// Body returned by both suggestion endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

impl SuggestionsResponse {
    pub fn new(suggestions: Vec<String>) -> Self {
        Self {
            suggestions,
            error: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// One event of the `POST /api/chat` event stream.
///
/// On the wire each variant is an SSE frame whose `event:` field is the
/// variant name and whose `data:` field is the JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum ChatStreamEvent {
    Start {
        #[serde(rename = "messageId")]
        message_id: String,
    },
    Delta {
        text: String,
    },
    Finish,
    Error {
        message: String,
    },
}

#[derive(Deserialize)]
struct StartData {
    #[serde(rename = "messageId")]
    message_id: String,
}

#[derive(Deserialize)]
struct DeltaData {
    text: String,
}

#[derive(Deserialize)]
struct ErrorData {
    message: String,
}

impl ChatStreamEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Delta { .. } => "delta",
            Self::Finish => "finish",
            Self::Error { .. } => "error",
        }
    }

    /// JSON payload for the `data:` field.
    pub fn data(&self) -> serde_json::Value {
        match self {
            Self::Start { message_id } => serde_json::json!({ "messageId": message_id }),
            Self::Delta { text } => serde_json::json!({ "text": text }),
            Self::Finish => serde_json::json!({}),
            Self::Error { message } => serde_json::json!({ "message": message }),
        }
    }

    /// Decode a received SSE frame. Frames with an unrecognized event name
    /// yield `Ok(None)`.
    pub fn from_frame(frame: &SseFrame) -> Result<Option<Self>, CoreError> {
        let event = match frame.event.as_deref() {
            Some("start") => {
                let d: StartData = serde_json::from_str(&frame.data)?;
                Self::Start {
                    message_id: d.message_id,
                }
            }
            Some("delta") => {
                let d: DeltaData = serde_json::from_str(&frame.data)?;
                Self::Delta { text: d.text }
            }
            Some("finish") => Self::Finish,
            Some("error") => {
                let d: ErrorData = serde_json::from_str(&frame.data)?;
                Self::Error { message: d.message }
            }
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}
