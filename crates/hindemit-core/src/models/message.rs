use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A single message in the conversation, in the shape the browser widget
/// sends and receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Message {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    #[ts(type = "Array<{ type: string; text?: string }>")]
    pub parts: Vec<MessagePart>,
    /// Set when the message was created by this process. Messages coming
    /// from a browser carry no timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub created_at: Option<jiff::Timestamp>,
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One content part of a message. Only text is rendered; other part types
/// (reasoning, tool calls, step markers) are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MessagePart {
    Text {
        text: String,
    },
    #[serde(other)]
    Unknown,
}

impl Message {
    /// Build a message with a fresh id and a single text part.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            parts: vec![MessagePart::Text { text: text.into() }],
            created_at: Some(jiff::Timestamp::now()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text { text } => Some(text.as_str()),
                MessagePart::Unknown => None,
            })
            .collect()
    }

    /// Append streamed text to the last text part, creating one if needed.
    pub fn push_text(&mut self, delta: &str) {
        if let Some(MessagePart::Text { text }) = self.parts.last_mut() {
            text.push_str(delta);
        } else {
            self.parts.push(MessagePart::Text {
                text: delta.to_string(),
            });
        }
    }
}

/// Whether any message in the conversation was written by the user.
pub fn has_user_messages(messages: &[Message]) -> bool {
    messages.iter().any(|m| m.role == Role::User)
}
