//! Session domain entities
//!
//! Messages use a free-form role string because agent turns are recorded
//! under the agent's display name, not a fixed role set.

use serde::{Deserialize, Serialize};

/// Payload of a message: plain text, or text paired with a base64 image
/// for vision-capable models.
///
/// Modeled as a tagged variant so render and serialize paths stay
/// exhaustive instead of inspecting an untyped value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageContent {
    Text(String),
    TextWithImage {
        text: String,
        image_base64: String,
    },
}

impl MessageContent {
    /// The textual part of the payload, image or not.
    pub fn text(&self) -> &str {
        match self {
            MessageContent::Text(t) => t,
            MessageContent::TextWithImage { text, .. } => text,
        }
    }

    pub fn has_image(&self) -> bool {
        matches!(self, MessageContent::TextWithImage { .. })
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// "system", "user", "assistant", or an agent's display name.
    pub role: String,
    pub content: MessageContent,
}

impl Message {
    pub fn new(role: impl Into<String>, content: MessageContent) -> Self {
        Self {
            role: role.into(),
            content,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", MessageContent::Text(content.into()))
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", MessageContent::Text(content.into()))
    }

    pub fn user_with_image(text: impl Into<String>, image_base64: impl Into<String>) -> Self {
        Self::new(
            "user",
            MessageContent::TextWithImage {
                text: text.into(),
                image_base64: image_base64.into(),
            },
        )
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", MessageContent::Text(content.into()))
    }

    /// A turn spoken by a named agent in a shared transcript.
    pub fn spoken_by(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, MessageContent::Text(content.into()))
    }

    /// Render as a flat `[role]: content` line for transcript prompts.
    pub fn render(&self) -> String {
        format!("[{}]: {}", self.role, self.content.text())
    }
}

/// Render a whole transcript as the flat block handed to a speaker.
///
/// No truncation here: this is the speaker's working context, distinct
/// from the moderator's bounded decision window.
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(Message::render)
        .collect::<Vec<_>>()
        .join("\n")
}
