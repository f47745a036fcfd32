//! Session record-store port.
//!
//! Minimal persistence contract for round-tripping a conversation:
//! sessions with a kind and title, and an insertion-ordered message log
//! per session. Structured payloads are pre-serialized by the caller
//! before being stored as text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Unknown session kind: {0}")]
    UnknownKind(String),
}

/// What a stored session was used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKind {
    Chat,
    Meeting,
    Focus,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Chat => "chat",
            SessionKind::Meeting => "meeting",
            SessionKind::Focus => "focus",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(SessionKind::Chat),
            "meeting" => Ok(SessionKind::Meeting),
            "focus" => Ok(SessionKind::Focus),
            other => Err(StoreError::UnknownKind(other.to_string())),
        }
    }
}

/// A stored session's header row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub title: String,
    pub kind: SessionKind,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// One stored message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub role: String,
    pub content: String,
}

/// Record store for sessions and their messages.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session and return its opaque unique id.
    async fn create_session(&self, title: &str, kind: SessionKind) -> Result<String, StoreError>;

    /// All sessions, newest first.
    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, StoreError>;

    /// A single session's header, or `None` if absent.
    async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>, StoreError>;

    /// Remove a session and all its messages.
    async fn delete_session(&self, session_id: &str) -> Result<(), StoreError>;

    /// Append one message to a session's log.
    async fn append_message(
        &self,
        session_id: &str,
        role: &str,
        content: &str,
    ) -> Result<(), StoreError>;

    /// A session's messages in insertion order.
    async fn list_messages(&self, session_id: &str) -> Result<Vec<StoredMessage>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_kind_round_trip() {
        for kind in [SessionKind::Chat, SessionKind::Meeting, SessionKind::Focus] {
            assert_eq!(kind.as_str().parse::<SessionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_error() {
        assert!("debate".parse::<SessionKind>().is_err());
    }
}
