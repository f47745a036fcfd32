//! Port for structured conversation logging.
//!
//! Separate from `tracing`-based operation logs: tracing carries
//! diagnostics, while this port captures the conversation itself in a
//! machine-readable form (one record per event).

use serde_json::Value;

/// A structured conversation event.
pub struct ConversationEvent {
    /// Event type identifier.
    pub event_type: &'static str,
    /// JSON payload with event-specific fields.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// A single-agent chat turn (user or assistant).
    pub fn chat_turn(role: &str, content: &str) -> Self {
        Self::new(
            "chat_turn",
            serde_json::json!({ "role": role, "content": content }),
        )
    }

    /// One meeting round: the selected speaker and their utterance.
    pub fn meeting_turn(speaker: &str, content: &str) -> Self {
        Self::new(
            "meeting_turn",
            serde_json::json!({ "speaker": speaker, "content": content }),
        )
    }

    /// The outcome of one focus turn.
    pub fn focus_turn(payload: Value) -> Self {
        Self::new("focus_turn", payload)
    }
}

/// Port for recording conversation events.
///
/// `log` is synchronous and non-fallible so a logging problem can never
/// disrupt a session; failing implementations drop the event.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
