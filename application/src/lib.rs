//! Application layer for scholar-ai
//!
//! Use cases orchestrating the domain logic, plus the ports they depend
//! on. Adapters for the ports live in the infrastructure layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
pub use ports::focus_progress::{FocusProgress, NoFocusProgress};
pub use ports::llm_client::{CompletionOptions, LlmClient, ModelCallError};
pub use ports::media::MediaCodec;
pub use ports::session_store::{
    SessionKind, SessionRecord, SessionStore, StoreError, StoredMessage,
};
pub use use_cases::agent::{ConversationalAgent, FAILURE_MARKER, is_failure_reply};
pub use use_cases::focus::{FocusOutcome, FocusSession, FocusTurn};
pub use use_cases::meeting::MeetingController;
