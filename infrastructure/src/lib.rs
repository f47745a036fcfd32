//! Infrastructure layer for scholar-ai
//!
//! Adapters implementing the application layer's ports: the
//! OpenAI-compatible provider client, the SQLite session store, media
//! encoding, configuration loading, and the JSONL conversation logger.

pub mod config;
pub mod llm;
pub mod logging;
pub mod media;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use llm::openai::OpenAiCompatClient;
pub use logging::jsonl_logger::JsonlConversationLogger;
pub use media::BasicMediaCodec;
pub use store::sqlite::SqliteSessionStore;
