//! Ports (interfaces) consumed by the use cases.
//!
//! Implementations (adapters) live in the infrastructure layer.

pub mod conversation_logger;
pub mod focus_progress;
pub mod llm_client;
pub mod media;
pub mod session_store;
