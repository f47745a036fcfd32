//! Conversation event logging

pub mod jsonl_logger;
