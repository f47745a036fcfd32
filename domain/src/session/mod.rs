//! Conversation session entities

pub mod entities;
