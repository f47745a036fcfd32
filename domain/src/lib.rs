//! Domain layer for scholar-ai
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Meeting
//!
//! A moderated roundtable discussion: a roster of personas shares one
//! transcript, and a moderator decides each round who speaks next.
//!
//! ## Focus
//!
//! A focused exchange over long-form input: the input is chunked, each
//! chunk is annotated in the background, the most salient notes are
//! selected, and an evolving consensus set is tracked between the two
//! conversational parties.

pub mod core;
pub mod focus;
pub mod meeting;
pub mod prompt;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use core::error::DomainError;
pub use focus::chunk::{DEFAULT_MAX_CHUNK_LEN, chunk_text};
pub use focus::consensus::{ConsensusDelta, ConsensusState, parse_consensus_delta};
pub use focus::insight::{InsightNote, build_selected_point, extract_note_ids};
pub use meeting::roster::{SpeakerProfile, resolve_speaker};
pub use prompt::PromptTemplate;
pub use session::entities::{Message, MessageContent};
pub use util::truncate_chars;
