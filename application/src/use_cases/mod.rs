//! Use cases orchestrating agents, meetings, and focus sessions.

pub mod agent;
pub mod focus;
pub mod meeting;
