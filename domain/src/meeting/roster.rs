//! Speaker profiles and name-based speaker resolution.
//!
//! Resolution is pure text matching — no I/O, no session state. The
//! moderator asks its model for a bare name and this module maps that
//! reply back onto the roster.

use serde::{Deserialize, Serialize};

/// A participant's public identity: display name plus persona.
///
/// The name doubles as the speaker-matching key, so no two roster members
/// may share one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerProfile {
    pub name: String,
    pub persona: String,
}

impl SpeakerProfile {
    pub fn new(name: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            persona: persona.into(),
        }
    }
}

/// Resolve a moderator reply to a roster index by substring containment.
///
/// The first roster member whose name appears inside the trimmed reply
/// wins. Ties between several matching names are resolved in roster
/// (join) order. Returns `None` when no name matches, which callers treat
/// as "fall back to the first roster member".
///
/// Substring matching is deliberately the single place this fragile
/// policy lives, so it can be swapped for exact-match-with-fallback
/// without touching the moderator.
pub fn resolve_speaker(reply: &str, names: &[&str]) -> Option<usize> {
    let reply = reply.trim();
    if reply.is_empty() {
        return None;
    }
    names
        .iter()
        .position(|name| !name.is_empty() && reply.contains(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_name_reply() {
        let names = ["A", "B"];
        assert_eq!(resolve_speaker("B", &names), Some(1));
    }

    #[test]
    fn test_name_embedded_in_noise() {
        let names = ["Prof. Chen", "Dr. Wu"];
        assert_eq!(
            resolve_speaker("The next speaker should be Dr. Wu.", &names),
            Some(1)
        );
    }

    #[test]
    fn test_no_match() {
        let names = ["Prof. Chen", "Dr. Wu"];
        assert_eq!(resolve_speaker("nobody in particular", &names), None);
    }

    #[test]
    fn test_empty_reply() {
        assert_eq!(resolve_speaker("   ", &["A"]), None);
    }

    #[test]
    fn test_tie_goes_to_roster_order() {
        // Both names are substrings of the reply; first joined wins
        let names = ["An", "Anna"];
        assert_eq!(resolve_speaker("Anna should speak", &names), Some(0));
    }

    #[test]
    fn test_cjk_names() {
        let names = ["论文精读助手", "数据分析专家"];
        assert_eq!(resolve_speaker("我选择数据分析专家。", &names), Some(1));
    }
}
