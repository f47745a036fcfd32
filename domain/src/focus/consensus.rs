//! Consensus tracking between the two conversational parties.
//!
//! A focus session accumulates two ordered, deduplicated statement lists:
//! confirmed consensus (both parties agree) and pending consensus
//! (converging, not yet confirmed). Each turn's analysis produces a
//! [`ConsensusDelta`] that is merged into the [`ConsensusState`].

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Minimum statement length, in characters, after trimming.
const MIN_STATEMENT_CHARS: usize = 5;

/// Result of one turn's consensus analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusDelta {
    /// Statements newly judged as confirmed consensus.
    #[serde(default)]
    pub confirmed: Vec<String>,
    /// Statements newly proposed as pending consensus.
    #[serde(default)]
    pub new_pending: Vec<String>,
}

impl ConsensusDelta {
    /// The degraded no-change delta used when analysis fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty() && self.new_pending.is_empty()
    }
}

fn validate_statements(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .filter_map(|s| {
            let trimmed = s.trim();
            (trimmed.chars().count() > MIN_STATEMENT_CHARS).then(|| trimmed.to_string())
        })
        .collect()
}

/// Parse a consensus-analysis reply into a validated delta.
///
/// The model is asked for a JSON object with `confirmed` and
/// `new_pending` string lists; we locate the outermost braces so prose
/// around the object is tolerated. Entries failing the length rule are
/// discarded, not errors. A reply with no parseable object is a
/// [`DomainError::Parse`] — callers degrade it to an empty delta.
pub fn parse_consensus_delta(reply: &str) -> Result<ConsensusDelta, DomainError> {
    let start = reply
        .find('{')
        .ok_or_else(|| DomainError::Parse("no JSON object in consensus reply".to_string()))?;
    let end = reply[start..]
        .rfind('}')
        .ok_or_else(|| DomainError::Parse("unterminated JSON object".to_string()))?;

    let raw: ConsensusDelta = serde_json::from_str(&reply[start..start + end + 1])
        .map_err(|e| DomainError::Parse(format!("invalid consensus JSON: {e}")))?;

    Ok(ConsensusDelta {
        confirmed: validate_statements(raw.confirmed),
        new_pending: validate_statements(raw.new_pending),
    })
}

/// The session's accumulated consensus lists.
///
/// Both lists preserve insertion order and hold each statement at most
/// once. Membership is exact string equality post-trim — no fuzzy
/// deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusState {
    pub confirmed: Vec<String>,
    pub pending: Vec<String>,
}

impl ConsensusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one turn's delta.
    ///
    /// Newly confirmed statements are appended to `confirmed` (once) and
    /// removed from `pending` if they were awaiting confirmation. Newly
    /// proposed statements are appended to `pending` unless already
    /// present. Applying the same delta twice is a no-op the second time.
    pub fn apply(&mut self, delta: &ConsensusDelta) {
        for statement in &delta.confirmed {
            if !self.confirmed.contains(statement) {
                self.confirmed.push(statement.clone());
            }
            self.pending.retain(|p| p != statement);
        }
        for statement in &delta.new_pending {
            if !self.pending.contains(statement) {
                self.pending.push(statement.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let delta = parse_consensus_delta(
            r#"{"confirmed": ["both agree the method is sound"], "new_pending": []}"#,
        )
        .unwrap();
        assert_eq!(delta.confirmed, vec!["both agree the method is sound"]);
        assert!(delta.new_pending.is_empty());
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let reply = r#"Here is my analysis:
{"confirmed": [], "new_pending": ["the dataset needs rebalancing"]}
Hope that helps."#;
        let delta = parse_consensus_delta(reply).unwrap();
        assert_eq!(delta.new_pending, vec!["the dataset needs rebalancing"]);
    }

    #[test]
    fn test_parse_discards_short_statements() {
        let delta = parse_consensus_delta(
            r#"{"confirmed": ["ok", "  short  ", "this one is long enough"], "new_pending": ["x"]}"#,
        )
        .unwrap();
        assert_eq!(delta.confirmed, vec!["this one is long enough"]);
        assert!(delta.new_pending.is_empty());
    }

    #[test]
    fn test_parse_trims_statements() {
        let delta =
            parse_consensus_delta(r#"{"confirmed": ["  padded statement  "], "new_pending": []}"#)
                .unwrap();
        assert_eq!(delta.confirmed, vec!["padded statement"]);
    }

    #[test]
    fn test_parse_missing_fields_default_empty() {
        let delta = parse_consensus_delta(r#"{"confirmed": ["a longer statement"]}"#).unwrap();
        assert!(delta.new_pending.is_empty());
    }

    #[test]
    fn test_parse_no_json_is_error() {
        assert!(parse_consensus_delta("I could not decide.").is_err());
        assert!(parse_consensus_delta("").is_err());
    }

    #[test]
    fn test_merge_appends_confirmed() {
        let mut state = ConsensusState::new();
        state.apply(&ConsensusDelta {
            confirmed: vec!["statement one".to_string()],
            new_pending: vec!["statement two".to_string()],
        });
        assert_eq!(state.confirmed, vec!["statement one"]);
        assert_eq!(state.pending, vec!["statement two"]);
    }

    #[test]
    fn test_merge_promotes_pending_to_confirmed() {
        let mut state = ConsensusState {
            confirmed: vec![],
            pending: vec!["共识A不止五个字符".to_string()],
        };
        state.apply(&ConsensusDelta {
            confirmed: vec!["共识A不止五个字符".to_string()],
            new_pending: vec![],
        });
        assert_eq!(state.confirmed, vec!["共识A不止五个字符"]);
        assert!(state.pending.is_empty());
    }

    #[test]
    fn test_merge_itself_has_no_length_rule() {
        // Length validation belongs to parsing; the merge promotes any
        // exact-match statement, however short.
        let mut state = ConsensusState {
            confirmed: vec![],
            pending: vec!["共识A".to_string()],
        };
        state.apply(&ConsensusDelta {
            confirmed: vec!["共识A".to_string()],
            new_pending: vec![],
        });
        assert_eq!(state.confirmed, vec!["共识A"]);
        assert!(state.pending.is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut state = ConsensusState::new();
        let delta = ConsensusDelta {
            confirmed: vec!["a repeated statement".to_string()],
            new_pending: vec!["a repeated proposal".to_string()],
        };
        state.apply(&delta);
        state.apply(&delta);
        assert_eq!(state.confirmed, vec!["a repeated statement"]);
        assert_eq!(state.pending, vec!["a repeated proposal"]);
    }

    #[test]
    fn test_order_preserved() {
        let mut state = ConsensusState::new();
        state.apply(&ConsensusDelta {
            confirmed: vec!["first statement".to_string()],
            new_pending: vec![],
        });
        state.apply(&ConsensusDelta {
            confirmed: vec!["second statement".to_string()],
            new_pending: vec![],
        });
        assert_eq!(state.confirmed, vec!["first statement", "second statement"]);
    }
}
