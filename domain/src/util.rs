//! Shared utility functions.

/// Truncate a string to at most `max_chars` characters.
///
/// The moderator's decision window and the consensus history snippets are
/// specified in characters, not bytes, so this counts `char`s and always
/// cuts on a character boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
