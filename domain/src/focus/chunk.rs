//! Semantic chunking of long-form input.
//!
//! Splitting favors fewer, context-rich chunks: a chunk ends only when it
//! has grown past the length threshold *and* the current character is a
//! sentence terminator, so no chunk is ever cut mid-sentence.

/// Default chunk length threshold in characters.
pub const DEFAULT_MAX_CHUNK_LEN: usize = 300;

/// Sentence-ending characters that may close a chunk. Delimiters are
/// retained in the chunk they terminate.
const TERMINATORS: [char; 7] = ['。', '！', '？', '.', '!', '?', '\n'];

fn is_terminator(c: char) -> bool {
    TERMINATORS.contains(&c)
}

/// Split `text` into delimiter-respecting chunks.
///
/// A chunk is emitted once the running buffer holds at least `max_len`
/// characters and the character just consumed is a terminator. Any
/// non-empty trailing buffer is flushed as a final chunk regardless of
/// length. Each emitted chunk is trimmed of surrounding whitespace; empty
/// or all-whitespace input yields no chunks.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_chars = 0usize;

    for c in text.chars() {
        buffer.push(c);
        buffer_chars += 1;

        if buffer_chars >= max_len && is_terminator(c) {
            let chunk = buffer.trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }
            buffer.clear();
            buffer_chars = 0;
        }
    }

    let tail = buffer.trim();
    if !tail.is_empty() {
        chunks.push(tail.to_string());
    }

    chunks
}
