//! Attachment decoding for chat input.
//!
//! Text files become inline transcript text; images become base64 for the
//! provider's image-part payload. Decode problems degrade to a readable
//! placeholder string so a bad attachment never aborts a session.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use scholar_application::ports::media::MediaCodec;

/// Stdlib-backed codec: UTF-8 text extraction and base64 image encoding.
pub struct BasicMediaCodec;

impl MediaCodec for BasicMediaCodec {
    fn extract_text(&self, bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(text) => text.trim().to_string(),
            Err(e) => format!("[unreadable attachment: {e}]"),
        }
    }

    fn encode_image(&self, bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }
}
