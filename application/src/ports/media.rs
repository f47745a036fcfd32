//! Document and image extraction port.
//!
//! Extraction failures never raise in this system: `extract_text`
//! degrades to a descriptive error string placed where text is expected,
//! so uploads with broken content surface inline instead of halting a
//! session.

/// Capability for turning uploaded bytes into model-ready payloads.
pub trait MediaCodec: Send + Sync {
    /// Extract readable text from a document. On parse failure, returns a
    /// descriptive error string instead of an error.
    fn extract_text(&self, bytes: &[u8]) -> String;

    /// Encode an image as base64 for a vision-capable model.
    fn encode_image(&self, bytes: &[u8]) -> String;
}
