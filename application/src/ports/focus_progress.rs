//! Progress notification port for the focus pipeline.
//!
//! The annotation fan-out reports after each completion with the current
//! (possibly partial) note sequence, in completion order. Callbacks run
//! synchronously on the orchestrating task.

use scholar_domain::InsightNote;

/// Callback for focus annotation progress.
///
/// Implementations live in the presentation layer and can display
/// partial notes as they arrive.
pub trait FocusProgress: Send + Sync {
    /// Called after each annotation completes (successfully or not) with
    /// every note recorded so far.
    fn on_note_recorded(&self, notes: &[InsightNote]);
}

/// No-op progress for when reporting is not needed.
pub struct NoFocusProgress;

impl FocusProgress for NoFocusProgress {
    fn on_note_recorded(&self, _notes: &[InsightNote]) {}
}
