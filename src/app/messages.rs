//! Messages from background tasks to the main UI thread.
//!
//! Every message carries the generation of the submission that produced
//! it; the drain discards anything stale.

use crate::suggest::Suggestion;

pub enum BackgroundMessage {
    SuggestionsReady {
        generation: u64,
        suggestions: Vec<Suggestion>,
    },
    SuggestionsError {
        generation: u64,
        /// Diagnostic detail; the UI shows a generic message and keeps
        /// this for the error panel.
        detail: String,
    },
}
