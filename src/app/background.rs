//! Background task handling.
//!
//! One submission spawns one task. Results come back over an mpsc channel
//! and are drained between frames; anything from a superseded generation
//! is dropped on the floor. Channel sends use `let _ =` because a dropped
//! receiver just means the app is shutting down.

use crate::app::messages::BackgroundMessage;
use crate::app::App;
use crate::llm::{self, AnalysisRequest};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc;

/// Apply all pending background messages to the app state.
pub fn drain_messages(app: &mut App, rx: &mpsc::Receiver<BackgroundMessage>) {
    while let Ok(msg) = rx.try_recv() {
        match msg {
            BackgroundMessage::SuggestionsReady {
                generation,
                suggestions,
            } => app.finish_success(generation, suggestions),
            BackgroundMessage::SuggestionsError { generation, detail } => {
                app.finish_error(generation, detail)
            }
        }
    }
}

/// Run one analysis in the background. Panics inside the task surface as
/// an error message instead of killing the app silently.
pub fn spawn_analysis(
    tx: mpsc::Sender<BackgroundMessage>,
    request: AnalysisRequest,
    generation: u64,
) {
    tokio::spawn(async move {
        let outcome = AssertUnwindSafe(llm::fetch_suggestions(&request))
            .catch_unwind()
            .await;

        let message = match outcome {
            Ok(Ok(suggestions)) => BackgroundMessage::SuggestionsReady {
                generation,
                suggestions,
            },
            Ok(Err(err)) => BackgroundMessage::SuggestionsError {
                generation,
                detail: format!("{:#}", err),
            },
            Err(panic) => {
                let detail = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic payload".to_string()
                };
                BackgroundMessage::SuggestionsError {
                    generation,
                    detail: format!("Analysis task crashed unexpectedly: {}", detail),
                }
            }
        };

        let _ = tx.send(message);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::testing::MemoryStore;
    use crate::config::Settings;
    use crate::suggest::{Suggestion, SuggestionKind};

    fn app_with_submission() -> App {
        let mut app = App::new(Settings::default(), Box::new(MemoryStore::empty()), false);
        app.repo_input = "https://github.com/a/b".to_string();
        app.submit().unwrap();
        app
    }

    #[test]
    fn test_drain_applies_current_generation() {
        let mut app = app_with_submission();
        let (tx, rx) = mpsc::channel();
        tx.send(BackgroundMessage::SuggestionsReady {
            generation: 1,
            suggestions: vec![Suggestion {
                title: "t".to_string(),
                description: "d".to_string(),
                kind: SuggestionKind::Feature,
                tags: vec![],
            }],
        })
        .unwrap();

        drain_messages(&mut app, &rx);
        assert_eq!(app.suggestions.len(), 1);
    }

    #[test]
    fn test_drain_discards_stale_generation() {
        let mut app = app_with_submission();
        let (tx, rx) = mpsc::channel();
        tx.send(BackgroundMessage::SuggestionsError {
            generation: 0,
            detail: "stale".to_string(),
        })
        .unwrap();

        drain_messages(&mut app, &rx);
        assert_eq!(app.state, crate::app::UiState::Loading);
        assert!(app.last_error_detail.is_none());
    }
}
