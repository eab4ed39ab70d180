//! Application state for the TUI.
//!
//! One submission at a time: submitting bumps the generation, clears the
//! previous result set, and enters the loading state. Exactly one of the
//! five UI states is active at any moment.

pub mod background;
pub mod input;
pub mod messages;

use crate::config::{Settings, SettingsStore};
use crate::github;
use crate::llm::AnalysisRequest;
use crate::render::report;
use crate::spinner::Spinner;
use crate::suggest::Suggestion;
use std::path::PathBuf;

/// Generic user-facing failure message; the underlying cause stays in
/// `last_error_detail`.
pub const GENERIC_FAILURE: &str = "Failed to get suggestions. Please check the repository URL and try again. The AI may be unable to access the repository or the content is too large.";

const MISSING_KEY_MESSAGE: &str =
    "API key not found. Set GEMINI_API_KEY or run 'bountyscout --setup' before analyzing.";

/// Mutually exclusive top-level UI states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiState {
    Welcome,
    Loading,
    Results,
    Empty,
    Error(String),
}

/// Which element receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    RepoUrl,
    Goal,
    Results,
}

pub struct App {
    pub settings: Settings,
    store: Box<dyn SettingsStore>,

    pub state: UiState,
    pub focus: Focus,
    pub show_settings: bool,

    pub repo_input: String,
    pub goal_input: String,

    /// Submission counter; a completed call whose generation doesn't match
    /// is discarded rather than rendered.
    pub generation: u64,
    /// Repo URL snapshot of the in-flight (or last finished) submission.
    pub submitted_repo_url: String,

    pub suggestions: Vec<Suggestion>,
    pub repo_slug: String,
    pub selected: usize,
    pub detail_scroll: u16,

    pub last_error_detail: Option<String>,
    pub report_path: Option<PathBuf>,
    pub spinner: Spinner,
    pub should_quit: bool,
    api_key_missing: bool,
}

impl App {
    pub fn new(settings: Settings, store: Box<dyn SettingsStore>, api_key_missing: bool) -> Self {
        let state = if api_key_missing {
            UiState::Error(MISSING_KEY_MESSAGE.to_string())
        } else {
            UiState::Welcome
        };

        Self {
            settings,
            store,
            state,
            focus: Focus::RepoUrl,
            show_settings: false,
            repo_input: String::new(),
            goal_input: String::new(),
            generation: 0,
            submitted_repo_url: String::new(),
            suggestions: Vec::new(),
            repo_slug: String::new(),
            selected: 0,
            detail_scroll: 0,
            last_error_detail: None,
            report_path: None,
            spinner: Spinner::new(),
            should_quit: false,
            api_key_missing,
        }
    }

    /// Start a new submission, or refuse while one is in flight. Entering
    /// the loading state clears whatever was visible before.
    pub fn submit(&mut self) -> Option<AnalysisRequest> {
        if self.state == UiState::Loading {
            return None;
        }
        if self.api_key_missing {
            self.state = UiState::Error(MISSING_KEY_MESSAGE.to_string());
            return None;
        }
        let repo_url = self.repo_input.trim().to_string();
        if repo_url.is_empty() {
            return None;
        }

        self.generation += 1;
        self.submitted_repo_url = repo_url.clone();
        self.suggestions.clear();
        self.repo_slug.clear();
        self.selected = 0;
        self.detail_scroll = 0;
        self.last_error_detail = None;
        self.report_path = None;
        self.state = UiState::Loading;

        Some(AnalysisRequest {
            repo_url,
            user_goal: self.goal_input.trim().to_string(),
            scan_todos: self.settings.scan_todos,
        })
    }

    /// Handle a finished analysis. Stale generations are dropped without
    /// touching any state.
    pub fn finish_success(&mut self, generation: u64, suggestions: Vec<Suggestion>) {
        if generation != self.generation {
            return;
        }

        match github::repo_slug(&self.submitted_repo_url) {
            Ok(slug) => self.repo_slug = slug,
            Err(err) => {
                self.finish_error(generation, format!("{:#}", err));
                return;
            }
        }

        if suggestions.is_empty() {
            self.suggestions.clear();
            self.state = UiState::Empty;
            self.focus = Focus::RepoUrl;
        } else {
            self.suggestions = suggestions;
            self.selected = 0;
            self.detail_scroll = 0;
            self.state = UiState::Results;
            self.focus = Focus::Results;
        }
    }

    /// Handle a failed analysis. The user sees the generic message; the
    /// detail is kept for the error panel. Stale generations are dropped.
    pub fn finish_error(&mut self, generation: u64, detail: String) {
        if generation != self.generation {
            return;
        }
        self.last_error_detail = Some(detail);
        self.state = UiState::Error(GENERIC_FAILURE.to_string());
        self.focus = Focus::RepoUrl;
    }

    /// Flip the TODO-scan preference and persist it immediately.
    pub fn toggle_scan_todos(&mut self) {
        self.settings.scan_todos = !self.settings.scan_todos;
        if let Err(err) = self.settings.save(self.store.as_ref()) {
            self.last_error_detail = Some(err);
        }
    }

    pub fn select_next(&mut self) {
        if !self.suggestions.is_empty() && self.selected + 1 < self.suggestions.len() {
            self.selected += 1;
            self.detail_scroll = 0;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.detail_scroll = 0;
        }
    }

    pub fn selected_suggestion(&self) -> Option<&Suggestion> {
        self.suggestions.get(self.selected)
    }

    /// Open the selected card's prefilled new-issue page in the browser.
    pub fn open_selected_issue(&mut self) {
        if let Some(suggestion) = self.selected_suggestion() {
            let record = suggestion.with_todo_tag();
            let url = github::new_issue_url(&self.repo_slug, &record.title, &record.description);
            if let Err(err) = github::open_url(&url) {
                self.last_error_detail = Some(format!("{:#}", err));
            }
        }
    }

    /// Write the card report for the current result set and open it.
    pub fn open_report(&mut self) {
        if self.state != UiState::Results && self.state != UiState::Empty {
            return;
        }
        let path = std::env::temp_dir().join("bountyscout-report.html");
        match report::write_report(&path, &self.repo_slug, &self.suggestions) {
            Ok(()) => {
                if let Err(err) = github::open_url(&path.display().to_string()) {
                    self.last_error_detail = Some(format!("{:#}", err));
                }
                self.report_path = Some(path);
            }
            Err(err) => self.last_error_detail = Some(format!("{:#}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::testing::MemoryStore;
    use crate::suggest::SuggestionKind;

    fn app() -> App {
        App::new(
            Settings::default(),
            Box::new(MemoryStore::empty()),
            false,
        )
    }

    fn suggestion(title: &str) -> Suggestion {
        Suggestion {
            title: title.to_string(),
            description: "### Problem\nx".to_string(),
            kind: SuggestionKind::Improvement,
            tags: vec!["Refactor".to_string()],
        }
    }

    #[test]
    fn test_submit_requires_repo_url() {
        let mut app = app();
        assert!(app.submit().is_none());
        assert_eq!(app.state, UiState::Welcome);
    }

    #[test]
    fn test_submit_enters_loading_and_bumps_generation() {
        let mut app = app();
        app.repo_input = "https://github.com/a/b".to_string();
        let request = app.submit().unwrap();
        assert_eq!(request.repo_url, "https://github.com/a/b");
        assert_eq!(app.state, UiState::Loading);
        assert_eq!(app.generation, 1);
    }

    #[test]
    fn test_submit_refused_while_loading() {
        let mut app = app();
        app.repo_input = "https://github.com/a/b".to_string();
        assert!(app.submit().is_some());
        assert!(app.submit().is_none());
        assert_eq!(app.generation, 1);
    }

    #[test]
    fn test_missing_api_key_blocks_submission() {
        let mut app = App::new(
            Settings::default(),
            Box::new(MemoryStore::empty()),
            true,
        );
        assert!(matches!(app.state, UiState::Error(_)));
        app.repo_input = "https://github.com/a/b".to_string();
        assert!(app.submit().is_none());
    }

    #[test]
    fn test_success_renders_results() {
        let mut app = app();
        app.repo_input = "https://github.com/rust-lang/cargo".to_string();
        app.submit().unwrap();
        app.finish_success(1, vec![suggestion("one"), suggestion("two")]);
        assert_eq!(app.state, UiState::Results);
        assert_eq!(app.repo_slug, "rust-lang/cargo");
        assert_eq!(app.suggestions.len(), 2);
    }

    #[test]
    fn test_empty_result_set_enters_empty_state() {
        let mut app = app();
        app.repo_input = "https://github.com/a/b".to_string();
        app.submit().unwrap();
        app.finish_success(1, Vec::new());
        assert_eq!(app.state, UiState::Empty);
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut app = app();
        app.repo_input = "https://github.com/a/b".to_string();
        app.submit().unwrap();
        app.state = UiState::Welcome; // pretend the first run was abandoned
        app.submit().unwrap();
        assert_eq!(app.generation, 2);

        // A result from the first submission arrives late.
        app.finish_success(1, vec![suggestion("stale")]);
        assert_eq!(app.state, UiState::Loading);
        assert!(app.suggestions.is_empty());

        app.finish_error(1, "stale failure".to_string());
        assert_eq!(app.state, UiState::Loading);
        assert!(app.last_error_detail.is_none());
    }

    #[test]
    fn test_error_shows_generic_message_and_keeps_detail() {
        let mut app = app();
        app.repo_input = "https://github.com/a/b".to_string();
        app.submit().unwrap();
        app.finish_error(1, "status 503: upstream".to_string());
        assert_eq!(app.state, UiState::Error(GENERIC_FAILURE.to_string()));
        assert_eq!(app.last_error_detail.as_deref(), Some("status 503: upstream"));
    }

    #[test]
    fn test_new_submission_clears_previous_results() {
        let mut app = app();
        app.repo_input = "https://github.com/a/b".to_string();
        app.submit().unwrap();
        app.finish_success(1, vec![suggestion("old")]);

        app.submit().unwrap();
        assert_eq!(app.state, UiState::Loading);
        assert!(app.suggestions.is_empty());
    }

    #[test]
    fn test_toggle_persists_preference() {
        let store = MemoryStore::empty();
        // The store moves into the app; observe through a reload instead.
        let mut app = App::new(Settings::default(), Box::new(store), false);
        assert!(app.settings.scan_todos);
        app.toggle_scan_todos();
        assert!(!app.settings.scan_todos);
        assert!(app.last_error_detail.is_none());
    }

    #[test]
    fn test_selection_is_bounded() {
        let mut app = app();
        app.repo_input = "https://github.com/a/b".to_string();
        app.submit().unwrap();
        app.finish_success(1, vec![suggestion("one"), suggestion("two")]);

        app.select_prev();
        assert_eq!(app.selected, 0);
        app.select_next();
        assert_eq!(app.selected, 1);
        app.select_next();
        assert_eq!(app.selected, 1);
    }
}
