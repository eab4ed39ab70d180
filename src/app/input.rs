//! Key handling for the TUI.
//!
//! Text keys go to the focused input; control chords drive the rest.
//! Returns the analysis request to spawn when the user submits.

use crate::app::{App, Focus, UiState};
use crate::llm::AnalysisRequest;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<AnalysisRequest> {
    // Global chords first.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => {
                app.should_quit = true;
                return None;
            }
            KeyCode::Char('s') => {
                app.show_settings = !app.show_settings;
                if !app.show_settings && app.focus == Focus::Goal {
                    app.focus = Focus::RepoUrl;
                }
                return None;
            }
            KeyCode::Char('t') => {
                app.toggle_scan_todos();
                return None;
            }
            _ => return None,
        }
    }

    match key.code {
        KeyCode::Esc => {
            // Esc backs out of an error display first, then quits.
            if matches!(app.state, UiState::Error(_)) {
                app.state = UiState::Welcome;
            } else {
                app.should_quit = true;
            }
            None
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.focus = next_focus(app);
            None
        }
        KeyCode::Enter => match app.focus {
            Focus::RepoUrl | Focus::Goal => app.submit(),
            Focus::Results => {
                app.open_selected_issue();
                None
            }
        },
        KeyCode::Up => {
            if app.focus == Focus::Results {
                app.select_prev();
            }
            None
        }
        KeyCode::Down => {
            if app.focus == Focus::Results {
                app.select_next();
            }
            None
        }
        KeyCode::PageUp => {
            app.detail_scroll = app.detail_scroll.saturating_sub(5);
            None
        }
        KeyCode::PageDown => {
            app.detail_scroll = app.detail_scroll.saturating_add(5);
            None
        }
        KeyCode::Backspace => {
            match app.focus {
                Focus::RepoUrl => {
                    app.repo_input.pop();
                }
                Focus::Goal => {
                    app.goal_input.pop();
                }
                Focus::Results => {}
            }
            None
        }
        KeyCode::Char(c) => match app.focus {
            Focus::RepoUrl => {
                app.repo_input.push(c);
                None
            }
            Focus::Goal => {
                app.goal_input.push(c);
                None
            }
            Focus::Results => {
                match c {
                    'j' => app.select_next(),
                    'k' => app.select_prev(),
                    'o' => app.open_report(),
                    'q' => app.should_quit = true,
                    _ => {}
                }
                None
            }
        },
        _ => None,
    }
}

fn next_focus(app: &App) -> Focus {
    match app.focus {
        Focus::RepoUrl => {
            if app.show_settings {
                Focus::Goal
            } else if !app.suggestions.is_empty() {
                Focus::Results
            } else {
                Focus::RepoUrl
            }
        }
        Focus::Goal => {
            if !app.suggestions.is_empty() {
                Focus::Results
            } else {
                Focus::RepoUrl
            }
        }
        Focus::Results => Focus::RepoUrl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::testing::MemoryStore;
    use crate::config::Settings;
    use crate::suggest::{Suggestion, SuggestionKind};

    fn app() -> App {
        App::new(Settings::default(), Box::new(MemoryStore::empty()), false)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_typing_fills_repo_input() {
        let mut app = app();
        for c in "https://x".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        assert_eq!(app.repo_input, "https://x");
        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.repo_input, "https://");
    }

    #[test]
    fn test_enter_submits_from_inputs() {
        let mut app = app();
        app.repo_input = "https://github.com/a/b".to_string();
        let request = handle_key(&mut app, press(KeyCode::Enter));
        assert!(request.is_some());
    }

    #[test]
    fn test_enter_ignored_while_loading() {
        let mut app = app();
        app.repo_input = "https://github.com/a/b".to_string();
        handle_key(&mut app, press(KeyCode::Enter)).unwrap();
        assert!(handle_key(&mut app, press(KeyCode::Enter)).is_none());
    }

    #[test]
    fn test_ctrl_t_toggles_scan_preference() {
        let mut app = app();
        assert!(app.settings.scan_todos);
        handle_key(&mut app, ctrl('t'));
        assert!(!app.settings.scan_todos);
    }

    #[test]
    fn test_navigation_in_results() {
        let mut app = app();
        app.repo_input = "https://github.com/a/b".to_string();
        app.submit().unwrap();
        let record = Suggestion {
            title: "t".to_string(),
            description: "d".to_string(),
            kind: SuggestionKind::Improvement,
            tags: vec![],
        };
        app.finish_success(1, vec![record.clone(), record]);
        assert_eq!(app.focus, Focus::Results);

        handle_key(&mut app, press(KeyCode::Down));
        assert_eq!(app.selected, 1);
        handle_key(&mut app, press(KeyCode::Char('k')));
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_esc_clears_error_before_quitting() {
        let mut app = app();
        app.state = UiState::Error("boom".to_string());
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.state, UiState::Welcome);
        assert!(!app.should_quit);
        handle_key(&mut app, press(KeyCode::Esc));
        assert!(app.should_quit);
    }
}
