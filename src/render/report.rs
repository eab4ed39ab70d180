//! HTML report of suggestion cards.
//!
//! Self-contained document: embedded stylesheet (including the
//! highlighter's theme CSS), one card per suggestion, a prefilled
//! new-issue link per card.

use crate::github;
use crate::render::markdown::markdown_to_html;
use crate::render::style::tag_tone;
use crate::render::escape_html;
use crate::suggest::Suggestion;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::OnceLock;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle};

/// Highlighter theme CSS, generated once. Empty on failure; the report
/// still renders, just without token colors.
fn highlight_css() -> &'static str {
    static CSS: OnceLock<String> = OnceLock::new();
    CSS.get_or_init(|| {
        let themes = ThemeSet::load_defaults();
        themes
            .themes
            .get("InspiredGitHub")
            .and_then(|theme| css_for_theme_with_class_style(theme, ClassStyle::Spaced).ok())
            .unwrap_or_default()
    })
}

const REPORT_STYLE: &str = r#"
body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; background: #f1f5f9; color: #1e293b; margin: 0; padding: 2rem; }
main { max-width: 56rem; margin: 0 auto; }
h2 { font-size: 1.5rem; margin-bottom: 1.25rem; }
h2 .repo { color: #4f46e5; }
.empty { color: #64748b; text-align: center; padding: 2rem 0; }
.card { background: #fff; border-radius: 0.5rem; box-shadow: 0 1px 4px rgba(15, 23, 42, 0.12); padding: 1.5rem; margin-bottom: 1.25rem; }
.card-head { display: flex; align-items: baseline; gap: 0.6rem; }
.card-head .icon { font-size: 1.2rem; }
.icon-vulnerability { color: #ef4444; }
.icon-feature { color: #a855f7; }
.icon-todo { color: #f59e0b; }
.icon-improvement { color: #3b82f6; }
.card h3 { font-size: 1.1rem; margin: 0; }
.tags { margin: 0.6rem 0 1rem; }
.tag { font-size: 0.75rem; font-weight: 500; border-radius: 9999px; padding: 0.25rem 0.65rem; margin-right: 0.5rem; }
.tag-red { background: #fee2e2; color: #991b1b; }
.tag-blue { background: #dbeafe; color: #1e40af; }
.tag-green { background: #dcfce7; color: #166534; }
.tag-yellow { background: #fef9c3; color: #854d0e; }
.tag-amber { background: #fef3c7; color: #92400e; }
.tag-neutral { background: #f1f5f9; color: #334155; }
.markdown-body { font-size: 0.9rem; line-height: 1.6; color: #334155; }
.markdown-body pre { background: #f8fafc; border-radius: 0.375rem; padding: 0.75rem; overflow-x: auto; }
.markdown-body code { font-family: ui-monospace, 'SF Mono', Menlo, monospace; font-size: 0.85em; }
.actions { margin-top: 1.25rem; text-align: right; }
.issue-link { display: inline-block; background: #1e293b; color: #fff; font-weight: 600; text-decoration: none; padding: 0.5rem 1rem; border-radius: 0.375rem; }
.issue-link:hover { background: #0f172a; }
"#;

/// Render the full report document for one analysis.
pub fn render_report(repo_slug: &str, suggestions: &[Suggestion]) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<h2>Suggestions for <span class=\"repo\">{}</span></h2>\n",
        escape_html(repo_slug)
    ));

    if suggestions.is_empty() {
        body.push_str(
            "<p class=\"empty\">The AI couldn't find any specific suggestions for this repository.</p>\n",
        );
    } else {
        for suggestion in suggestions {
            body.push_str(&render_card(repo_slug, suggestion));
        }
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Suggestions for {}</title>\n<style>{}\n{}</style>\n</head>\n\
         <body>\n<main>\n{}</main>\n</body>\n</html>\n",
        escape_html(repo_slug),
        REPORT_STYLE,
        highlight_css(),
        body
    )
}

/// Render one suggestion card. Works on a TODO-tag-adjusted copy; the
/// caller's record is left as parsed.
fn render_card(repo_slug: &str, suggestion: &Suggestion) -> String {
    let record = suggestion.with_todo_tag();

    let icon_class = match record.kind {
        crate::suggest::SuggestionKind::Vulnerability => "icon-vulnerability",
        crate::suggest::SuggestionKind::Feature => "icon-feature",
        crate::suggest::SuggestionKind::Todo => "icon-todo",
        _ => "icon-improvement",
    };

    let tags: String = record
        .tags
        .iter()
        .map(|tag| {
            format!(
                "<span class=\"tag {}\">{}</span>",
                tag_tone(tag).css_class(),
                escape_html(tag)
            )
        })
        .collect();

    // The issue body is the raw markdown, not the rendered form.
    let issue_url = github::new_issue_url(repo_slug, &record.title, &record.description);
    let description = markdown_to_html(&record.description);

    format!(
        "<div class=\"card\">\n\
         <div class=\"card-head\"><span class=\"icon {}\">{}</span><h3>{}</h3></div>\n\
         <div class=\"tags\">{}</div>\n\
         <div class=\"markdown-body\">{}</div>\n\
         <div class=\"actions\"><a class=\"issue-link\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Create GitHub Issue</a></div>\n\
         </div>\n",
        icon_class,
        record.kind.glyph(),
        escape_html(&record.title),
        tags,
        description,
        escape_html(&issue_url)
    )
}

/// Write the report to disk, creating parent directories as needed.
pub fn write_report(path: &Path, repo_slug: &str, suggestions: &[Suggestion]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, render_report(repo_slug, suggestions))
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
