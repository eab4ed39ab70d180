//! Suggestion records returned by the model.
//!
//! One record per proposed issue; a fresh analysis replaces the whole set.

use serde::{Deserialize, Serialize};

/// Kind of suggestion, matching the closed enumeration the request schema
/// asks the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Improvement,
    Vulnerability,
    Feature,
    Todo,
}

impl SuggestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionKind::Improvement => "Improvement",
            SuggestionKind::Vulnerability => "Vulnerability",
            SuggestionKind::Feature => "Feature",
            SuggestionKind::Todo => "TODO",
        }
    }

    /// Display glyph for the card header. The default arm covers
    /// `Improvement` alongside anything future schema revisions might add.
    pub fn glyph(&self) -> &'static str {
        match self {
            SuggestionKind::Vulnerability => "⚠",
            SuggestionKind::Feature => "✦",
            SuggestionKind::Todo => "✔",
            _ => "✎",
        }
    }
}

/// A proposed improvement for the analyzed repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    /// Markdown body following the Problem / Proposed Solution /
    /// Required Technologies template the prompt asks for.
    pub description: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    /// Ordered display tags, 2-3 expected but not enforced.
    pub tags: Vec<String>,
}

impl Suggestion {
    /// Return a copy with a leading `TODO` tag when the record is a TODO
    /// conversion and the model didn't tag it as one. Never mutates the
    /// parsed record, so rendering the same record twice can't prepend
    /// twice.
    pub fn with_todo_tag(&self) -> Self {
        let mut record = self.clone();
        if record.kind == SuggestionKind::Todo && !record.tags.iter().any(|t| t == "TODO") {
            record.tags.insert(0, "TODO".to_string());
        }
        record
    }
}
