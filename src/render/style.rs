//! Tag-to-color rules for suggestion cards.
//!
//! Matching is case-insensitive substring against an ordered rule list;
//! the first rule that matches wins, so a tag like "Security Testing"
//! stays red.

/// Visual tone for a tag pill. Each tone maps to a CSS class in the HTML
/// report and to an accent color in the TUI theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagTone {
    Red,
    Blue,
    Green,
    Yellow,
    Amber,
    Neutral,
}

/// Keyword rules in priority order.
const TAG_RULES: &[(&str, TagTone)] = &[
    ("priority", TagTone::Red),
    ("security", TagTone::Red),
    ("refactor", TagTone::Blue),
    ("backend", TagTone::Blue),
    ("ui/ux", TagTone::Green),
    ("frontend", TagTone::Green),
    ("testing", TagTone::Yellow),
    ("todo", TagTone::Amber),
];

/// Classify a tag label into its display tone.
pub fn tag_tone(tag: &str) -> TagTone {
    let lower = tag.to_lowercase();
    for (keyword, tone) in TAG_RULES {
        if lower.contains(keyword) {
            return *tone;
        }
    }
    TagTone::Neutral
}

impl TagTone {
    pub fn css_class(&self) -> &'static str {
        match self {
            TagTone::Red => "tag-red",
            TagTone::Blue => "tag-blue",
            TagTone::Green => "tag-green",
            TagTone::Yellow => "tag-yellow",
            TagTone::Amber => "tag-amber",
            TagTone::Neutral => "tag-neutral",
        }
    }
}
