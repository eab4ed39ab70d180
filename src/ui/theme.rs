//! Greyscale theme with a handful of semantic accents.
//!
//! The base palette stays monochrome; color is reserved for tag pills and
//! card icons so the cards read at a glance.

use crate::render::style::TagTone;
use crate::suggest::SuggestionKind;
use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    // ─────────────────────────────────────────────────────────────────────
    // Core greyscale palette - from brightest to darkest
    // ─────────────────────────────────────────────────────────────────────

    /// Pure white - maximum emphasis
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    /// Bright grey - primary text
    pub const GREY_100: Color = Color::Rgb(220, 220, 220);

    /// Light grey - secondary text
    pub const GREY_200: Color = Color::Rgb(180, 180, 180);

    /// Medium grey - muted text
    pub const GREY_300: Color = Color::Rgb(140, 140, 140);

    /// Dark grey - subtle elements
    pub const GREY_400: Color = Color::Rgb(100, 100, 100);

    /// Darker grey - borders, separators
    pub const GREY_500: Color = Color::Rgb(70, 70, 70);

    /// Near black - main background
    pub const GREY_800: Color = Color::Rgb(28, 28, 28);

    /// True black - deepest background
    pub const GREY_900: Color = Color::Rgb(18, 18, 18);

    // ─────────────────────────────────────────────────────────────────────
    // Accent colors for tags, icons and state banners
    // ─────────────────────────────────────────────────────────────────────

    pub const RED: Color = Color::Rgb(220, 105, 105);
    pub const BLUE: Color = Color::Rgb(110, 150, 230);
    pub const GREEN: Color = Color::Rgb(110, 200, 120);
    pub const YELLOW: Color = Color::Rgb(215, 195, 90);
    pub const AMBER: Color = Color::Rgb(230, 165, 70);
    pub const PURPLE: Color = Color::Rgb(180, 130, 220);
    pub const ACCENT: Color = Color::Rgb(140, 150, 245);

    /// Main background style
    pub fn bg() -> Style {
        Style::default().bg(Self::GREY_900)
    }

    /// Primary text style
    pub fn text() -> Style {
        Style::default().fg(Self::GREY_100)
    }

    /// Secondary/muted text
    pub fn text_muted() -> Style {
        Style::default().fg(Self::GREY_300)
    }

    /// Dimmed text for hints
    pub fn text_dim() -> Style {
        Style::default().fg(Self::GREY_400)
    }

    /// Section/card titles
    pub fn title() -> Style {
        Style::default().fg(Self::WHITE).add_modifier(Modifier::BOLD)
    }

    /// Border around unfocused panels
    pub fn border() -> Style {
        Style::default().fg(Self::GREY_500)
    }

    /// Border around the focused panel
    pub fn border_focused() -> Style {
        Style::default().fg(Self::GREY_200)
    }

    /// Error banner text
    pub fn error() -> Style {
        Style::default().fg(Self::RED).add_modifier(Modifier::BOLD)
    }

    /// Tag pill color for a classified tone.
    pub fn tag_color(tone: TagTone) -> Color {
        match tone {
            TagTone::Red => Self::RED,
            TagTone::Blue => Self::BLUE,
            TagTone::Green => Self::GREEN,
            TagTone::Yellow => Self::YELLOW,
            TagTone::Amber => Self::AMBER,
            TagTone::Neutral => Self::GREY_300,
        }
    }

    /// Icon color for a suggestion kind; the default arm covers
    /// `Improvement`.
    pub fn kind_color(kind: SuggestionKind) -> Color {
        match kind {
            SuggestionKind::Vulnerability => Self::RED,
            SuggestionKind::Feature => Self::PURPLE,
            SuggestionKind::Todo => Self::AMBER,
            _ => Self::BLUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_tones_map_to_distinct_accents() {
        assert_ne!(Theme::tag_color(TagTone::Red), Theme::tag_color(TagTone::Blue));
        assert_eq!(Theme::tag_color(TagTone::Neutral), Theme::GREY_300);
    }

    #[test]
    fn test_improvement_uses_default_icon_color() {
        assert_eq!(Theme::kind_color(SuggestionKind::Improvement), Theme::BLUE);
    }
}
