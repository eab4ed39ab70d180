//! Markdown to ratatui styled text converter.
//!
//! Drives the card bodies in the results view. Uses the markdown event
//! parser so descriptions render consistent rich text, wrapped to the
//! panel width.

use super::theme::Theme;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Clone, Copy, Default)]
struct InlineState {
    bold: usize,
    italic: usize,
    link: usize,
}

impl InlineState {
    fn style(&self, mut base: Style) -> Style {
        if self.bold > 0 {
            base = base.add_modifier(Modifier::BOLD).fg(Theme::WHITE);
        }
        if self.italic > 0 {
            base = base.add_modifier(Modifier::ITALIC);
        }
        if self.link > 0 {
            base = base.fg(Theme::ACCENT).add_modifier(Modifier::UNDERLINED);
        }
        base
    }
}

#[derive(Clone)]
struct Segment {
    text: String,
    style: Style,
}

/// Per-block prefix and base style: list bullets, quote bars, code gutters.
#[derive(Clone)]
struct BlockFormat {
    first_prefix: String,
    cont_prefix: String,
    prefix_style: Style,
    base_style: Style,
}

impl BlockFormat {
    fn paragraph() -> Self {
        Self {
            first_prefix: String::new(),
            cont_prefix: String::new(),
            prefix_style: Style::default().fg(Theme::GREY_500),
            base_style: Style::default().fg(Theme::GREY_100),
        }
    }

    fn heading(level: HeadingLevel) -> Self {
        let base_style = match level {
            HeadingLevel::H1 => Style::default()
                .fg(Theme::WHITE)
                .add_modifier(Modifier::BOLD),
            HeadingLevel::H2 => Style::default()
                .fg(Theme::GREY_100)
                .add_modifier(Modifier::BOLD),
            _ => Style::default()
                .fg(Theme::GREY_200)
                .add_modifier(Modifier::BOLD),
        };
        Self {
            first_prefix: String::new(),
            cont_prefix: String::new(),
            prefix_style: Style::default().fg(Theme::GREY_500),
            base_style,
        }
    }

    fn list_item(marker: String, depth: usize) -> Self {
        let indent = "  ".repeat(depth);
        let cont = format!("{}{}", indent, " ".repeat(marker.chars().count()));
        Self {
            first_prefix: format!("{}{}", indent, marker),
            cont_prefix: cont,
            prefix_style: Style::default().fg(Theme::GREY_400),
            base_style: Style::default().fg(Theme::GREY_100),
        }
    }

    fn quote() -> Self {
        Self {
            first_prefix: "│ ".to_string(),
            cont_prefix: "│ ".to_string(),
            prefix_style: Style::default().fg(Theme::GREY_500),
            base_style: Style::default().fg(Theme::GREY_200),
        }
    }

    fn code_block() -> Self {
        Self {
            first_prefix: "│ ".to_string(),
            cont_prefix: "│ ".to_string(),
            prefix_style: Style::default().fg(Theme::GREY_500),
            base_style: Style::default().fg(Theme::GREY_200),
        }
    }
}

#[derive(Clone, Copy)]
enum ListState {
    Bullet,
    Ordered(u64),
}

/// Parse markdown text and convert to styled lines constrained by
/// `max_width`.
pub fn parse_markdown(text: &str, max_width: usize) -> Vec<Line<'static>> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(text, options);

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut inline = InlineState::default();
    let mut list_stack: Vec<ListState> = Vec::new();
    let mut block = BlockFormat::paragraph();
    let mut segments: Vec<Segment> = Vec::new();
    let mut in_code_block = false;

    let flush = |lines: &mut Vec<Line<'static>>, block: &BlockFormat, segments: &mut Vec<Segment>| {
        if segments.is_empty() {
            return;
        }
        lines.extend(wrap_segments(segments, block, max_width.max(1)));
        segments.clear();
    };

    for event in parser {
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph => {
                    flush(&mut lines, &block, &mut segments);
                    block = BlockFormat::paragraph();
                }
                Tag::Heading { level, .. } => {
                    flush(&mut lines, &block, &mut segments);
                    if !lines.is_empty() {
                        lines.push(Line::from(""));
                    }
                    block = BlockFormat::heading(level);
                }
                Tag::BlockQuote(_) => {
                    flush(&mut lines, &block, &mut segments);
                    block = BlockFormat::quote();
                }
                Tag::List(Some(start)) => list_stack.push(ListState::Ordered(start)),
                Tag::List(None) => list_stack.push(ListState::Bullet),
                Tag::Item => {
                    flush(&mut lines, &block, &mut segments);
                    let depth = list_stack.len().saturating_sub(1);
                    let marker = match list_stack.last_mut() {
                        Some(ListState::Ordered(next)) => {
                            let current = *next;
                            *next = next.saturating_add(1);
                            format!("{}. ", current)
                        }
                        _ => "• ".to_string(),
                    };
                    block = BlockFormat::list_item(marker, depth);
                }
                Tag::Emphasis => inline.italic += 1,
                Tag::Strong => inline.bold += 1,
                Tag::Link { .. } => inline.link += 1,
                Tag::CodeBlock(kind) => {
                    flush(&mut lines, &block, &mut segments);
                    in_code_block = true;
                    block = BlockFormat::code_block();
                    if let CodeBlockKind::Fenced(lang) = kind {
                        let lang = lang.trim();
                        if !lang.is_empty() {
                            segments.push(Segment {
                                text: format!("[{}]", lang),
                                style: Style::default().fg(Theme::GREY_400),
                            });
                            flush(&mut lines, &block, &mut segments);
                        }
                    }
                }
                _ => {}
            },
            Event::End(tag) => match tag {
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::BlockQuote(_) => {
                    flush(&mut lines, &block, &mut segments);
                    block = BlockFormat::paragraph();
                }
                TagEnd::List(_) => {
                    flush(&mut lines, &block, &mut segments);
                    list_stack.pop();
                    block = BlockFormat::paragraph();
                }
                TagEnd::Emphasis => inline.italic = inline.italic.saturating_sub(1),
                TagEnd::Strong => inline.bold = inline.bold.saturating_sub(1),
                TagEnd::Link => inline.link = inline.link.saturating_sub(1),
                TagEnd::CodeBlock => {
                    flush(&mut lines, &block, &mut segments);
                    in_code_block = false;
                    block = BlockFormat::paragraph();
                }
                _ => {}
            },
            Event::Text(content) => {
                let style = if in_code_block {
                    block.base_style
                } else {
                    inline.style(block.base_style)
                };
                segments.push(Segment {
                    text: content.into_string(),
                    style,
                });
            }
            Event::Code(content) => {
                segments.push(Segment {
                    text: content.into_string(),
                    style: Style::default()
                        .fg(Theme::GREY_200)
                        .add_modifier(Modifier::BOLD),
                });
            }
            Event::SoftBreak => segments.push(Segment {
                text: " ".to_string(),
                style: block.base_style,
            }),
            Event::HardBreak => segments.push(Segment {
                text: "\n".to_string(),
                style: block.base_style,
            }),
            Event::Rule => {
                flush(&mut lines, &block, &mut segments);
                let rule_len = max_width.clamp(8, 64);
                lines.push(Line::from(Span::styled(
                    "─".repeat(rule_len),
                    Style::default().fg(Theme::GREY_500),
                )));
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                segments.push(Segment {
                    text: marker.to_string(),
                    style: Style::default().fg(Theme::GREY_400),
                });
            }
            _ => {}
        }
    }

    flush(&mut lines, &block, &mut segments);
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines
}

/// Wrap a block's segments into prefixed, width-limited lines. Words are
/// kept whole where possible; a word wider than the limit is split by
/// display width.
fn wrap_segments(segments: &[Segment], format: &BlockFormat, max_width: usize) -> Vec<Line<'static>> {
    enum Token {
        Word(String, Style),
        Break,
    }

    let mut tokens = Vec::new();
    for seg in segments {
        for (i, part) in seg.text.split('\n').enumerate() {
            if i > 0 {
                tokens.push(Token::Break);
            }
            for word in part.split_whitespace() {
                tokens.push(Token::Word(word.to_string(), seg.style));
            }
        }
    }

    if tokens.is_empty() {
        return vec![Line::from("")];
    }

    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut width = 0usize;
    let mut first_line = true;

    let limit_for = |first: bool| -> usize {
        let prefix = if first {
            &format.first_prefix
        } else {
            &format.cont_prefix
        };
        max_width.saturating_sub(prefix.width()).max(1)
    };

    let start_line = |spans: &mut Vec<Span<'static>>, first: bool| {
        let prefix = if first {
            &format.first_prefix
        } else {
            &format.cont_prefix
        };
        if !prefix.is_empty() {
            spans.push(Span::styled(prefix.clone(), format.prefix_style));
        }
    };

    start_line(&mut spans, true);

    macro_rules! newline {
        () => {{
            lines.push(Line::from(std::mem::take(&mut spans)));
            first_line = false;
            width = 0;
            start_line(&mut spans, false);
        }};
    }

    for token in tokens {
        match token {
            Token::Break => newline!(),
            Token::Word(word, style) => {
                let limit = limit_for(first_line);
                let word_width = word.width();

                if width > 0 && width + 1 + word_width > limit {
                    newline!();
                }
                if width > 0 {
                    spans.push(Span::raw(" "));
                    width += 1;
                }

                if word_width <= limit_for(first_line) {
                    width += word_width;
                    spans.push(Span::styled(word, style));
                    continue;
                }

                // Overlong word: split by display width.
                let mut chunk = String::new();
                let mut chunk_width = 0usize;
                for ch in word.chars() {
                    let ch_width = ch.width().unwrap_or(1);
                    let limit = limit_for(first_line);
                    if width + chunk_width + ch_width > limit && !chunk.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut chunk), style));
                        chunk_width = 0;
                        newline!();
                    }
                    chunk.push(ch);
                    chunk_width += ch_width;
                }
                if !chunk.is_empty() {
                    width += chunk_width;
                    spans.push(Span::styled(chunk, style));
                }
            }
        }
    }

    lines.push(Line::from(spans));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_template_headings_render() {
        let lines = parse_markdown("### Problem\n\nSomething is slow.", 80);
        let text = flatten(&lines);
        assert!(text.contains("Problem"));
        assert!(text.contains("Something is slow."));
    }

    #[test]
    fn test_lists_get_markers() {
        let lines = parse_markdown("- first\n- second", 80);
        let text = flatten(&lines);
        assert!(text.contains("• first"));
        assert!(text.contains("• second"));
    }

    #[test]
    fn test_ordered_list_counts() {
        let lines = parse_markdown("1. one\n2. two", 80);
        let text = flatten(&lines);
        assert!(text.contains("1. one"));
        assert!(text.contains("2. two"));
    }

    #[test]
    fn test_code_block_text_is_kept() {
        let lines = parse_markdown("```rust\nlet x = 1;\n```", 80);
        let text = flatten(&lines);
        assert!(text.contains("[rust]"));
        assert!(text.contains("let x = 1;"));
    }

    #[test]
    fn test_wrapping_respects_width() {
        let lines = parse_markdown("word ".repeat(30).trim(), 20);
        assert!(lines.len() > 1);
        for line in &lines {
            let w: usize = line.spans.iter().map(|s| s.content.width()).sum();
            assert!(w <= 20);
        }
    }

    #[test]
    fn test_empty_input_yields_one_blank_line() {
        let lines = parse_markdown("", 40);
        assert_eq!(lines.len(), 1);
    }
}
