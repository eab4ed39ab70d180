//! Markdown to sanitized HTML for the card report.
//!
//! The pipeline is convert, then sanitize: model-authored text never
//! reaches the document without passing through the sanitizer. Fenced code
//! is highlighted best-effort; a highlighting failure falls back to the
//! escaped code text, never dropping it.

use crate::render::escape_html;
use pulldown_cmark::{html, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;
use std::sync::OnceLock;
use syntect::html::{ClassedHTMLGenerator, ClassStyle};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Render a markdown description to HTML safe for insertion into the
/// report document.
pub fn markdown_to_html(text: &str) -> String {
    // GitHub-flavored syntax; single newlines stay soft breaks.
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let events: Vec<Event> = Parser::new_ext(text, options).collect();
    let events = rewrite_events(events);

    let mut raw = String::new();
    html::push_html(&mut raw, events.into_iter());

    sanitize(&raw)
}

/// Strip everything outside the safe profile. The highlighter's span
/// classes and the generated heading ids are the only additions to
/// ammonia's defaults; script and event-handler content never survives.
pub fn sanitize(fragment: &str) -> String {
    ammonia::Builder::default()
        .add_tag_attributes("span", &["class"])
        .add_tag_attributes("code", &["class"])
        .add_tag_attributes("pre", &["class"])
        .add_tag_attributes("h1", &["id"])
        .add_tag_attributes("h2", &["id"])
        .add_tag_attributes("h3", &["id"])
        .add_tag_attributes("h4", &["id"])
        .add_tag_attributes("h5", &["id"])
        .add_tag_attributes("h6", &["id"])
        .clean(fragment)
        .to_string()
}

/// Replace heading tags with id-carrying ones and fenced code blocks with
/// highlighted HTML.
fn rewrite_events(events: Vec<Event<'_>>) -> Vec<Event<'static>> {
    let mut out: Vec<Event<'static>> = Vec::with_capacity(events.len());
    let mut used_slugs: HashMap<String, usize> = HashMap::new();
    let mut iter = events.into_iter().peekable();

    while let Some(event) = iter.next() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                // Collect the heading's inner events so the id can be
                // derived from its text before anything is emitted.
                let mut inner: Vec<Event> = Vec::new();
                for e in iter.by_ref() {
                    if matches!(e, Event::End(TagEnd::Heading(_))) {
                        break;
                    }
                    inner.push(e);
                }
                let slug = unique_slug(&heading_text(&inner), &mut used_slugs);
                let tag = heading_tag(level);
                out.push(Event::Html(format!("<{} id=\"{}\">", tag, slug).into()));
                out.extend(inner.into_iter().map(into_owned));
                out.push(Event::Html(format!("</{}>", tag).into()));
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) => lang.trim().to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                let mut code = String::new();
                for e in iter.by_ref() {
                    match e {
                        Event::End(TagEnd::CodeBlock) => break,
                        Event::Text(t) => code.push_str(&t),
                        _ => {}
                    }
                }
                out.push(Event::Html(highlight_block(&code, &lang).into()));
            }
            other => out.push(into_owned(other)),
        }
    }

    out
}

fn into_owned(event: Event<'_>) -> Event<'static> {
    // CowStr payloads borrow from the source text; the rewritten stream
    // has to outlive it.
    match event {
        Event::Text(t) => Event::Text(t.into_string().into()),
        Event::Code(t) => Event::Code(t.into_string().into()),
        Event::Html(t) => Event::Html(t.into_string().into()),
        Event::InlineHtml(t) => Event::InlineHtml(t.into_string().into()),
        Event::FootnoteReference(t) => Event::FootnoteReference(t.into_string().into()),
        Event::SoftBreak => Event::SoftBreak,
        Event::HardBreak => Event::HardBreak,
        Event::Rule => Event::Rule,
        Event::TaskListMarker(done) => Event::TaskListMarker(done),
        Event::Start(tag) => Event::Start(owned_tag(tag)),
        Event::End(tag) => Event::End(tag),
        Event::InlineMath(t) => Event::InlineMath(t.into_string().into()),
        Event::DisplayMath(t) => Event::DisplayMath(t.into_string().into()),
    }
}

fn owned_tag(tag: Tag<'_>) -> Tag<'static> {
    match tag {
        Tag::Paragraph => Tag::Paragraph,
        Tag::Heading {
            level,
            id,
            classes,
            attrs,
        } => Tag::Heading {
            level,
            id: id.map(|s| s.into_string().into()),
            classes: classes
                .into_iter()
                .map(|s| s.into_string().into())
                .collect(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| {
                    (
                        k.into_string().into(),
                        v.map(|s| s.into_string().into()),
                    )
                })
                .collect(),
        },
        Tag::BlockQuote(kind) => Tag::BlockQuote(kind),
        Tag::CodeBlock(CodeBlockKind::Indented) => Tag::CodeBlock(CodeBlockKind::Indented),
        Tag::CodeBlock(CodeBlockKind::Fenced(lang)) => {
            Tag::CodeBlock(CodeBlockKind::Fenced(lang.into_string().into()))
        }
        Tag::List(start) => Tag::List(start),
        Tag::Item => Tag::Item,
        Tag::FootnoteDefinition(label) => Tag::FootnoteDefinition(label.into_string().into()),
        Tag::Table(alignments) => Tag::Table(alignments),
        Tag::TableHead => Tag::TableHead,
        Tag::TableRow => Tag::TableRow,
        Tag::TableCell => Tag::TableCell,
        Tag::Emphasis => Tag::Emphasis,
        Tag::Strong => Tag::Strong,
        Tag::Strikethrough => Tag::Strikethrough,
        Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        } => Tag::Link {
            link_type,
            dest_url: dest_url.into_string().into(),
            title: title.into_string().into(),
            id: id.into_string().into(),
        },
        Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        } => Tag::Image {
            link_type,
            dest_url: dest_url.into_string().into(),
            title: title.into_string().into(),
            id: id.into_string().into(),
        },
        Tag::HtmlBlock => Tag::HtmlBlock,
        Tag::MetadataBlock(kind) => Tag::MetadataBlock(kind),
        Tag::DefinitionList => Tag::DefinitionList,
        Tag::DefinitionListTitle => Tag::DefinitionListTitle,
        Tag::DefinitionListDefinition => Tag::DefinitionListDefinition,
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

fn heading_text(inner: &[Event]) -> String {
    let mut text = String::new();
    for event in inner {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Slugify heading text the way hosting platforms do: lowercase,
/// alphanumerics kept, runs of anything else collapsed to one hyphen.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_dash = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

/// Keep heading ids stable and unique within one document: repeats get a
/// numeric suffix.
fn unique_slug(text: &str, used: &mut HashMap<String, usize>) -> String {
    let base = slugify(text);
    let count = used.entry(base.clone()).or_insert(0);
    *count += 1;
    if *count == 1 {
        base
    } else {
        format!("{}-{}", base, *count - 1)
    }
}

/// Highlight one fenced code block. Resolution order: declared language
/// hint, then first-line detection, then plain escaped code. Failure at
/// any stage falls back without altering the code text.
fn highlight_block(code: &str, lang: &str) -> String {
    let set = syntax_set();

    let syntax = if lang.is_empty() {
        None
    } else {
        set.find_syntax_by_token(lang)
    };
    let syntax = syntax.or_else(|| {
        code.lines()
            .next()
            .and_then(|first| set.find_syntax_by_first_line(first))
    });

    let body = match syntax {
        Some(syntax) => highlight_with(syntax, code).unwrap_or_else(|| escape_html(code)),
        None => escape_html(code),
    };

    let lang_token: String = lang
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '#'))
        .collect();
    if lang_token.is_empty() {
        format!("<pre><code>{}</code></pre>\n", body)
    } else {
        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            lang_token, body
        )
    }
}

fn highlight_with(syntax: &syntect::parsing::SyntaxReference, code: &str) -> Option<String> {
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set(), ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        if generator
            .parse_html_for_line_which_includes_newline(line)
            .is_err()
        {
            return None;
        }
    }
    Some(generator.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_section_template_renders_headings_with_ids() {
        let html = markdown_to_html(
            "### Problem\nSlow builds.\n\n### Proposed Solution\nCache.\n\n### Required Technologies\nNone",
        );
        assert!(html.contains("<h3 id=\"problem\">Problem</h3>"));
        assert!(html.contains("<h3 id=\"proposed-solution\">Proposed Solution</h3>"));
        assert!(html.contains("<h3 id=\"required-technologies\">Required Technologies</h3>"));
    }

    #[test]
    fn test_duplicate_headings_get_stable_suffixes() {
        let html = markdown_to_html("## Setup\n\n## Setup\n");
        assert!(html.contains("id=\"setup\""));
        assert!(html.contains("id=\"setup-1\""));
    }

    #[test]
    fn test_script_markup_is_removed() {
        let html = markdown_to_html("Hello <script>alert('pwned')</script> world");
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert('pwned')"));
    }

    #[test]
    fn test_event_handlers_are_stripped() {
        let html = markdown_to_html("<img src=\"x\" onerror=\"alert(1)\">");
        assert!(!html.contains("onerror"));
    }

    #[test]
    fn test_known_language_preserves_code_text() {
        let html = markdown_to_html("```rust\nlet answer = 42;\n```");
        assert!(html.contains("<pre><code class=\"language-rust\">"));
        // The tokens survive even though the highlighter wraps them.
        assert!(html.contains("answer"));
        assert!(html.contains("42"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_escaped_code() {
        let html = markdown_to_html("```nosuchlang\nif a < b { return; }\n```");
        assert!(html.contains("&lt;"));
        assert!(html.contains("return"));
    }

    #[test]
    fn test_code_block_script_stays_inert() {
        let html = markdown_to_html("```\n<script>alert(1)</script>\n```");
        assert!(!html.contains("<script>"));
        assert!(html.contains("alert"));
    }

    #[test]
    fn test_single_newlines_stay_soft() {
        let html = markdown_to_html("line one\nline two");
        assert!(!html.contains("<br"));
    }

    #[test]
    fn test_gfm_strikethrough_and_lists() {
        let html = markdown_to_html("- item one\n- ~~gone~~\n");
        assert!(html.contains("<ul>"));
        assert!(html.contains("<del>"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Proposed Solution"), "proposed-solution");
        assert_eq!(slugify("  !!  "), "section");
        assert_eq!(slugify("C++ & Rust"), "c-rust");
    }
}
