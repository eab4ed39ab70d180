//! Frame rendering for all UI states.

pub mod markdown;
pub mod theme;

use crate::app::{App, Focus, UiState};
use crate::render::style::tag_tone;
use crate::suggest::Suggestion;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use theme::Theme;

pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    f.render_widget(Block::default().style(Theme::bg()), area);

    let mut constraints = vec![Constraint::Length(3)];
    if app.show_settings {
        constraints.push(Constraint::Length(4));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::vertical(constraints).split(area);
    let mut next = 0;

    render_repo_input(f, app, chunks[next]);
    next += 1;

    if app.show_settings {
        render_settings(f, app, chunks[next]);
        next += 1;
    }

    render_body(f, app, chunks[next]);
    render_footer(f, app, chunks[next + 1]);
}

fn input_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(format!(" {} ", title), Theme::text_muted()))
}

fn render_repo_input(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::RepoUrl;
    let mut content = app.repo_input.clone();
    if focused {
        content.push('▏');
    }
    let input = Paragraph::new(Span::styled(content, Theme::text()))
        .block(input_block("Repository URL", focused));
    f.render_widget(input, area);
}

fn render_settings(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Goal;
    let mut goal = app.goal_input.clone();
    if focused {
        goal.push('▏');
    }

    let toggle = if app.settings.scan_todos {
        "[x] Scan TODO/FIXME comments  (Ctrl+T)"
    } else {
        "[ ] Scan TODO/FIXME comments  (Ctrl+T)"
    };

    let lines = vec![
        Line::from(Span::styled(goal, Theme::text())),
        Line::from(Span::styled(toggle, Theme::text_muted())),
    ];
    let pane = Paragraph::new(lines).block(input_block("Goal (optional)", focused));
    f.render_widget(pane, area);
}

fn render_body(f: &mut Frame, app: &mut App, area: Rect) {
    match app.state.clone() {
        UiState::Welcome => render_welcome(f, area),
        UiState::Loading => render_loading(f, app, area),
        UiState::Empty => render_empty(f, area),
        UiState::Error(message) => render_error(f, app, &message, area),
        UiState::Results => render_results(f, app, area),
    }
}

fn render_welcome(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("bountyscout", Theme::title())),
        Line::from(""),
        Line::from(Span::styled(
            "Point it at a public GitHub repository and get back a set of",
            Theme::text_muted(),
        )),
        Line::from(Span::styled(
            "improvement suggestions, each one ready to file as an issue.",
            Theme::text_muted(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter a repository URL above and press Enter to analyze.",
            Theme::text(),
        )),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_loading(f: &mut Frame, app: &mut App, area: Rect) {
    let frame = app.spinner.tick();
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!(" {} ", frame), Style::default().fg(Theme::ACCENT)),
            Span::styled("Analyzing repository...", Theme::text()),
        ]),
        Line::from(Span::styled(
            "   This usually takes a few seconds.",
            Theme::text_dim(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "The AI couldn't find any specific suggestions for this repository.",
            Theme::text_muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_error(f: &mut Frame, app: &App, message: &str, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Error: ", Theme::error()),
            Span::styled(message.to_string(), Theme::text()),
        ]),
    ];
    if let Some(detail) = &app.last_error_detail {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            detail.clone(),
            Theme::text_dim(),
        )));
    }
    let banner = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::RED)),
        );
    f.render_widget(banner, area);
}

fn render_results(f: &mut Frame, app: &mut App, area: Rect) {
    let list_height = (app.suggestions.len() as u16).min(6) + 3;
    let chunks =
        Layout::vertical([Constraint::Length(list_height), Constraint::Min(0)]).split(area);

    render_card_list(f, app, chunks[0]);
    render_card_detail(f, app, chunks[1]);
}

fn render_card_list(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(vec![
        Span::styled("Suggestions for ", Theme::text()),
        Span::styled(
            app.repo_slug.clone(),
            Style::default().fg(Theme::ACCENT).add_modifier(Modifier::BOLD),
        ),
    ])];

    for (i, suggestion) in app.suggestions.iter().enumerate() {
        let record = suggestion.with_todo_tag();
        let selected = i == app.selected;
        let marker = if selected { "▸ " } else { "  " };

        let title_style = if selected {
            Theme::title()
        } else {
            Theme::text()
        };

        let mut spans = vec![
            Span::styled(marker, Theme::text_dim()),
            Span::styled(
                format!("{} ", record.kind.glyph()),
                Style::default().fg(Theme::kind_color(record.kind)),
            ),
            Span::styled(record.title.clone(), title_style),
        ];
        for tag in &record.tags {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                tag.clone(),
                Style::default().fg(Theme::tag_color(tag_tone(tag))),
            ));
        }
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_card_detail(f: &mut Frame, app: &App, area: Rect) {
    let Some(suggestion) = app.selected_suggestion() else {
        return;
    };
    let record: Suggestion = suggestion.with_todo_tag();
    let focused = app.focus == Focus::Results;

    let block = input_block(&record.title, focused);
    let inner_width = area.width.saturating_sub(2).max(10) as usize;

    let mut lines: Vec<Line> = vec![tag_line(&record)];
    lines.push(Line::from(""));
    lines.extend(markdown::parse_markdown(&record.description, inner_width));

    let detail = Paragraph::new(lines)
        .block(block)
        .scroll((app.detail_scroll, 0));
    f.render_widget(detail, area);
}

fn tag_line(record: &Suggestion) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{} {}  ", record.kind.glyph(), record.kind.label()),
        Style::default().fg(Theme::kind_color(record.kind)),
    )];
    for tag in &record.tags {
        spans.push(Span::styled(
            format!("⟨{}⟩ ", tag),
            Style::default().fg(Theme::tag_color(tag_tone(tag))),
        ));
    }
    Line::from(spans)
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints = match (&app.state, app.focus) {
        (UiState::Results, Focus::Results) => {
            "↑↓ select · Enter create issue · o open report · PgUp/PgDn scroll · Tab form · Esc quit"
        }
        (UiState::Loading, _) => "Analyzing... · Esc quit",
        _ => "Enter analyze · Tab focus · Ctrl+S settings · Ctrl+T toggle TODO scan · Esc quit",
    };
    f.render_widget(
        Paragraph::new(Span::styled(hints, Theme::text_dim())),
        area,
    );
}
