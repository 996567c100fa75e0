use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint): (Vec<Span>, &str) = match app.mode {
        Mode::Search => (
            vec![
                Span::styled(
                    format!("/{}", app.search_input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
            ],
            "Enter keep  Esc cancel",
        ),
        Mode::Grab => {
            let card = app.board.dragging().unwrap_or("");
            let target = app
                .board
                .drag_target()
                .map(|c| c.status().label())
                .unwrap_or("?");
            (
                vec![Span::styled(
                    format!("Moving {} \u{2192} {}", card, target),
                    Style::default().fg(app.theme.yellow).bg(bg),
                )],
                "\u{2190}\u{2192} column  Enter drop  Esc cancel",
            )
        }
        Mode::ConfirmDelete => (
            vec![Span::styled(
                app.status_message
                    .as_ref()
                    .map(|m| m.text.clone())
                    .unwrap_or_default(),
                Style::default().fg(app.theme.red).bg(bg),
            )],
            "",
        ),
        Mode::Detail => (message_spans(app), "Space toggle  >/< move  Esc close"),
        Mode::Navigate => {
            let mut spans = message_spans(app);
            if spans.is_empty() && !app.board.filter().is_empty() {
                spans.push(Span::styled(
                    format!("/{}", app.board.filter()),
                    Style::default().fg(app.theme.dim).bg(bg),
                ));
            }
            (spans, "? help")
        }
    };

    let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let hint_width = hint.chars().count();
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn message_spans(app: &App) -> Vec<Span<'static>> {
    let bg = app.theme.background;
    match &app.status_message {
        Some(msg) => {
            let fg = if msg.is_error {
                app.theme.red
            } else {
                app.theme.text
            };
            vec![Span::styled(msg.text.clone(), Style::default().fg(fg).bg(bg))]
        }
        None => Vec::new(),
    }
}
