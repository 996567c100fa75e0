use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::centered_rect;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Board", header_style)));
    add_binding(&mut lines, " \u{2190}\u{2192}/hl", "Focus column", key_style, desc_style);
    add_binding(&mut lines, " \u{2191}\u{2193}/jk", "Move cursor", key_style, desc_style);
    add_binding(&mut lines, " g/G", "First/last card", key_style, desc_style);
    add_binding(&mut lines, " Enter / click", "Open task", key_style, desc_style);
    add_binding(&mut lines, " /", "Search (Esc clears)", key_style, desc_style);
    add_binding(&mut lines, " r", "Reload from backend", key_style, desc_style);
    add_binding(&mut lines, " x", "Delete task", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Moving", header_style)));
    add_binding(&mut lines, " m/Space", "Grab card", key_style, desc_style);
    add_binding(&mut lines, "   \u{2190}\u{2192} Enter", "Pick column, drop", key_style, desc_style);
    add_binding(&mut lines, " >/<", "Move one column", key_style, desc_style);
    add_binding(&mut lines, " drag", "Drop card on any column", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Task", header_style)));
    add_binding(&mut lines, " \u{2191}\u{2193}/jk", "Select subtask", key_style, desc_style);
    add_binding(&mut lines, " Space", "Toggle subtask", key_style, desc_style);
    add_binding(&mut lines, " Esc", "Close", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}
