use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::board::card::{category_icon, priority_icon};
use crate::ops::progress::progress;
use crate::tui::app::App;

use super::centered_rect;

/// Task detail popup with the subtask checklist
pub fn render_detail_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };
    let Some(task) = app.board.task(&detail.task_id) else {
        return;
    };

    let popup = centered_rect(70, 80, area);
    frame.render_widget(Clear, popup);

    let theme = &app.theme;
    let bg = theme.background;
    let label = Style::default().fg(theme.dim).bg(bg);
    let value = Style::default().fg(theme.text).bg(bg);
    let bright = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!(
            "{} {}",
            category_icon(&task.category).glyph,
            task.category.label()
        ),
        Style::default().fg(theme.cyan).bg(bg),
    )));
    lines.push(Line::from(Span::styled(task.title.clone(), bright)));
    lines.push(Line::from(""));
    for text in task.description.lines() {
        lines.push(Line::from(Span::styled(text.to_string(), value)));
    }
    lines.push(Line::from(""));

    let due = match (task.due(), task.due_date.as_deref()) {
        (Some(date), _) => date.format("%d/%m/%Y").to_string(),
        (None, Some(raw)) if !raw.trim().is_empty() => raw.to_string(),
        _ => "none".to_string(),
    };
    lines.push(Line::from(vec![
        Span::styled("Due date:  ", label),
        Span::styled(due, value),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Priority:  ", label),
        Span::styled(
            format!("{} {}", task.priority().as_str(), priority_icon(task.priority().as_str()).glyph),
            Style::default().fg(theme.priority_color(task.priority())).bg(bg),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Status:    ", label),
        Span::styled(task.status.label(), value),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Assigned To:", label)));
    let assignees = task.unique_assignees();
    if assignees.is_empty() {
        lines.push(Line::from(Span::styled("  nobody", label)));
    }
    for name in assignees {
        let avatar = app.board.users().avatar(name);
        lines.push(Line::from(vec![
            Span::styled("  ", value),
            Span::styled(
                format!(" {} ", avatar.initials),
                Style::default()
                    .fg(bg)
                    .bg(theme.user_color(&avatar.color_class))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", avatar.name), value),
        ]));
    }

    lines.push(Line::from(""));
    let p = progress(task);
    lines.push(Line::from(Span::styled(
        format!("Subtasks {}/{}", p.done, p.total),
        label,
    )));
    if task.subtasks.is_empty() {
        lines.push(Line::from(Span::styled("  none", label)));
    }
    for (i, text) in task.subtasks.iter().enumerate() {
        let done = task.subtask_done.get(i).copied().unwrap_or(false);
        let mark = if done { "[x]" } else { "[ ]" };
        let style = if i == detail.cursor {
            Style::default()
                .fg(theme.text_bright)
                .bg(theme.card_border)
                .add_modifier(Modifier::BOLD)
        } else if done {
            Style::default().fg(theme.dim).bg(bg)
        } else {
            value
        };
        lines.push(Line::from(Span::styled(format!("  {} {}", mark, text), style)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .title(Span::styled(format!(" task {} ", task.id), bright))
        .style(Style::default().bg(bg));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}
