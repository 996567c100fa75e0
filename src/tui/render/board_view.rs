use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use regex::Regex;

use crate::board::card::CardNode;
use crate::board::view::ColumnNode;
use crate::ops::progress::Progress;
use crate::tui::app::{App, HitTarget};
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, single_line, truncate_to_width};

use super::push_highlighted_spans;

/// Render the four columns and record their hit regions
pub fn render_board(frame: &mut Frame, app: &mut App, area: Rect) {
    app.hit_map.clear();
    let mut area = area;

    if app.board.view().no_results_visible && area.height > 1 {
        let banner = Rect { height: 1, ..area };
        let bg = app.theme.background;
        frame.render_widget(
            Paragraph::new(Span::styled(
                " No results found",
                Style::default()
                    .fg(app.theme.yellow)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(bg)),
            banner,
        );
        area.y += 1;
        area.height -= 1;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let search_re = app.active_search_re();
    let mut hits = Vec::new();
    for (i, column) in app.board.view().columns().iter().enumerate() {
        let rect = columns[i];
        hits.push((rect, HitTarget::Column(column.id)));
        let ctx = ColumnCtx {
            focused: app.focused_column == i,
            cursor: app.card_cursor[i],
            dragging: app.board.dragging(),
            search_re: search_re.as_ref(),
            theme: &app.theme,
        };
        render_column(frame, column, rect, &ctx, &mut hits);
    }
    app.hit_map = hits;
}

struct ColumnCtx<'a> {
    focused: bool,
    cursor: usize,
    dragging: Option<&'a str>,
    search_re: Option<&'a Regex>,
    theme: &'a Theme,
}

fn render_column(
    frame: &mut Frame,
    column: &ColumnNode,
    rect: Rect,
    ctx: &ColumnCtx,
    hits: &mut Vec<(Rect, HitTarget)>,
) {
    let theme = ctx.theme;
    let bg = theme.background;
    let status = column.id.status();

    let border_color = if column.drag_over {
        theme.drag_over
    } else if ctx.focused {
        theme.highlight
    } else {
        theme.dim
    };

    let count = column.visible_cards().count();
    let mut title = vec![Span::styled(
        format!(" {} {} ", status.label(), count),
        Style::default()
            .fg(theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    if column.header_hint_visible {
        title.push(Span::styled("empty ", Style::default().fg(theme.dim).bg(bg)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if column.drag_over {
            BorderType::Double
        } else {
            BorderType::Plain
        })
        .border_style(Style::default().fg(border_color).bg(bg))
        .title(Line::from(title))
        .style(Style::default().bg(bg));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    if let Some(placeholder) = column.placeholder() {
        let para = Paragraph::new(Line::from(Span::styled(
            format!(" {}", placeholder.message),
            Style::default()
                .fg(theme.dim)
                .bg(bg)
                .add_modifier(Modifier::ITALIC),
        )));
        frame.render_widget(para, inner);
        return;
    }

    let cards: Vec<&CardNode> = column.visible_cards().collect();
    if cards.is_empty() || inner.height == 0 {
        return;
    }

    let width = inner.width.saturating_sub(2) as usize;
    let heights: Vec<u16> = cards.iter().map(|c| card_height(c)).collect();

    // Scroll so the cursor card is on screen
    let cursor = ctx.cursor.min(cards.len() - 1);
    let mut start = 0;
    while start < cursor && heights[start..=cursor].iter().sum::<u16>() > inner.height {
        start += 1;
    }

    let mut y = inner.y;
    for (i, card) in cards.iter().enumerate().skip(start) {
        let remaining = inner.y + inner.height - y;
        if remaining < 3 {
            break;
        }
        let h = heights[i].min(remaining);
        let card_rect = Rect {
            x: inner.x,
            y,
            width: inner.width,
            height: h,
        };
        let selected = ctx.focused && i == cursor;
        let carried = ctx.dragging == Some(card.element_id.as_str());
        render_card(frame, card, card_rect, width, selected, carried, ctx);
        hits.push((card_rect, HitTarget::Card(card.element_id.clone())));
        y += h;
    }
}

/// Rows a card needs, borders included
fn card_height(card: &CardNode) -> u16 {
    let mut rows = 3; // category, title, description
    if card.progress.is_some() {
        rows += 1;
    }
    if !card.avatars.is_empty() {
        rows += 1;
    }
    rows + 2
}

fn render_card(
    frame: &mut Frame,
    card: &CardNode,
    rect: Rect,
    width: usize,
    selected: bool,
    carried: bool,
    ctx: &ColumnCtx,
) {
    let theme = ctx.theme;
    let bg = if selected { theme.card_border } else { theme.background };
    let border = if carried {
        theme.yellow
    } else if selected {
        theme.highlight
    } else {
        theme.card_border
    };

    let highlight = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);
    let mut lines: Vec<Line> = Vec::new();

    // Category chip and priority
    let chip = format!("{} {}", card.category_icon.glyph, card.category_label);
    let prio = format!("{} {}", card.priority_icon.glyph, card.priority.as_str());
    let chip = truncate_to_width(&chip, width.saturating_sub(display_width(&prio) + 1));
    let pad = width.saturating_sub(display_width(&chip) + display_width(&prio));
    lines.push(Line::from(vec![
        Span::styled(chip, Style::default().fg(theme.cyan).bg(bg)),
        Span::styled(" ".repeat(pad), Style::default().bg(bg)),
        Span::styled(
            prio,
            Style::default().fg(theme.priority_color(card.priority)).bg(bg),
        ),
    ]));

    // Title
    let mut spans = Vec::new();
    push_highlighted_spans(
        &mut spans,
        &truncate_to_width(&card.title, width),
        Style::default()
            .fg(theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
        highlight,
        ctx.search_re,
    );
    lines.push(Line::from(spans));

    // Description preview
    let mut spans = Vec::new();
    push_highlighted_spans(
        &mut spans,
        &truncate_to_width(&single_line(&card.description), width),
        Style::default().fg(theme.text).bg(bg),
        highlight,
        ctx.search_re,
    );
    lines.push(Line::from(spans));

    if let Some(progress) = &card.progress {
        lines.push(progress_line(progress, width, theme, bg));
    }

    if !card.avatars.is_empty() {
        let mut spans = Vec::new();
        for avatar in &card.avatars {
            spans.push(Span::styled(
                format!(" {} ", avatar.initials),
                Style::default()
                    .fg(theme.background)
                    .bg(theme.user_color(&avatar.color_class))
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(" ", Style::default().bg(bg)));
        }
        lines.push(Line::from(spans));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

/// `████░░░░ 1/2`
fn progress_line(progress: &Progress, width: usize, theme: &Theme, bg: ratatui::style::Color) -> Line<'static> {
    let label = format!(" {}/{}", progress.done, progress.total);
    let bar_width = width.saturating_sub(label.len());
    let filled = ((progress.percent / 100.0) * bar_width as f64).round() as usize;
    let filled = filled.min(bar_width);
    Line::from(vec![
        Span::styled(
            "█".repeat(filled),
            Style::default().fg(theme.progress_fill).bg(bg),
        ),
        Span::styled(
            "░".repeat(bar_width - filled),
            Style::default().fg(theme.progress_empty).bg(bg),
        ),
        Span::styled(label, Style::default().fg(theme.dim).bg(bg)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{
        SAMPLE_TASKS, app_with_tasks, draw_to_string,
    };

    #[test]
    fn columns_show_titles_and_placeholders() {
        let mut app = app_with_tasks(r#"{"1": {"title": "Only task", "description": "d", "status": "todo"}}"#);
        let out = draw_to_string(&mut app, 120, 20);
        assert!(out.contains("To do 1"));
        assert!(out.contains("Only task"));
        assert!(out.contains("No tasks In progress"));
        assert!(out.contains("No tasks Await feedback"));
        assert!(out.contains("No tasks Done"));
    }

    #[test]
    fn card_shows_progress_and_avatar() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        let out = draw_to_string(&mut app, 120, 30);
        assert!(out.contains("1/2"), "{out}");
        assert!(out.contains(" AB "), "{out}");
        assert!(out.contains("User Story"));
        assert!(out.contains("⇈ Urgent"));
    }

    #[test]
    fn no_results_banner() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        app.board.set_filter("xyz-no-match");
        let out = draw_to_string(&mut app, 120, 30);
        assert!(out.contains("No results found"));
        assert!(!out.contains("Login form"));
    }

    #[test]
    fn hit_map_covers_columns_and_cards() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        draw_to_string(&mut app, 120, 30);
        let columns = app
            .hit_map
            .iter()
            .filter(|(_, t)| matches!(t, HitTarget::Column(_)))
            .count();
        let cards = app
            .hit_map
            .iter()
            .filter(|(_, t)| matches!(t, HitTarget::Card(_)))
            .count();
        assert_eq!(columns, 4);
        assert_eq!(cards, 4);
    }

    #[test]
    fn progress_bar_fill() {
        let theme = Theme::default();
        let p = Progress {
            done: 1,
            total: 2,
            percent: 50.0,
        };
        let line = progress_line(&p, 14, &theme, theme.background);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "█████░░░░░ 1/2");
    }
}
