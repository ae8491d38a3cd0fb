use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};

use crate::models::ScheduleRecord;
use crate::tui::app::{App, ListScope};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils;

/// Side-panel schedule list: the selected day's entries, or every entry
/// sorted by date. Completed entries render struck through.
pub fn render_schedule_panel(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let dim = parse_color(&theme.dim_fg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let title = match app.ui.list_scope {
        ListScope::Day => format!("Schedule {}", utils::format_day_ja(app.ui.selected_date)),
        ListScope::All => "All schedule (by date)".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(fg).bg(bg));

    let records = app.schedule_list_records();
    if records.is_empty() {
        let empty = ratatui::widgets::Paragraph::new("No schedule entries.")
            .block(block)
            .style(Style::default().fg(dim));
        f.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = records
        .iter()
        .map(|record| list_item(record, width, fg, dim))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));
    f.render_stateful_widget(list, area, &mut app.ui.list_state);
}

fn list_item(
    record: &ScheduleRecord,
    width: usize,
    fg: ratatui::style::Color,
    dim: ratatui::style::Color,
) -> ListItem<'static> {
    let mut title_style = Style::default().fg(fg).add_modifier(Modifier::BOLD);
    if record.is_completed {
        title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
    }

    let marker = if record.is_completed { "[x] " } else { "[ ] " };
    let detail = format!(
        "    {} {}  {} / {}",
        record.date, record.time, record.category, record.platform
    );

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(marker.to_string(), Style::default().fg(dim)),
            Span::styled(truncate(&record.title, width.saturating_sub(4)), title_style),
        ]),
        Line::from(Span::styled(truncate(&detail, width), Style::default().fg(dim))),
    ])
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        text.chars().take(width.saturating_sub(1)).collect::<String>() + "…"
    }
}
