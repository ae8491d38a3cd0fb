use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::export::CardTemplate;
use crate::template::display_time;
use crate::tui::app::App;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils;

/// Image tab: card template picker, record picker and a text preview of the
/// card contents.
pub fn render_export_panel(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let dim = parse_color(&theme.dim_fg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Template picker
            Constraint::Min(4),    // Record list
            Constraint::Length(7), // Preview
        ])
        .split(area);

    // Template picker: both names, current one highlighted
    let mut picker_spans = Vec::new();
    for (i, template) in [CardTemplate::Minimal, CardTemplate::Gamers].iter().enumerate() {
        if i > 0 {
            picker_spans.push(Span::raw("  "));
        }
        let style = if *template == app.export.card {
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(dim)
        };
        picker_spans.push(Span::styled(format!(" {} ", template.as_str()), style));
    }
    let picker = Paragraph::new(Line::from(picker_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Card template")
            .style(Style::default().fg(fg).bg(bg)),
    );
    f.render_widget(picker, sections[0]);

    // Record picker
    let records = app.all_sorted();
    let list_block = Block::default()
        .borders(Borders::ALL)
        .title("Pick a schedule")
        .style(Style::default().fg(fg).bg(bg));
    if records.is_empty() {
        let empty = Paragraph::new("No schedule entries.")
            .block(list_block)
            .style(Style::default().fg(dim));
        f.render_widget(empty, sections[1]);
    } else {
        let width = sections[1].width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = records
            .iter()
            .map(|record| {
                let date = record
                    .date_value()
                    .map(|d| d.format("%m/%d").to_string())
                    .unwrap_or_else(|| record.date.clone());
                let text = format!("{}  {}", date, record.title);
                ListItem::new(Line::from(Span::styled(
                    truncate(&text, width),
                    Style::default().fg(fg),
                )))
            })
            .collect();
        let list = List::new(items)
            .block(list_block)
            .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));
        f.render_stateful_widget(list, sections[1], &mut app.export.list_state);
    }

    // Preview of the picked record
    let preview_block = Block::default()
        .borders(Borders::ALL)
        .title("Preview")
        .style(Style::default().fg(fg).bg(bg));
    let lines = match records.get(app.export.list_index) {
        Some(record) => {
            let date = record
                .date_value()
                .map(utils::format_full_date_ja)
                .unwrap_or_else(|| record.date.clone());
            vec![
                Line::from(Span::styled(
                    record.title.clone(),
                    Style::default().fg(fg).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(date, Style::default().fg(fg))),
                Line::from(Span::styled(
                    format!("{}  {}", record.category, display_time(&record.time)),
                    Style::default().fg(dim),
                )),
                Line::from(Span::styled(record.platform.clone(), Style::default().fg(dim))),
                Line::from(Span::styled(
                    "1280x720 PNG / JPEG",
                    Style::default().fg(dim),
                )),
            ]
        }
        None => vec![Line::from(Span::styled(
            "Pick a template and a schedule.",
            Style::default().fg(dim),
        ))],
    };
    f.render_widget(Paragraph::new(lines).block(preview_block), sections[2]);
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        text.chars().take(width.saturating_sub(1)).collect::<String>() + "…"
    }
}
