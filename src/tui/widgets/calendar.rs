use chrono::Datelike;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::models::ScheduleRecord;
use crate::query;
use crate::template::display_time;
use crate::tui::app::App;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils;

const WEEKDAY_HEADER: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        text.chars().take(width.saturating_sub(1)).collect::<String>() + "…"
    }
}

/// Month grid: weekday header plus Sunday-aligned week rows. Each cell shows
/// the day number and as many `time category` entry lines as fit.
pub fn render_month(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let dim = parse_color(&theme.dim_fg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);
    let accent = parse_color(&theme.highlight_bg);

    let selected = app.ui.selected_date;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(utils::format_month_ja(selected))
        .style(Style::default().fg(fg).bg(bg));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 2 || inner.width < 7 {
        return;
    }

    // Weekday header row
    let header_area = Rect::new(inner.x, inner.y, inner.width, 1);
    let header_cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(header_area);
    for (i, label) in WEEKDAY_HEADER.iter().enumerate() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            *label,
            Style::default().fg(fg).add_modifier(Modifier::BOLD),
        )))
        .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(paragraph, header_cells[i]);
    }

    let grid = query::month_grid(selected);
    let grid_area = Rect::new(
        inner.x,
        inner.y + 1,
        inner.width,
        inner.height.saturating_sub(1),
    );
    let row_constraints: Vec<Constraint> = grid
        .iter()
        .map(|_| Constraint::Ratio(1, grid.len() as u32))
        .collect();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(grid_area);

    let today = utils::today();
    for (r, week) in grid.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 7); 7])
            .split(row_areas[r]);
        for (c, &day) in week.iter().enumerate() {
            render_month_cell(f, cells[c], app, day, MonthCellStyle {
                in_month: day.month() == selected.month(),
                is_selected: day == selected,
                is_today: day == today,
                fg,
                dim,
                highlight_bg,
                highlight_fg,
                accent,
            });
        }
    }
}

struct MonthCellStyle {
    in_month: bool,
    is_selected: bool,
    is_today: bool,
    fg: ratatui::style::Color,
    dim: ratatui::style::Color,
    highlight_bg: ratatui::style::Color,
    highlight_fg: ratatui::style::Color,
    accent: ratatui::style::Color,
}

fn render_month_cell(
    f: &mut Frame,
    area: Rect,
    app: &App,
    day: chrono::NaiveDate,
    style: MonthCellStyle,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let mut day_style = if style.is_selected {
        Style::default().fg(style.highlight_fg).bg(style.highlight_bg)
    } else if style.in_month {
        Style::default().fg(style.fg)
    } else {
        Style::default().fg(style.dim)
    };
    if style.is_today {
        day_style = day_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }

    let entry_style = if style.is_selected {
        Style::default().fg(style.highlight_fg).bg(style.highlight_bg)
    } else {
        Style::default().fg(style.accent)
    };

    let width = area.width as usize;
    let mut lines = vec![Line::from(Span::styled(format!("{}", day.day()), day_style))];

    let entries = query::filter_by_day(app.store.records(), day);
    let visible = area.height.saturating_sub(1) as usize;
    for record in entries.iter().take(visible) {
        let text = format!("{} {}", record.time, record.category);
        lines.push(Line::from(Span::styled(truncate(&text, width), entry_style)));
    }
    if entries.len() > visible && visible > 0 {
        let last = lines.len() - 1;
        lines[last] = Line::from(Span::styled(
            truncate(&format!("+{} more", entries.len() - visible + 1), width),
            Style::default().fg(style.dim),
        ));
    }

    let mut paragraph = Paragraph::new(lines);
    if style.is_selected {
        paragraph = paragraph
            .style(Style::default().fg(style.highlight_fg).bg(style.highlight_bg));
    }
    f.render_widget(paragraph, area);
}

/// Week list: one slot per day of the Sunday-anchored week.
pub fn render_week(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let dim = parse_color(&theme.dim_fg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let selected = app.ui.selected_date;
    let start = query::week_start(selected);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            "{}〜{}",
            utils::format_day_ja(start),
            utils::format_day_ja(start + chrono::Days::new(6))
        ))
        .style(Style::default().fg(fg).bg(bg));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let buckets = query::filter_by_week(app.store.records(), selected);
    let day_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(inner);

    for (i, records) in buckets.iter().enumerate() {
        let day = start + chrono::Days::new(i as u64);
        let is_selected = day == selected;
        let label_style = if is_selected {
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg).add_modifier(Modifier::BOLD)
        };

        let mut lines = Vec::new();
        if records.is_empty() {
            lines.push(Line::from(vec![
                Span::styled(utils::format_day_ja(day), label_style),
                Span::raw("  "),
                Span::styled("No schedule", Style::default().fg(dim)),
            ]));
        } else {
            let width = inner.width as usize;
            let visible = day_areas[i].height.max(1) as usize;
            if visible == 1 {
                // Single line: join the day's entries
                let joined = records
                    .iter()
                    .map(|r| week_entry(r))
                    .collect::<Vec<_>>()
                    .join(" / ");
                lines.push(Line::from(vec![
                    Span::styled(utils::format_day_ja(day), label_style),
                    Span::raw("  "),
                    Span::styled(truncate(&joined, width), Style::default().fg(fg)),
                ]));
            } else {
                lines.push(Line::from(Span::styled(utils::format_day_ja(day), label_style)));
                for record in records.iter().take(visible - 1) {
                    lines.push(Line::from(Span::styled(
                        truncate(&format!("  {}", week_entry(record)), width),
                        entry_line_style(record, fg),
                    )));
                }
            }
        }
        f.render_widget(Paragraph::new(lines), day_areas[i]);
    }
}

fn week_entry(record: &ScheduleRecord) -> String {
    format!("{} {} {}", record.title, record.time, record.platform)
}

fn entry_line_style(record: &ScheduleRecord, fg: ratatui::style::Color) -> Style {
    if record.is_completed {
        Style::default().fg(fg).add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(fg)
    }
}

/// Day detail: full information for every entry on the selected date.
pub fn render_day(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let dim = parse_color(&theme.dim_fg);

    let selected = app.ui.selected_date;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(utils::format_full_date_ja(selected))
        .style(Style::default().fg(fg).bg(bg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let records = app.selected_day_records();
    let mut lines = Vec::new();
    if records.is_empty() {
        lines.push(Line::from(Span::styled(
            "No schedule for this day.",
            Style::default().fg(dim),
        )));
    } else {
        for record in &records {
            let mut title_style = Style::default().fg(fg).add_modifier(Modifier::BOLD);
            if record.is_completed {
                title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
            }
            lines.push(Line::from(vec![
                Span::styled(display_time(&record.time), Style::default().fg(fg)),
                Span::raw("  "),
                Span::styled(record.title.clone(), title_style),
            ]));
            lines.push(Line::from(Span::styled(
                format!("    {} / {}", record.category, record.platform),
                Style::default().fg(dim),
            )));
            if !record.notes.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", record.notes),
                    Style::default().fg(dim),
                )));
            }
            lines.push(Line::from(""));
        }
    }

    let paragraph = Paragraph::new(lines).wrap(ratatui::widgets::Wrap { trim: false });
    f.render_widget(paragraph, inner);
}
