use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::app::{FormField, ScheduleForm};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::editor::Editor;

/// Create/edit form, rendered as a centered popup over the calendar.
pub fn render_schedule_form(f: &mut Frame, area: Rect, form: &ScheduleForm, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup = popup_area(area, 60, 85);
    f.render_widget(Clear, popup);

    let title = if form.editing_id.is_some() {
        "Edit schedule"
    } else {
        "New schedule"
    };
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg).bg(bg));
    let inner = outer.inner(popup);
    f.render_widget(outer, popup);
    if inner.height < 8 || inner.width < 10 {
        return;
    }

    let field_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Validation error
            Constraint::Length(3), // Title
            Constraint::Length(3), // Date
            Constraint::Length(3), // Time
            Constraint::Length(1), // Time undecided toggle
            Constraint::Length(3), // Category
            Constraint::Length(3), // Platform
            Constraint::Min(3),    // Notes
        ])
        .split(inner);

    // Validation errors surface inline at the top of the form
    if let Some(ref error) = form.error {
        let error_line = Paragraph::new(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(parse_color("red")).add_modifier(Modifier::BOLD),
        )));
        f.render_widget(error_line, field_areas[0]);
    }

    let highlight_style = Style::default().fg(highlight_fg).bg(highlight_bg);
    let idle_style = Style::default().fg(fg).add_modifier(Modifier::DIM);
    let style_for = |field: FormField| {
        if form.current_field == field {
            highlight_style
        } else {
            idle_style
        }
    };

    render_single_line(f, field_areas[1], "Title", &form.title, style_for(FormField::Title));
    render_single_line(
        f,
        field_areas[2],
        "Date (YYYY-MM-DD)",
        &form.date,
        style_for(FormField::Date),
    );

    let time_title = if form.time_undecided { "Time (undecided)" } else { "Time (HH:MM)" };
    render_single_line(f, field_areas[3], time_title, &form.time, style_for(FormField::Time));

    let marker = if form.time_undecided { "[x]" } else { "[ ]" };
    let toggle = Paragraph::new(Line::from(Span::styled(
        format!("{marker} Time undecided (Space to toggle)"),
        style_for(FormField::TimeUndecided),
    )));
    f.render_widget(toggle, field_areas[4]);

    render_single_line(
        f,
        field_areas[5],
        "Category",
        &form.category,
        style_for(FormField::Category),
    );
    render_single_line(
        f,
        field_areas[6],
        "Platform",
        &form.platform,
        style_for(FormField::Platform),
    );
    render_multi_line(f, field_areas[7], "Notes", &form.notes, style_for(FormField::Notes));

    // Cursor on the active text field
    let cursor_area = match form.current_field {
        FormField::Title => Some((field_areas[1], &form.title)),
        FormField::Date => Some((field_areas[2], &form.date)),
        FormField::Time if !form.time_undecided => Some((field_areas[3], &form.time)),
        FormField::Category => Some((field_areas[5], &form.category)),
        FormField::Platform => Some((field_areas[6], &form.platform)),
        FormField::Notes => Some((field_areas[7], &form.notes)),
        _ => None,
    };
    if let Some((field_area, editor)) = cursor_area {
        if let Some((x, y)) = editor.cursor_screen_pos(field_area) {
            f.set_cursor_position((x, y));
        }
    }
}

fn render_single_line(f: &mut Frame, area: Rect, title: &str, editor: &Editor, style: Style) {
    let width = area.width.saturating_sub(2) as usize;
    let left = editor.scroll_left(width);
    let text: String = editor
        .lines
        .first()
        .map(|line| line.chars().skip(left).take(width).collect())
        .unwrap_or_default();
    let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);
}

fn render_multi_line(f: &mut Frame, area: Rect, title: &str, editor: &Editor, style: Style) {
    let height = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(2) as usize;
    let top = editor.scroll_top(height);
    let left = editor.scroll_left(width);

    let lines: Vec<Line> = editor
        .lines
        .iter()
        .skip(top)
        .take(height.max(1))
        .map(|line| {
            let text: String = line.chars().skip(left).take(width).collect();
            Line::from(Span::styled(text, style))
        })
        .collect();
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);
}

/// Helper function to create a centered rect using up certain percentage of the available rect
/// Based on ratatui popup example: https://ratatui.rs/examples/apps/popup/
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
