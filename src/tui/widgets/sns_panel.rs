use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Mode, SnsField};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::editor::Editor;

/// Placeholder reference shown under the editors, matching the template
/// grammar the renderer understands.
const PLACEHOLDER_REFERENCE: [(&str, &str); 8] = [
    ("${title}", "schedule title"),
    ("${date}", "date (2025-08-22)"),
    ("${time}", "time (20:00～ or 未定)"),
    ("${category}", "category"),
    ("${notes}", "notes (特になし when empty)"),
    ("${platform}", "platform"),
    ("${hashtag_title}", "title as hashtag body"),
    ("${hashtag_vtuber}", "fixed #Vtuber tag"),
];

/// SNS tab: post template and favorite hashtags, editable in place.
pub fn render_sns_panel(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let dim = parse_color(&theme.dim_fg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let editing = app.ui.mode == Mode::SnsEdit;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),                                         // Template
            Constraint::Length(3),                                      // Hashtags
            Constraint::Length(PLACEHOLDER_REFERENCE.len() as u16 + 2), // Reference
        ])
        .split(area);

    let active_style = Style::default().fg(highlight_fg).bg(highlight_bg);
    let idle_style = Style::default().fg(fg).add_modifier(Modifier::DIM);

    // Template editor (multi-line)
    let template_active = editing && app.sns.current_field == SnsField::Template;
    let template_style = if template_active { active_style } else { idle_style };
    let template_block = Block::default()
        .borders(Borders::ALL)
        .title("Post template")
        .style(Style::default().fg(fg).bg(bg));
    let template_area = sections[0];
    let lines = visible_lines(&app.sns.template, template_area, template_style);
    f.render_widget(Paragraph::new(lines).block(template_block), template_area);
    if template_active {
        if let Some((x, y)) = app.sns.template.cursor_screen_pos(template_area) {
            f.set_cursor_position((x, y));
        }
    }

    // Hashtags editor (single line)
    let hashtags_active = editing && app.sns.current_field == SnsField::Hashtags;
    let hashtags_style = if hashtags_active { active_style } else { idle_style };
    let hashtags_block = Block::default()
        .borders(Borders::ALL)
        .title("Favorite hashtags (space-separated)")
        .style(Style::default().fg(fg).bg(bg));
    let hashtags_area = sections[1];
    let lines = visible_lines(&app.sns.hashtags, hashtags_area, hashtags_style);
    f.render_widget(Paragraph::new(lines).block(hashtags_block), hashtags_area);
    if hashtags_active {
        if let Some((x, y)) = app.sns.hashtags.cursor_screen_pos(hashtags_area) {
            f.set_cursor_position((x, y));
        }
    }

    // Placeholder reference
    let reference_lines: Vec<Line> = PLACEHOLDER_REFERENCE
        .iter()
        .map(|(token, description)| {
            Line::from(vec![
                Span::styled(format!("{token:20}"), Style::default().fg(fg)),
                Span::styled((*description).to_string(), Style::default().fg(dim)),
            ])
        })
        .collect();
    let reference = Paragraph::new(reference_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Placeholders")
            .style(Style::default().fg(fg).bg(bg)),
    );
    f.render_widget(reference, sections[2]);
}

/// The editor lines visible inside a bordered area, scrolled to the cursor.
fn visible_lines<'a>(editor: &'a Editor, area: Rect, style: Style) -> Vec<Line<'a>> {
    let height = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(2) as usize;
    let top = editor.scroll_top(height);
    let left = editor.scroll_left(width);

    editor
        .lines
        .iter()
        .skip(top)
        .take(height.max(1))
        .map(|line| {
            let text: String = line.chars().skip(left).take(width).collect();
            Line::from(Span::styled(text, style))
        })
        .collect()
}
