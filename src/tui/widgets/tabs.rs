use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;

use crate::Config;
use crate::tui::app::{PanelTab, ViewMode};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

fn boxed_title(label: &str, tab_bg: ratatui::style::Color) -> Line<'static> {
    let tab_fg = get_contrast_text_color(tab_bg);
    Line::from(vec![
        Span::styled("  ", Style::default().bg(tab_bg)),
        Span::styled(label.to_string(), Style::default().fg(tab_fg).bg(tab_bg)),
        Span::styled("  ", Style::default().bg(tab_bg)),
    ])
}

fn styled_tabs<'a>(titles: Vec<Line<'a>>, selected: usize, config: &Config) -> Tabs<'a> {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .divider("  ")
        .padding("", "")
}

/// Month / Week / Day selector above the calendar
pub fn render_view_tabs(f: &mut Frame, area: Rect, current: ViewMode, config: &Config) {
    let tab_bg = parse_color(&config.get_active_theme().tab_bg);
    let titles = vec![
        boxed_title("Month", tab_bg),
        boxed_title("Week", tab_bg),
        boxed_title("Day", tab_bg),
    ];
    let selected = match current {
        ViewMode::Month => 0,
        ViewMode::Week => 1,
        ViewMode::Day => 2,
    };
    f.render_widget(styled_tabs(titles, selected, config), area);
}

/// Schedule / Image / SNS selector at the top of the side panel
pub fn render_panel_tabs(f: &mut Frame, area: Rect, current: PanelTab, config: &Config) {
    let tab_bg = parse_color(&config.get_active_theme().tab_bg);
    let titles = vec![
        boxed_title("Schedule", tab_bg),
        boxed_title("Image", tab_bg),
        boxed_title("SNS", tab_bg),
    ];
    let selected = match current {
        PanelTab::Schedule => 0,
        PanelTab::Image => 1,
        PanelTab::Sns => 2,
    };
    f.render_widget(styled_tabs(titles, selected, config), area);
}
