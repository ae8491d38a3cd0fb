use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let (content, style) = if let Some(msg) = message {
        // Status messages get a highlighted background for visibility
        let msg_fg = get_contrast_text_color(highlight_bg);
        (
            truncate(msg, area.width as usize),
            Style::default()
                .fg(msg_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        // Fit as many hints as possible, " • " separated, ellipsis when cut
        let max_width = area.width as usize;
        let mut hints_text = String::new();
        for (i, hint) in key_hints.iter().enumerate() {
            let addition = if i == 0 { hint.clone() } else { format!(" • {hint}") };
            if hints_text.chars().count() + addition.chars().count() > max_width {
                hints_text = truncate(&format!("{hints_text}..."), max_width);
                break;
            }
            hints_text.push_str(&addition);
        }
        (hints_text, Style::default().fg(fg_color).bg(bg_color))
    };

    let paragraph = Paragraph::new(content).style(style);
    f.render_widget(paragraph, area);
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
