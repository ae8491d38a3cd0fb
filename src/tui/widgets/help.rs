use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display as display;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 75);

    // Clear the background first so content does not show through
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
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

fn build_help_text(config: &Config) -> String {
    let keys = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Calendar:\n");
    text.push_str(&format!(
        "  {} / {} / {}: Month / Week / Day view\n",
        display(&keys.view_month),
        display(&keys.view_week),
        display(&keys.view_day)
    ));
    text.push_str("  Arrow keys: Move the selected date (±1 day, ±1 week)\n");
    text.push_str(&format!(
        "  {} / {}: Previous / next month, week or day\n",
        display(&keys.prev_period),
        display(&keys.next_period)
    ));
    text.push_str(&format!("  {}: Jump to today\n", display(&keys.today)));
    text.push_str("\n");

    text.push_str("Schedule:\n");
    text.push_str(&format!("  {}: New entry on the selected date\n", display(&keys.new)));
    text.push_str(&format!("  {}: Edit the selected entry\n", display(&keys.edit)));
    text.push_str(&format!("  {}: Delete the selected entry\n", display(&keys.delete)));
    text.push_str(&format!(
        "  {}: Toggle done/not done\n",
        display(&keys.toggle_completed)
    ));
    text.push_str(&format!(
        "  {} / {}: Move the list selection\n",
        display(&keys.list_up),
        display(&keys.list_down)
    ));
    text.push_str(&format!(
        "  {}: Toggle day list / full list\n",
        display(&keys.toggle_scope)
    ));
    text.push_str("\n");

    text.push_str("SNS & cards:\n");
    text.push_str(&format!(
        "  {}: Copy the SNS post for the selected entry\n",
        display(&keys.post)
    ));
    text.push_str(&format!(
        "  {} (Image tab): Toggle the card template\n",
        display(&keys.toggle_card)
    ));
    text.push_str(&format!(
        "  {} / {} (Image tab): Export the card as PNG / JPEG\n",
        display(&keys.export_png),
        display(&keys.export_jpeg)
    ));
    text.push_str(&format!(
        "  {} (SNS tab): Edit the template, Ctrl+s saves\n",
        display(&keys.select)
    ));
    text.push_str("\n");

    text.push_str("General:\n");
    text.push_str(&format!(
        "  {} / {} / {}: Panel tabs, Tab cycles\n",
        display(&keys.tab_1),
        display(&keys.tab_2),
        display(&keys.tab_3)
    ));
    text.push_str(&format!("  {}: Show/hide the side panel\n", display(&keys.toggle_panel)));
    text.push_str(&format!("  {}: Show/hide help\n", display(&keys.help)));
    text.push_str(&format!("  {}: Quit\n", display(&keys.quit)));

    text
}
