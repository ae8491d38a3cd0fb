use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout as RatLayout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

use crate::tui::Layout;
use crate::tui::app::{App, Mode, PanelState, PanelTab, ViewMode};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::{
    calendar, confirm_delete::render_confirm_delete, export_panel::render_export_panel,
    form::render_schedule_form, help::render_help, schedule_list::render_schedule_panel,
    sns_panel::render_sns_panel, status_bar::render_status_bar,
    tabs::{render_panel_tabs, render_view_tabs},
};
use crate::utils::format_key_binding_for_display as display;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    // Outer border with the app name centered in the top border
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("sucal")
        .title_alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    render_view_tabs(f, layout.tabs_area, app.ui.view_mode, &app.config);

    match app.ui.view_mode {
        ViewMode::Month => calendar::render_month(f, layout.calendar_area, app),
        ViewMode::Week => calendar::render_week(f, layout.calendar_area, app),
        ViewMode::Day => calendar::render_day(f, layout.calendar_area, app),
    }

    if app.ui.panel_state == PanelState::Expanded && layout.panel_area.width > 0 {
        let panel = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(layout.panel_area);
        render_panel_tabs(f, panel[0], app.ui.panel_tab, &app.config);
        match app.ui.panel_tab {
            PanelTab::Schedule => render_schedule_panel(f, panel[1], app),
            PanelTab::Image => render_export_panel(f, panel[1], app),
            PanelTab::Sns => render_sns_panel(f, panel[1], app),
        }
    }

    // Overlays render last, over the normal content
    if app.ui.mode == Mode::Form {
        if let Some(ref form) = app.form {
            render_schedule_form(f, f.area(), form, &app.config);
        }
    }
    if app.ui.mode == Mode::Help {
        render_help(f, f.area(), &app.config);
    }
    if let Some(ref record) = app.modals.delete_confirmation {
        render_confirm_delete(
            f,
            f.area(),
            record,
            app.modals.delete_modal_selection,
            &app.config,
        );
    }

    let key_hints = get_key_hints(app);
    render_status_bar(
        f,
        layout.status_area,
        app.status.message.as_ref(),
        &key_hints,
        &app.config,
    );
}

fn get_key_hints(app: &App) -> Vec<String> {
    let keys = &app.config.key_bindings;
    match app.ui.mode {
        Mode::Help => vec![format!("Esc or {}: Exit help", display(&keys.help))],
        Mode::Form => vec![
            "Tab/Enter: Next field".to_string(),
            "Shift+Tab: Previous field".to_string(),
            format!("{}: Save", display(&keys.save)),
            "Esc: Cancel".to_string(),
        ],
        Mode::SnsEdit => vec![
            "Tab: Switch field".to_string(),
            format!("{}: Save", display(&keys.save)),
            "Esc: Done".to_string(),
        ],
        Mode::View => {
            let mut hints = vec![
                format!("{}: Quit", display(&keys.quit)),
                format!("{}: New", display(&keys.new)),
                format!("{}: Edit", display(&keys.edit)),
                format!("{}: Delete", display(&keys.delete)),
                format!("{}: Post", display(&keys.post)),
                format!(
                    "{}/{}/{}: View",
                    display(&keys.view_month),
                    display(&keys.view_week),
                    display(&keys.view_day)
                ),
                format!("{}: Today", display(&keys.today)),
            ];
            match app.ui.panel_tab {
                PanelTab::Schedule => {
                    hints.push(format!("{}: Day/all list", display(&keys.toggle_scope)));
                    hints.push(format!("{}: Done", display(&keys.toggle_completed)));
                }
                PanelTab::Image => {
                    hints.push(format!("{}: Template", display(&keys.toggle_card)));
                    hints.push(format!(
                        "{}/{}: Export PNG/JPEG",
                        display(&keys.export_png),
                        display(&keys.export_jpeg)
                    ));
                }
                PanelTab::Sns => {
                    hints.push(format!("{}: Edit template", display(&keys.select)));
                }
            }
            hints.push(format!("{}: Help", display(&keys.help)));
            hints
        }
    }
}
