use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;

use crate::export::{self, ImageFormat};
use crate::template;
use crate::tui::app::{
    App, FormField, ListScope, Mode, PanelState, PanelTab, ScheduleForm, SnsField, ViewMode,
};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::utils::{ParsedKeyBinding, has_primary_modifier, parse_key_binding};

/// Guard that ensures terminal state is restored even on panic.
/// A terminal left in raw mode or the alternate screen is unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Manually restore terminal state (called on normal exit).
    /// After this, the guard does nothing on drop.
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Ignore errors here, this is already a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check terminal size before entering the alternate screen so the error
    // message lands in the normal terminal
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::Render(format!(
            "Terminal size too small. Current: {}x{}, minimum required: {}x{}.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.check_status_message_timeout();

        terminal.draw(|f| {
            let layout = Layout::calculate(
                f.area(),
                app.config.panel_width_percent,
                app.ui.panel_state == PanelState::Collapsed,
            );
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        // Only process Press events to avoid double-processing on Windows
        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if handle_key_event(&mut app, key_event)? {
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    guard.restore()?;
    Ok(())
}

fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    // The delete confirmation modal captures everything while open
    if app.modals.delete_confirmation.is_some() {
        return handle_delete_confirmation_modal(app, key_event);
    }

    match app.ui.mode {
        Mode::Help => handle_help_mode(app, key_event),
        Mode::Form => handle_form_mode(app, key_event),
        Mode::SnsEdit => handle_sns_edit_mode(app, key_event),
        Mode::View => handle_view_mode(app, key_event),
    }
}

fn binding(key_str: &str) -> Result<ParsedKeyBinding, TuiError> {
    parse_key_binding(key_str).map_err(TuiError::KeyBinding)
}

fn matches_key_event(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    if binding.requires_ctrl != has_primary_modifier(key_event.modifiers) {
        return false;
    }
    key_event.code == binding.key_code
}

fn handle_delete_confirmation_modal(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Up | KeyCode::Down => {
            app.modals.delete_modal_selection = 1 - app.modals.delete_modal_selection;
        }
        KeyCode::Enter => {
            if app.modals.delete_modal_selection == 0 {
                app.confirm_delete();
            } else {
                app.modals.delete_confirmation = None;
            }
        }
        KeyCode::Esc => {
            app.modals.delete_confirmation = None;
        }
        _ => {}
    }
    Ok(false)
}

fn handle_help_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let help_binding = binding(&app.config.key_bindings.help)?;
    if key_event.code == KeyCode::Esc || matches_key_event(key_event, &help_binding) {
        app.ui.mode = Mode::View;
    }
    Ok(false)
}

fn handle_form_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let save_binding = binding(&app.config.key_bindings.save)?;

    if key_event.code == KeyCode::Esc {
        app.form = None;
        app.ui.mode = Mode::View;
        return Ok(false);
    }
    if matches_key_event(key_event, &save_binding) {
        app.submit_form();
        return Ok(false);
    }

    let Some(form) = app.form.as_mut() else {
        return Ok(false);
    };

    match key_event.code {
        KeyCode::Tab => form.next_field(),
        KeyCode::BackTab => form.prev_field(),
        KeyCode::Down => {
            if form.current_field == FormField::Notes {
                form.notes.move_cursor_down();
            } else {
                form.next_field();
            }
        }
        KeyCode::Up => {
            if form.current_field == FormField::Notes {
                form.notes.move_cursor_up();
            } else {
                form.prev_field();
            }
        }
        KeyCode::Enter => {
            if form.current_field == FormField::Notes {
                form.notes.insert_newline();
                form.error = None;
            } else {
                form.next_field();
            }
        }
        KeyCode::Char(' ') if form.current_field == FormField::TimeUndecided => {
            form.time_undecided = !form.time_undecided;
            form.error = None;
        }
        KeyCode::Char(c) if !has_primary_modifier(key_event.modifiers) => {
            if let Some(editor) = form.active_editor() {
                editor.insert_char(c);
                form.error = None;
            }
        }
        KeyCode::Backspace => {
            if let Some(editor) = form.active_editor() {
                editor.delete_char();
                form.error = None;
            }
        }
        KeyCode::Delete => {
            if let Some(editor) = form.active_editor() {
                editor.delete_forward();
                form.error = None;
            }
        }
        KeyCode::Left => {
            if let Some(editor) = form.active_editor() {
                editor.move_cursor_left();
            }
        }
        KeyCode::Right => {
            if let Some(editor) = form.active_editor() {
                editor.move_cursor_right();
            }
        }
        KeyCode::Home => {
            if let Some(editor) = form.active_editor() {
                editor.move_cursor_home();
            }
        }
        KeyCode::End => {
            if let Some(editor) = form.active_editor() {
                editor.move_cursor_end();
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_sns_edit_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let save_binding = binding(&app.config.key_bindings.save)?;

    if key_event.code == KeyCode::Esc {
        // Leaving the editor persists the slots, same as an explicit save
        app.save_sns();
        app.ui.mode = Mode::View;
        return Ok(false);
    }
    if matches_key_event(key_event, &save_binding) {
        app.save_sns();
        app.set_status_message("Template and hashtags saved".to_string());
        return Ok(false);
    }

    if key_event.code == KeyCode::Tab {
        app.sns.current_field = match app.sns.current_field {
            SnsField::Template => SnsField::Hashtags,
            SnsField::Hashtags => SnsField::Template,
        };
        return Ok(false);
    }

    let in_template = app.sns.current_field == SnsField::Template;
    let editor = match app.sns.current_field {
        SnsField::Template => &mut app.sns.template,
        SnsField::Hashtags => &mut app.sns.hashtags,
    };

    match key_event.code {
        KeyCode::Enter if in_template => editor.insert_newline(),
        KeyCode::Char(c) if !has_primary_modifier(key_event.modifiers) => editor.insert_char(c),
        KeyCode::Backspace => editor.delete_char(),
        KeyCode::Delete => editor.delete_forward(),
        KeyCode::Left => editor.move_cursor_left(),
        KeyCode::Right => editor.move_cursor_right(),
        KeyCode::Up if in_template => editor.move_cursor_up(),
        KeyCode::Down if in_template => editor.move_cursor_down(),
        KeyCode::Home => editor.move_cursor_home(),
        KeyCode::End => editor.move_cursor_end(),
        _ => {}
    }
    Ok(false)
}

fn handle_view_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let keys = app.config.key_bindings.clone();

    if matches_key_event(key_event, &binding(&keys.quit)?) {
        return Ok(true);
    }
    if matches_key_event(key_event, &binding(&keys.help)?) {
        app.ui.mode = Mode::Help;
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.toggle_panel)?) {
        app.ui.panel_state = match app.ui.panel_state {
            PanelState::Expanded => PanelState::Collapsed,
            PanelState::Collapsed => PanelState::Expanded,
        };
        return Ok(false);
    }

    // Panel tabs
    if key_event.code == KeyCode::Tab {
        app.ui.panel_tab = app.ui.panel_tab.next();
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.tab_1)?) {
        app.ui.panel_tab = PanelTab::Schedule;
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.tab_2)?) {
        app.ui.panel_tab = PanelTab::Image;
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.tab_3)?) {
        app.ui.panel_tab = PanelTab::Sns;
        return Ok(false);
    }

    // Calendar views and navigation
    if matches_key_event(key_event, &binding(&keys.view_month)?) {
        app.ui.view_mode = ViewMode::Month;
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.view_week)?) {
        app.ui.view_mode = ViewMode::Week;
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.view_day)?) {
        app.ui.view_mode = ViewMode::Day;
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.today)?) {
        app.select_date(crate::utils::today());
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.prev_period)?) {
        app.move_period(false);
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.next_period)?) {
        app.move_period(true);
        return Ok(false);
    }
    match key_event.code {
        KeyCode::Left => {
            app.move_selected_date(-1);
            return Ok(false);
        }
        KeyCode::Right => {
            app.move_selected_date(1);
            return Ok(false);
        }
        KeyCode::Up => {
            app.move_selected_date(-7);
            return Ok(false);
        }
        KeyCode::Down => {
            app.move_selected_date(7);
            return Ok(false);
        }
        _ => {}
    }

    // Panel list
    if matches_key_event(key_event, &binding(&keys.list_up)?) {
        app.move_list_selection(false);
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.list_down)?) {
        app.move_list_selection(true);
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.toggle_scope)?) {
        if app.ui.panel_tab == PanelTab::Schedule {
            app.ui.list_scope = match app.ui.list_scope {
                ListScope::Day => ListScope::All,
                ListScope::All => ListScope::Day,
            };
            app.ui.list_index = 0;
            app.clamp_list_selection();
        }
        return Ok(false);
    }

    // Schedule actions
    if matches_key_event(key_event, &binding(&keys.new)?) {
        app.form = Some(ScheduleForm::blank(app.ui.selected_date));
        app.ui.mode = Mode::Form;
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.edit)?) {
        if let Some(record) = app.current_record() {
            app.form = Some(ScheduleForm::for_record(&record));
            app.ui.mode = Mode::Form;
        }
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.select)?) {
        match app.ui.panel_tab {
            PanelTab::Sns => app.ui.mode = Mode::SnsEdit,
            _ => {
                if let Some(record) = app.current_record() {
                    app.form = Some(ScheduleForm::for_record(&record));
                    app.ui.mode = Mode::Form;
                }
            }
        }
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.delete)?) {
        app.request_delete();
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.toggle_completed)?) {
        app.toggle_completed();
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.post)?) {
        post_selected(app);
        return Ok(false);
    }

    // Card export (Image tab)
    if matches_key_event(key_event, &binding(&keys.toggle_card)?) {
        if app.ui.panel_tab == PanelTab::Image {
            app.export.card = app.export.card.toggled();
        }
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.export_png)?) {
        if app.ui.panel_tab == PanelTab::Image {
            export_selected(app, ImageFormat::Png);
        }
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&keys.export_jpeg)?) {
        if app.ui.panel_tab == PanelTab::Image {
            export_selected(app, ImageFormat::Jpeg);
        }
        return Ok(false);
    }

    Ok(false)
}

/// Render the post for the selected record, copy it to the clipboard and
/// (when configured) open the share-intent URL in the browser.
fn post_selected(app: &mut App) {
    let Some(record) = app.current_record() else {
        app.set_status_message("No schedule selected".to_string());
        return;
    };
    let text = app.post_text(&record);

    if let Ok(mut clipboard) = arboard::Clipboard::new() {
        if let Err(e) = clipboard.set_text(&text) {
            app.set_status_message(format!("Failed to copy to clipboard: {}", e));
        } else {
            app.set_status_message("Post copied to clipboard".to_string());
        }
    } else {
        app.set_status_message("Failed to access clipboard".to_string());
    }

    if app.config.open_share_url {
        let url = template::share_url(&text);
        if let Err(e) = open::that(url) {
            app.set_status_message(format!("Failed to open share URL: {}", e));
        }
    }
}

/// Export a card for the record picked in the Image tab. With nothing
/// picked this is a silent no-op.
fn export_selected(app: &mut App, format: ImageFormat) {
    let records = app.all_sorted();
    let Some(record) = records.get(app.export.list_index) else {
        return;
    };

    let dir = app.config.get_export_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        app.set_status_message(format!("Export failed: {}", e));
        return;
    }
    let path = dir.join(export::default_file_name(format));
    match export::export_card(record, app.export.card, format, &path) {
        Ok(()) => app.set_status_message(format!("Exported {}", path.display())),
        Err(e) => app.set_status_message(format!("Export failed: {}", e)),
    }
}
