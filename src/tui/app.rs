use chrono::{Days, Months, NaiveDate};
use ratatui::widgets::ListState;
use std::time::Instant;

use crate::export::CardTemplate;
use crate::models::ScheduleRecord;
use crate::query;
use crate::store::ScheduleStore;
use crate::tui::widgets::editor::Editor;
use crate::{Config, utils};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Month,
    Week,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTab {
    Schedule,
    Image,
    Sns,
}

impl PanelTab {
    pub fn next(self) -> Self {
        match self {
            PanelTab::Schedule => PanelTab::Image,
            PanelTab::Image => PanelTab::Sns,
            PanelTab::Sns => PanelTab::Schedule,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Expanded,
    Collapsed,
}

/// Which records the schedule list shows: the selected day only, or the
/// whole collection sorted by date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    Day,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Form,
    Help,
    SnsEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Date,
    Time,
    TimeUndecided,
    Category,
    Platform,
    Notes,
}

/// Create/edit form state. `editing_id` is `None` for a new entry.
#[derive(Debug, Clone)]
pub struct ScheduleForm {
    pub current_field: FormField,
    pub title: Editor,
    pub date: Editor,
    pub time: Editor,
    pub time_undecided: bool,
    pub category: Editor,
    pub platform: Editor,
    pub notes: Editor,
    pub editing_id: Option<String>,
    pub is_completed: bool,
    pub error: Option<String>,
}

impl ScheduleForm {
    /// Blank form for a new entry on the given day. The time field is
    /// seeded with a typical evening start.
    pub fn blank(date: NaiveDate) -> Self {
        Self {
            current_field: FormField::Title,
            title: Editor::new(),
            date: Editor::from_string(&date.format("%Y-%m-%d").to_string()),
            time: Editor::from_string("19:00"),
            time_undecided: false,
            category: Editor::new(),
            platform: Editor::new(),
            notes: Editor::new(),
            editing_id: None,
            is_completed: false,
            error: None,
        }
    }

    pub fn for_record(record: &ScheduleRecord) -> Self {
        let time_undecided = record.time_is_undecided();
        Self {
            current_field: FormField::Title,
            title: Editor::from_string(&record.title),
            date: Editor::from_string(&record.date),
            time: if time_undecided {
                Editor::new()
            } else {
                Editor::from_string(&record.time)
            },
            time_undecided,
            category: Editor::from_string(&record.category),
            platform: Editor::from_string(&record.platform),
            notes: Editor::from_string(&record.notes),
            editing_id: Some(record.id.clone()),
            is_completed: record.is_completed,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::Title => FormField::Date,
            FormField::Date => FormField::Time,
            FormField::Time => FormField::TimeUndecided,
            FormField::TimeUndecided => FormField::Category,
            FormField::Category => FormField::Platform,
            FormField::Platform => FormField::Notes,
            FormField::Notes => FormField::Title,
        };
    }

    pub fn prev_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::Title => FormField::Notes,
            FormField::Date => FormField::Title,
            FormField::Time => FormField::Date,
            FormField::TimeUndecided => FormField::Time,
            FormField::Category => FormField::TimeUndecided,
            FormField::Platform => FormField::Category,
            FormField::Notes => FormField::Platform,
        };
    }

    /// The editor behind the active field, if it is a text field.
    pub fn active_editor(&mut self) -> Option<&mut Editor> {
        match self.current_field {
            FormField::Title => Some(&mut self.title),
            FormField::Date => Some(&mut self.date),
            FormField::Time => {
                if self.time_undecided {
                    None
                } else {
                    Some(&mut self.time)
                }
            }
            FormField::TimeUndecided => None,
            FormField::Category => Some(&mut self.category),
            FormField::Platform => Some(&mut self.platform),
            FormField::Notes => Some(&mut self.notes),
        }
    }

    /// Validate the fields and build the record. Empty title and bad
    /// date/time are entry errors; category/platform fall back to the
    /// undecided sentinel inside the constructor.
    pub fn build_record(&self) -> Result<ScheduleRecord, String> {
        let title = self.title.to_string();
        let title = title.trim();
        if title.is_empty() {
            return Err("Title is required".to_string());
        }

        let date_input = self.date.to_string();
        let date = utils::parse_date(&date_input)
            .map_err(|_| "Date must be a valid YYYY-MM-DD".to_string())?;

        let time = if self.time_undecided {
            None
        } else {
            let t = self.time.to_string().trim().to_string();
            if t.is_empty() {
                None
            } else {
                chrono::NaiveTime::parse_from_str(&t, "%H:%M")
                    .map_err(|_| "Time must be HH:MM".to_string())?;
                Some(t)
            }
        };

        let mut record = ScheduleRecord::new(
            title,
            date,
            time.as_deref(),
            &self.category.to_string(),
            &self.platform.to_string(),
            &self.notes.to_string(),
        );
        if let Some(ref id) = self.editing_id {
            record.id = id.clone();
            record.is_completed = self.is_completed;
        }
        Ok(record)
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub view_mode: ViewMode,
    pub selected_date: NaiveDate,
    pub mode: Mode,
    pub panel_tab: PanelTab,
    pub panel_state: PanelState,
    pub list_scope: ListScope,
    pub list_index: usize,
    pub list_state: ListState,
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub delete_confirmation: Option<ScheduleRecord>,
    pub delete_modal_selection: usize, // 0 = Delete, 1 = Cancel
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnsField {
    Template,
    Hashtags,
}

#[derive(Debug, Clone)]
pub struct SnsState {
    pub current_field: SnsField,
    pub template: Editor,
    pub hashtags: Editor,
}

#[derive(Debug, Clone)]
pub struct ExportState {
    pub card: CardTemplate,
    pub list_index: usize,
    pub list_state: ListState,
}

pub struct App {
    pub config: Config,
    pub store: ScheduleStore,

    pub ui: UiState,
    pub form: Option<ScheduleForm>,
    pub modals: ModalState,
    pub status: StatusState,
    pub sns: SnsState,
    pub export: ExportState,
}

/// How long transient status messages stay on screen.
const STATUS_MESSAGE_SECS: u64 = 5;

impl App {
    pub fn new(config: Config, store: ScheduleStore) -> Self {
        let sns = SnsState {
            current_field: SnsField::Template,
            template: Editor::from_string(&store.load_template()),
            hashtags: Editor::from_string(&store.load_hashtags()),
        };
        Self {
            config,
            store,
            ui: UiState {
                view_mode: ViewMode::Month,
                selected_date: utils::today(),
                mode: Mode::View,
                panel_tab: PanelTab::Schedule,
                panel_state: PanelState::Expanded,
                list_scope: ListScope::Day,
                list_index: 0,
                list_state: ListState::default(),
            },
            form: None,
            modals: ModalState::default(),
            status: StatusState::default(),
            sns,
            export: ExportState {
                card: CardTemplate::Minimal,
                list_index: 0,
                list_state: ListState::default(),
            },
        }
    }

    // --- derived record views -------------------------------------------

    pub fn selected_day_records(&self) -> Vec<ScheduleRecord> {
        query::filter_by_day(self.store.records(), self.ui.selected_date)
    }

    pub fn all_sorted(&self) -> Vec<ScheduleRecord> {
        query::sort_by_date_ascending(self.store.records())
    }

    /// The records the schedule panel currently lists.
    pub fn schedule_list_records(&self) -> Vec<ScheduleRecord> {
        match self.ui.list_scope {
            ListScope::Day => self.selected_day_records(),
            ListScope::All => self.all_sorted(),
        }
    }

    /// The record actions (edit/delete/post/toggle) operate on, depending
    /// on the active panel tab.
    pub fn current_record(&self) -> Option<ScheduleRecord> {
        match self.ui.panel_tab {
            PanelTab::Schedule => self
                .schedule_list_records()
                .into_iter()
                .nth(self.ui.list_index),
            PanelTab::Image => self.all_sorted().into_iter().nth(self.export.list_index),
            PanelTab::Sns => None,
        }
    }

    // --- list selection --------------------------------------------------

    pub fn move_list_selection(&mut self, down: bool) {
        match self.ui.panel_tab {
            PanelTab::Schedule => {
                let len = self.schedule_list_records().len();
                self.ui.list_index = step_index(self.ui.list_index, len, down);
            }
            PanelTab::Image => {
                let len = self.all_sorted().len();
                self.export.list_index = step_index(self.export.list_index, len, down);
            }
            PanelTab::Sns => {}
        }
        self.sync_list_state();
    }

    /// Keep both list selections inside their collections after any data or
    /// selection-scope change.
    pub fn clamp_list_selection(&mut self) {
        let schedule_len = self.schedule_list_records().len();
        if self.ui.list_index >= schedule_len {
            self.ui.list_index = schedule_len.saturating_sub(1);
        }
        let all_len = self.store.records().len();
        if self.export.list_index >= all_len {
            self.export.list_index = all_len.saturating_sub(1);
        }
        self.sync_list_state();
    }

    pub fn sync_list_state(&mut self) {
        self.ui.list_state.select(Some(self.ui.list_index));
        self.export.list_state.select(Some(self.export.list_index));
    }

    // --- calendar navigation ---------------------------------------------

    pub fn select_date(&mut self, date: NaiveDate) {
        self.ui.selected_date = date;
        self.clamp_list_selection();
    }

    pub fn move_selected_date(&mut self, days: i64) {
        let date = if days >= 0 {
            self.ui.selected_date + Days::new(days as u64)
        } else {
            self.ui.selected_date - Days::new(days.unsigned_abs())
        };
        self.select_date(date);
    }

    /// Previous/next month, week or day, depending on the active view.
    pub fn move_period(&mut self, forward: bool) {
        let date = self.ui.selected_date;
        let moved = match self.ui.view_mode {
            ViewMode::Month => {
                if forward {
                    date.checked_add_months(Months::new(1))
                } else {
                    date.checked_sub_months(Months::new(1))
                }
            }
            ViewMode::Week => Some(if forward {
                date + Days::new(7)
            } else {
                date - Days::new(7)
            }),
            ViewMode::Day => Some(if forward {
                date + Days::new(1)
            } else {
                date - Days::new(1)
            }),
        };
        if let Some(date) = moved {
            self.select_date(date);
        }
    }

    // --- mutations --------------------------------------------------------

    /// Validate and commit the open form. On success the store is saved and
    /// the form closes; on failure the error shows inline and the form
    /// stays open.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match form.build_record() {
            Ok(record) => {
                let date = record.date_value();
                let edited = form.editing_id.is_some();
                if edited {
                    self.store.update(record);
                } else {
                    self.store.add(record);
                }
                self.store.save();
                if let Some(date) = date {
                    self.ui.selected_date = date;
                }
                self.form = None;
                self.ui.mode = Mode::View;
                self.clamp_list_selection();
                self.set_status_message(if edited {
                    "Schedule updated".to_string()
                } else {
                    "Schedule added".to_string()
                });
            }
            Err(message) => {
                form.error = Some(message);
            }
        }
    }

    pub fn request_delete(&mut self) {
        if let Some(record) = self.current_record() {
            self.modals.delete_confirmation = Some(record);
            self.modals.delete_modal_selection = 0;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(record) = self.modals.delete_confirmation.take() {
            if self.store.remove(&record.id) {
                self.store.save();
                self.set_status_message(format!("Deleted: {}", record.title));
            }
            self.clamp_list_selection();
        }
    }

    pub fn toggle_completed(&mut self) {
        if let Some(mut record) = self.current_record() {
            record.is_completed = !record.is_completed;
            let done = record.is_completed;
            if self.store.update(record) {
                self.store.save();
                self.set_status_message(if done {
                    "Marked as done".to_string()
                } else {
                    "Marked as not done".to_string()
                });
            }
        }
    }

    /// Persist the SNS template and hashtag slots from the editors.
    pub fn save_sns(&mut self) {
        self.store.save_template(&self.sns.template.to_string());
        self.store.save_hashtags(&self.sns.hashtags.to_string());
    }

    /// Post text for a record using the live template/hashtag editors.
    pub fn post_text(&self, record: &ScheduleRecord) -> String {
        crate::template::render_post(
            record,
            &self.sns.template.to_string(),
            &self.sns.hashtags.to_string(),
        )
    }

    // --- status messages --------------------------------------------------

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_SECS {
                self.status.message = None;
                self.status.message_time = None;
            }
        }
    }
}

fn step_index(index: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if down {
        (index + 1).min(len - 1)
    } else {
        index.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_records(dates: &[&str]) -> App {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ScheduleStore::open(dir.path().to_path_buf());
        for (i, date) in dates.iter().enumerate() {
            store.add(ScheduleRecord::new(
                &format!("r{i}"),
                utils::parse_date(date).unwrap(),
                None,
                "",
                "",
                "",
            ));
        }
        // tempdir is dropped here; the store only touches disk on save
        App::new(Config::default(), store)
    }

    #[test]
    fn form_rejects_empty_title_and_bad_date() {
        let mut form = ScheduleForm::blank(utils::today());
        assert_eq!(form.build_record().unwrap_err(), "Title is required");

        form.title = Editor::from_string("t");
        form.date = Editor::from_string("not a date");
        assert!(form.build_record().unwrap_err().contains("YYYY-MM-DD"));
    }

    #[test]
    fn form_edit_keeps_id_and_completion() {
        let record = {
            let mut r = ScheduleRecord::new(
                "t",
                utils::parse_date("2025-08-22").unwrap(),
                Some("20:00"),
                "c",
                "p",
                "",
            );
            r.is_completed = true;
            r
        };
        let form = ScheduleForm::for_record(&record);
        let rebuilt = form.build_record().unwrap();
        assert_eq!(rebuilt.id, record.id);
        assert!(rebuilt.is_completed);
        assert_eq!(rebuilt.time, "20:00");
    }

    #[test]
    fn form_time_undecided_produces_the_sentinel() {
        let mut form = ScheduleForm::blank(utils::parse_date("2025-08-22").unwrap());
        form.title = Editor::from_string("t");
        form.time_undecided = true;
        let record = form.build_record().unwrap();
        assert_eq!(record.time, crate::models::UNDECIDED);
    }

    #[test]
    fn list_selection_clamps_after_scope_change() {
        let mut app = app_with_records(&["2025-08-01", "2025-08-02", "2025-08-03"]);
        app.ui.list_scope = ListScope::All;
        app.ui.list_index = 2;
        app.select_date(utils::parse_date("2025-08-01").unwrap());
        app.ui.list_scope = ListScope::Day;
        app.clamp_list_selection();
        assert_eq!(app.ui.list_index, 0);
    }

    #[test]
    fn move_period_respects_the_view_mode() {
        let mut app = app_with_records(&[]);
        app.select_date(utils::parse_date("2025-08-22").unwrap());

        app.ui.view_mode = ViewMode::Day;
        app.move_period(true);
        assert_eq!(app.ui.selected_date, utils::parse_date("2025-08-23").unwrap());

        app.ui.view_mode = ViewMode::Week;
        app.move_period(false);
        assert_eq!(app.ui.selected_date, utils::parse_date("2025-08-16").unwrap());

        app.ui.view_mode = ViewMode::Month;
        app.move_period(true);
        assert_eq!(app.ui.selected_date, utils::parse_date("2025-09-16").unwrap());
    }

    #[test]
    fn submit_form_adds_and_selects_the_record_date() {
        let mut app = app_with_records(&[]);
        let mut form = ScheduleForm::blank(utils::parse_date("2025-08-22").unwrap());
        form.title = Editor::from_string("歌枠");
        app.form = Some(form);
        app.ui.mode = Mode::Form;

        app.submit_form();
        assert!(app.form.is_none());
        assert_eq!(app.ui.mode, Mode::View);
        assert_eq!(app.store.records().len(), 1);
        assert_eq!(app.ui.selected_date, utils::parse_date("2025-08-22").unwrap());
    }

    #[test]
    fn submit_form_with_error_stays_open() {
        let mut app = app_with_records(&[]);
        app.form = Some(ScheduleForm::blank(utils::today()));
        app.ui.mode = Mode::Form;
        app.submit_form();
        assert!(app.form.as_ref().unwrap().error.is_some());
        assert!(app.store.records().is_empty());
    }
}
