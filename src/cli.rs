use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::export::{self, CardTemplate, ExportError, ImageFormat};
use crate::models::ScheduleRecord;
use crate::query;
use crate::store::ScheduleStore;
use crate::template;
use crate::utils;
use crate::Config;

#[derive(Parser)]
#[command(name = "sucal")]
#[command(about = "Schedule calendar for streamers - calendar TUI, SNS posts, schedule cards")]
#[command(version)]
pub struct Cli {
    /// Use development mode (separate dev config and storage)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive TUI (default if no subcommand)
    Tui,
    /// Quickly add a schedule entry
    Add {
        /// Entry title
        title: String,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Start time (HH:MM); omit for undecided
        #[arg(long)]
        time: Option<String>,
        /// Category (e.g. 配信, 歌枠, コラボ)
        #[arg(long)]
        category: Option<String>,
        /// Platform (e.g. Youtube, Twitch)
        #[arg(long)]
        platform: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List schedule entries for a day, or all of them
    List {
        /// Day to list (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// List every entry sorted by date instead
        #[arg(long)]
        all: bool,
    },
    /// Render the SNS post for an entry to stdout
    Post {
        /// Entry id (as shown by `list`)
        id: String,
    },
    /// Export a schedule card image for an entry
    Export {
        /// Entry id (as shown by `list`)
        id: String,
        #[arg(long, value_enum, default_value = "png")]
        format: ImageFormat,
        #[arg(long, value_enum, default_value = "minimal")]
        template: CardTemplate,
        /// Output path (defaults to the export directory)
        #[arg(long)]
        out: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    DateParse(String),
    #[error("invalid time '{0}': expected HH:MM")]
    TimeParse(String),
    #[error("no schedule entry with id {0}")]
    RecordNotFound(String),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// Handle the add command
pub fn handle_add(
    store: &mut ScheduleStore,
    title: String,
    date: String,
    time: Option<String>,
    category: Option<String>,
    platform: Option<String>,
    notes: Option<String>,
) -> Result<(), CliError> {
    let date = utils::parse_date(&date).map_err(|_| CliError::DateParse(date.clone()))?;
    if let Some(ref time) = time {
        validate_time(time)?;
    }

    let record = ScheduleRecord::new(
        &title,
        date,
        time.as_deref(),
        category.as_deref().unwrap_or(""),
        platform.as_deref().unwrap_or(""),
        notes.as_deref().unwrap_or(""),
    );
    let line = describe(&record);
    store.add(record);
    store.save();
    println!("Added {}", line);

    Ok(())
}

/// Handle the list command
pub fn handle_list(
    store: &ScheduleStore,
    date: Option<String>,
    all: bool,
) -> Result<(), CliError> {
    let records = if all {
        query::sort_by_date_ascending(store.records())
    } else {
        let day = match date {
            Some(date) => utils::parse_date(&date).map_err(|_| CliError::DateParse(date.clone()))?,
            None => utils::today(),
        };
        query::filter_by_day(store.records(), day)
    };

    if records.is_empty() {
        println!("No schedule entries.");
        return Ok(());
    }
    for record in &records {
        println!("{}", describe(record));
    }

    Ok(())
}

/// Handle the post command
pub fn handle_post(store: &ScheduleStore, id: String) -> Result<(), CliError> {
    let record = store
        .get(&id)
        .ok_or_else(|| CliError::RecordNotFound(id.clone()))?;
    let post = template::render_post(record, &store.load_template(), &store.load_hashtags());
    println!("{}", post);

    Ok(())
}

/// Handle the export command
pub fn handle_export(
    store: &ScheduleStore,
    config: &Config,
    id: String,
    format: ImageFormat,
    card: CardTemplate,
    out: Option<String>,
) -> Result<(), CliError> {
    let record = store
        .get(&id)
        .ok_or_else(|| CliError::RecordNotFound(id.clone()))?;

    let path = match out {
        Some(out) => utils::expand_path(&out),
        None => config.get_export_dir().join(export::default_file_name(format)),
    };
    export::export_card(record, card, format, &path)?;
    println!("Exported {} card to {}", card.as_str(), path.display());

    Ok(())
}

fn describe(record: &ScheduleRecord) -> String {
    let done = if record.is_completed { " [done]" } else { "" };
    format!(
        "{}  {} {}  {}  ({} / {}){}",
        record.id,
        record.date,
        record.time,
        record.title,
        record.category,
        record.platform,
        done,
    )
}

fn validate_time(time: &str) -> Result<(), CliError> {
    if time.trim().is_empty() || time == crate::models::UNDECIDED {
        return Ok(());
    }
    chrono::NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map(|_| ())
        .map_err(|_| CliError::TimeParse(time.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_bad_dates_and_times() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ScheduleStore::open(dir.path().to_path_buf());

        let err = handle_add(
            &mut store,
            "t".into(),
            "22-08-2025".into(),
            None,
            None,
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::DateParse(_)));

        let err = handle_add(
            &mut store,
            "t".into(),
            "2025-08-22".into(),
            Some("8pm".into()),
            None,
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::TimeParse(_)));
        assert!(store.records().is_empty());
    }

    #[test]
    fn add_persists_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ScheduleStore::open(dir.path().to_path_buf());
        handle_add(
            &mut store,
            "歌枠".into(),
            "2025-08-22".into(),
            None,
            None,
            None,
            None,
        )
        .unwrap();

        let reopened = ScheduleStore::open(dir.path().to_path_buf());
        assert_eq!(reopened.records().len(), 1);
        assert_eq!(reopened.records()[0].time, crate::models::UNDECIDED);
    }

    #[test]
    fn post_requires_an_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScheduleStore::open(dir.path().to_path_buf());
        let err = handle_post(&store, "missing".into()).unwrap_err();
        assert!(matches!(err, CliError::RecordNotFound(_)));
    }
}
