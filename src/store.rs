use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

use crate::models::ScheduleRecord;

/// File names of the three persisted slots inside the storage directory.
pub const SCHEDULE_SLOT: &str = "schedule.json";
pub const TEMPLATE_SLOT: &str = "sns_template.txt";
pub const HASHTAGS_SLOT: &str = "favorite_hashtags.txt";

/// Post template used until the user saves their own.
pub const DEFAULT_SNS_TEMPLATE: &str = "📢【${title}】配信のお知らせ📢\n\n🗓️日時: ${date} ${time}\n📍場所: ${platform}\n📝内容: ${notes}\n\n#${hashtag_title}\n${hashtag_vtuber}";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create storage directory {0}: {1}")]
    Directory(String, #[source] io::Error),
    #[error("failed to write {0}: {1}")]
    Write(String, #[source] io::Error),
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Owner of the canonical record collection and its persisted mirror.
///
/// The mirror is rewritten in full on every save; collections are small
/// (tens to low hundreds of records). A missing, unreadable or unparsable
/// slot is a recovered condition: the store logs a diagnostic and carries on
/// with an empty (or in-memory) collection, never an error.
pub struct ScheduleStore {
    dir: PathBuf,
    records: Vec<ScheduleRecord>,
}

impl ScheduleStore {
    /// Open a store over the given storage directory and load the records
    /// slot into memory.
    pub fn open(dir: PathBuf) -> Self {
        let mut store = Self {
            dir,
            records: Vec::new(),
        };
        store.records = store.load();
        store
    }

    /// The canonical in-memory collection, in insertion order.
    pub fn records(&self) -> &[ScheduleRecord] {
        &self.records
    }

    /// Read the records slot. Missing slot, unavailable storage and
    /// malformed contents all yield an empty collection.
    pub fn load(&self) -> Vec<ScheduleRecord> {
        let Some(data) = self.read_slot(SCHEDULE_SLOT) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<ScheduleRecord>>(&data) {
            Ok(mut records) => {
                for record in &mut records {
                    record.normalize();
                }
                records
            }
            Err(e) => {
                warn!(slot = SCHEDULE_SLOT, error = %e, "persisted schedule is malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Serialize and overwrite the entire records slot. Storage failures are
    /// logged and swallowed; the in-memory collection stays authoritative.
    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            warn!(slot = SCHEDULE_SLOT, error = %e, "failed to persist schedule, keeping in-memory collection");
        }
    }

    fn try_save(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| StoreError::Directory(self.dir.display().to_string(), e))?;
        let json = serde_json::to_string_pretty(&self.records)?;
        let path = self.dir.join(SCHEDULE_SLOT);
        fs::write(&path, json).map_err(|e| StoreError::Write(path.display().to_string(), e))?;
        Ok(())
    }

    /// Append a record. The caller persists with `save` afterwards.
    pub fn add(&mut self, record: ScheduleRecord) {
        self.records.push(record);
    }

    /// Replace the record with a matching id. Returns false when no record
    /// has that id.
    pub fn update(&mut self, record: ScheduleRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Remove the record with the given id. Returns false when absent.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&ScheduleRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// The raw post template slot, or the built-in default when empty.
    pub fn load_template(&self) -> String {
        match self.read_slot(TEMPLATE_SLOT) {
            Some(template) if !template.is_empty() => template,
            _ => DEFAULT_SNS_TEMPLATE.to_string(),
        }
    }

    pub fn save_template(&self, template: &str) {
        self.write_slot(TEMPLATE_SLOT, template);
    }

    /// The raw favorite-hashtags slot (space-separated), empty when unset.
    pub fn load_hashtags(&self) -> String {
        self.read_slot(HASHTAGS_SLOT).unwrap_or_default()
    }

    pub fn save_hashtags(&self, hashtags: &str) {
        self.write_slot(HASHTAGS_SLOT, hashtags);
    }

    fn read_slot(&self, slot: &str) -> Option<String> {
        match fs::read_to_string(self.dir.join(slot)) {
            Ok(data) => Some(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(slot, error = %e, "storage unavailable, treating slot as empty");
                None
            }
        }
    }

    fn write_slot(&self, slot: &str, contents: &str) {
        let result = fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(self.dir.join(slot), contents));
        if let Err(e) = result {
            warn!(slot, error = %e, "failed to persist slot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(title: &str, date: &str) -> ScheduleRecord {
        ScheduleRecord::new(
            title,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            Some("20:00"),
            "配信",
            "Youtube",
            "",
        )
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ScheduleStore::open(dir.path().to_path_buf());
        store.add(record("歌枠", "2025-08-22"));
        store.add(record("コラボ", "2025-08-23"));
        store.save();

        let reopened = ScheduleStore::open(dir.path().to_path_buf());
        assert_eq!(reopened.records(), store.records());
    }

    #[test]
    fn load_missing_slot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScheduleStore::open(dir.path().join("never-created"));
        assert!(store.records().is_empty());
    }

    #[test]
    fn load_malformed_slot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SCHEDULE_SLOT), "{ not json ]").unwrap();
        let store = ScheduleStore::open(dir.path().to_path_buf());
        assert!(store.records().is_empty());
    }

    #[test]
    fn load_wrong_shape_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SCHEDULE_SLOT), r#"{"id":"not-an-array"}"#).unwrap();
        let store = ScheduleStore::open(dir.path().to_path_buf());
        assert!(store.records().is_empty());
    }

    #[test]
    fn load_normalizes_blank_time() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(SCHEDULE_SLOT),
            r#"[{"id":"a","title":"t","date":"2025-01-01","time":"","category":"c","platform":"p","notes":"","isCompleted":false}]"#,
        )
        .unwrap();
        let store = ScheduleStore::open(dir.path().to_path_buf());
        assert_eq!(store.records()[0].time, crate::models::UNDECIDED);
    }

    #[test]
    fn update_replaces_by_id_and_remove_drops() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ScheduleStore::open(dir.path().to_path_buf());
        store.add(record("before", "2025-08-22"));
        let id = store.records()[0].id.clone();

        let mut changed = store.records()[0].clone();
        changed.title = "after".to_string();
        assert!(store.update(changed));
        assert_eq!(store.records()[0].title, "after");

        let mut missing = store.records()[0].clone();
        missing.id = "no-such-id".to_string();
        assert!(!store.update(missing));

        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.records().is_empty());
    }

    #[test]
    fn template_slot_defaults_until_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScheduleStore::open(dir.path().to_path_buf());
        assert_eq!(store.load_template(), DEFAULT_SNS_TEMPLATE);
        assert_eq!(store.load_hashtags(), "");

        store.save_template("${title} @ ${time}");
        store.save_hashtags("#Vtuber #新人Vtuber");
        assert_eq!(store.load_template(), "${title} @ ${time}");
        assert_eq!(store.load_hashtags(), "#Vtuber #新人Vtuber");
    }
}
