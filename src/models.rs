use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder value for fields the user has left undecided.
///
/// The sentinel is part of the persisted data and of the rendered post text,
/// so it stays in the display locale rather than being translated.
pub const UNDECIDED: &str = "未定";

/// One scheduled event. Serialized as a JSON object inside the records slot;
/// the wire field names (`isCompleted`) are part of the persisted format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub id: String,
    #[serde(default = "undecided")]
    pub title: String,
    pub date: String, // ISO 8601: YYYY-MM-DD
    #[serde(default = "undecided")]
    pub time: String, // HH:MM, or the undecided sentinel
    #[serde(default = "undecided")]
    pub category: String,
    #[serde(default = "undecided")]
    pub platform: String,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
}

fn undecided() -> String {
    UNDECIDED.to_string()
}

fn or_undecided(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNDECIDED.to_string()
    } else {
        trimmed.to_string()
    }
}

impl ScheduleRecord {
    /// Create a record from raw user input, minting a fresh id and applying
    /// the defaulting rules: empty title/category/platform become the
    /// undecided sentinel, absent or blank time becomes the sentinel.
    pub fn new(
        title: &str,
        date: NaiveDate,
        time: Option<&str>,
        category: &str,
        platform: &str,
        notes: &str,
    ) -> Self {
        let time = match time {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => UNDECIDED.to_string(),
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: or_undecided(title),
            date: date.format("%Y-%m-%d").to_string(),
            time,
            category: or_undecided(category),
            platform: or_undecided(platform),
            notes: notes.to_string(),
            is_completed: false,
        }
    }

    /// Parse the stored date string. Stored records always carry a valid
    /// date; `None` only appears for hand-edited data.
    pub fn date_value(&self) -> Option<NaiveDate> {
        crate::utils::parse_date(&self.date).ok()
    }

    /// Whether the time field holds the undecided sentinel (or is blank).
    pub fn time_is_undecided(&self) -> bool {
        self.time.trim().is_empty() || self.time == UNDECIDED
    }

    /// Repair fields after deserialization: blank time collapses to the
    /// undecided sentinel so the rest of the app only sees the two shapes
    /// the model allows.
    pub fn normalize(&mut self) {
        if self.time.trim().is_empty() {
            self.time = UNDECIDED.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 22).unwrap()
    }

    #[test]
    fn new_applies_undecided_defaults() {
        let record = ScheduleRecord::new("", day(), None, "", "", "");
        assert_eq!(record.title, UNDECIDED);
        assert_eq!(record.time, UNDECIDED);
        assert_eq!(record.category, UNDECIDED);
        assert_eq!(record.platform, UNDECIDED);
        assert_eq!(record.notes, "");
        assert!(!record.is_completed);
    }

    #[test]
    fn new_keeps_concrete_values() {
        let record = ScheduleRecord::new("歌枠", day(), Some("20:00"), "配信", "Youtube", "初見歓迎");
        assert_eq!(record.date, "2025-08-22");
        assert_eq!(record.time, "20:00");
        assert!(!record.time_is_undecided());
    }

    #[test]
    fn blank_time_counts_as_undecided() {
        let record = ScheduleRecord::new("t", day(), Some("   "), "c", "p", "");
        assert_eq!(record.time, UNDECIDED);
        assert!(record.time_is_undecided());
    }

    #[test]
    fn ids_are_unique() {
        let a = ScheduleRecord::new("a", day(), None, "", "", "");
        let b = ScheduleRecord::new("a", day(), None, "", "", "");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn wire_format_uses_camel_case_completed_flag() {
        let record = ScheduleRecord::new("t", day(), Some("19:00"), "c", "p", "n");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"isCompleted\":false"));

        let parsed: ScheduleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn missing_optional_fields_fall_back() {
        let json = r#"{"id":"x","date":"2025-01-02"}"#;
        let record: ScheduleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, UNDECIDED);
        assert_eq!(record.time, UNDECIDED);
        assert_eq!(record.notes, "");
        assert!(!record.is_completed);
    }
}
