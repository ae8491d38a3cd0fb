//! Pure calendar queries over a record collection.
//!
//! Everything here is referentially transparent: callers pass the record
//! slice and get fresh vectors back; nothing caches and nothing mutates
//! stored order. Weeks start on Sunday.

use chrono::{Datelike, Days, NaiveDate};

use crate::models::ScheduleRecord;

/// Records whose date equals the given calendar day, input order preserved.
pub fn filter_by_day(records: &[ScheduleRecord], date: NaiveDate) -> Vec<ScheduleRecord> {
    records
        .iter()
        .filter(|r| r.date_value() == Some(date))
        .cloned()
        .collect()
}

/// A new sequence ordered by date ascending; ties keep input order.
pub fn sort_by_date_ascending(records: &[ScheduleRecord]) -> Vec<ScheduleRecord> {
    let mut sorted = records.to_vec();
    // Vec::sort_by_key is stable; unparseable dates sink to the end
    sorted.sort_by_key(|r| r.date_value().unwrap_or(NaiveDate::MAX));
    sorted
}

/// The Sunday on or before the given date.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// Bucket records into the 7-day window starting on the Sunday on/before
/// `anchor`, indexed 0 = Sunday .. 6 = Saturday.
pub fn filter_by_week(records: &[ScheduleRecord], anchor: NaiveDate) -> [Vec<ScheduleRecord>; 7] {
    let start = week_start(anchor);
    let mut buckets: [Vec<ScheduleRecord>; 7] = Default::default();
    for record in records {
        if let Some(date) = record.date_value() {
            let offset = (date - start).num_days();
            if (0..7).contains(&offset) {
                buckets[offset as usize].push(record.clone());
            }
        }
    }
    buckets
}

/// The Sunday-aligned week rows covering the month of `anchor`: the first
/// row starts on the Sunday on/before the 1st, the last row ends on the
/// Saturday on/after the month's last day.
pub fn month_grid(anchor: NaiveDate) -> Vec<[NaiveDate; 7]> {
    let first = anchor.with_day(1).unwrap_or(anchor);
    let last = last_day_of_month(first);
    let end = week_start(last) + Days::new(6);

    let mut rows = Vec::new();
    let mut day = week_start(first);
    while day <= end {
        let mut row = [day; 7];
        for slot in row.iter_mut() {
            *slot = day;
            day = day + Days::new(1);
        }
        rows.push(row);
    }
    rows
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|next_first| next_first - Days::new(1))
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, date: &str) -> ScheduleRecord {
        ScheduleRecord::new(
            title,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            None,
            "配信",
            "Youtube",
            "",
        )
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn filter_by_day_partitions_the_collection() {
        // 100 records spread over 10 distinct dates
        let mut records = Vec::new();
        for i in 0..100 {
            let date = format!("2025-08-{:02}", (i % 10) + 1);
            records.push(record(&format!("r{i}"), &date));
        }

        let mut total = 0;
        for day in 1..=10 {
            let subset = filter_by_day(&records, ymd(2025, 8, day));
            assert_eq!(subset.len(), 10);
            assert!(subset.iter().all(|r| r.date == format!("2025-08-{day:02}")));
            total += subset.len();
        }
        assert_eq!(total, 100);
    }

    #[test]
    fn sort_is_stable_on_equal_dates() {
        let records = vec![
            record("second day", "2025-08-02"),
            record("first of the pair", "2025-08-01"),
            record("second of the pair", "2025-08-01"),
        ];
        let sorted = sort_by_date_ascending(&records);
        assert_eq!(sorted[0].title, "first of the pair");
        assert_eq!(sorted[1].title, "second of the pair");
        assert_eq!(sorted[2].title, "second day");
    }

    #[test]
    fn week_start_is_the_sunday_on_or_before() {
        // 2025-08-22 is a Friday; the preceding Sunday is 2025-08-17
        assert_eq!(week_start(ymd(2025, 8, 22)), ymd(2025, 8, 17));
        // A Sunday is its own week start
        assert_eq!(week_start(ymd(2025, 8, 17)), ymd(2025, 8, 17));
    }

    #[test]
    fn filter_by_week_buckets_by_weekday_index() {
        let records = vec![
            record("sun", "2025-08-17"),
            record("fri", "2025-08-22"),
            record("sat", "2025-08-23"),
            record("next sun", "2025-08-24"), // outside the window
            record("prev sat", "2025-08-16"), // outside the window
        ];
        let buckets = filter_by_week(&records, ymd(2025, 8, 20));
        assert_eq!(buckets[0].len(), 1);
        assert_eq!(buckets[0][0].title, "sun");
        assert_eq!(buckets[5][0].title, "fri");
        assert_eq!(buckets[6][0].title, "sat");
        let total: usize = buckets.iter().map(Vec::len).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn month_grid_rows_are_sunday_aligned_and_cover_the_month() {
        let grid = month_grid(ymd(2025, 8, 22));
        // August 2025: Fri 1st .. Sun 31st, needs 6 Sunday-aligned rows
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0][0], ymd(2025, 7, 27));
        assert_eq!(grid[5][6], ymd(2025, 9, 6));
        for row in &grid {
            assert_eq!(row[0].weekday(), chrono::Weekday::Sun);
            for pair in row.windows(2) {
                assert_eq!(pair[1] - pair[0], chrono::Duration::days(1));
            }
        }
        // Every day of the month appears exactly once
        for day in 1..=31 {
            let date = ymd(2025, 8, day);
            let hits = grid.iter().flatten().filter(|&&d| d == date).count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn december_grid_crosses_the_year_boundary() {
        let grid = month_grid(ymd(2025, 12, 15));
        assert_eq!(grid[0][0], ymd(2025, 11, 30));
        assert_eq!(grid.last().unwrap()[6], ymd(2026, 1, 3));
    }
}
