//! SNS post rendering.
//!
//! A post is produced from a record, a user-editable template and a
//! favorite-hashtags line. Templates use `${ name }` placeholders (optional
//! whitespace inside the braces); unknown placeholders pass through
//! untouched, so rendering never fails.

use chrono::NaiveDate;

use crate::models::{ScheduleRecord, UNDECIDED};

/// Fixed tag substituted for the `hashtag_vtuber` placeholder.
pub const HASHTAG_VTUBER: &str = "#Vtuber";

/// Rendered in place of an empty notes field ("nothing in particular").
const NOTES_FALLBACK: &str = "特になし";

/// Suffix after a concrete start time ("starting at").
const TIME_SUFFIX: char = '～';

/// Render the post text for a record: placeholder substitution, then the
/// favorite-tags line when at least one tag qualifies.
pub fn render_post(record: &ScheduleRecord, template: &str, favorite_tags: &str) -> String {
    let mut text = substitute(template, record);
    if let Some(tags) = favorite_tag_line(favorite_tags) {
        text.push('\n');
        text.push_str(&tags);
    }
    text
}

/// Share-intent URL for the given post text.
pub fn share_url(text: &str) -> String {
    format!(
        "https://twitter.com/intent/tweet?text={}",
        urlencoding::encode(text)
    )
}

/// How the `time` placeholder renders: the undecided word, or `HH:MM～`.
pub fn display_time(time: &str) -> String {
    if time.trim().is_empty() || time == UNDECIDED {
        UNDECIDED.to_string()
    } else {
        format!("{}{}", time, TIME_SUFFIX)
    }
}

/// One pass over the fixed `${ name }` token grammar. Tokens with an unknown
/// name, or a `${` with no closing brace, are copied through verbatim.
fn substitute(template: &str, record: &ScheduleRecord) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = after[..end].trim();
                match placeholder_value(name, record) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

fn placeholder_value(name: &str, record: &ScheduleRecord) -> Option<String> {
    match name {
        "title" => Some(record.title.clone()),
        "date" => Some(display_date(&record.date)),
        "time" => Some(display_time(&record.time)),
        "category" => Some(record.category.clone()),
        "notes" => Some(if record.notes.is_empty() {
            NOTES_FALLBACK.to_string()
        } else {
            record.notes.clone()
        }),
        "platform" => Some(record.platform.clone()),
        "hashtag_title" => Some(record.title.chars().filter(|c| !c.is_whitespace()).collect()),
        "hashtag_vtuber" => Some(HASHTAG_VTUBER.to_string()),
        _ => None,
    }
}

fn display_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Filter the favorite-hashtags input down to the line appended to posts:
/// space-separated tokens starting with `#` and longer than the `#` alone.
/// `None` when nothing qualifies.
fn favorite_tag_line(input: &str) -> Option<String> {
    let kept: Vec<&str> = input
        .split(' ')
        .filter(|tag| tag.starts_with('#') && tag.chars().count() > 1)
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> ScheduleRecord {
        ScheduleRecord::new(
            "Live Show",
            NaiveDate::from_ymd_opt(2025, 8, 22).unwrap(),
            Some("20:00"),
            "歌枠",
            "Youtube",
            "",
        )
    }

    #[test]
    fn concrete_time_gets_wave_dash_suffix() {
        assert_eq!(render_post(&record(), "${time}", ""), "20:00～");
    }

    #[test]
    fn undecided_and_blank_time_render_the_sentinel() {
        let mut r = record();
        r.time = UNDECIDED.to_string();
        assert_eq!(render_post(&r, "${time}", ""), UNDECIDED);
        r.time = String::new();
        assert_eq!(render_post(&r, "${time}", ""), UNDECIDED);
    }

    #[test]
    fn rendering_is_identity_without_placeholders() {
        let template = "no tokens here, not even ${unknown} ones resolve";
        assert_eq!(render_post(&record(), template, ""), template);
    }

    #[test]
    fn hashtag_title_strips_all_whitespace() {
        assert_eq!(render_post(&record(), "#${hashtag_title}", ""), "#LiveShow");
    }

    #[test]
    fn whitespace_inside_braces_is_allowed() {
        assert_eq!(render_post(&record(), "${ title }/${  category}", ""), "Live Show/歌枠");
    }

    #[test]
    fn unterminated_token_passes_through() {
        assert_eq!(render_post(&record(), "tail ${title", ""), "tail ${title");
    }

    #[test]
    fn empty_notes_render_the_fallback_phrase() {
        assert_eq!(render_post(&record(), "${notes}", ""), "特になし");
        let mut r = record();
        r.notes = "コラボ回".to_string();
        assert_eq!(render_post(&r, "${notes}", ""), "コラボ回");
    }

    #[test]
    fn favorite_tags_are_filtered_and_appended_as_one_line() {
        let out = render_post(&record(), "body", "#a #b bad #c#d x");
        assert_eq!(out, "body\n#a #b #c#d");
    }

    #[test]
    fn no_qualifying_tags_appends_nothing() {
        assert_eq!(render_post(&record(), "body", "bad x #"), "body");
        assert_eq!(render_post(&record(), "body", ""), "body");
    }

    #[test]
    fn full_default_template_renders() {
        let out = render_post(
            &record(),
            crate::store::DEFAULT_SNS_TEMPLATE,
            "#新人Vtuber",
        );
        assert!(out.contains("📢【Live Show】配信のお知らせ📢"));
        assert!(out.contains("🗓️日時: 2025-08-22 20:00～"));
        assert!(out.contains("📍場所: Youtube"));
        assert!(out.contains("📝内容: 特になし"));
        assert!(out.contains("#LiveShow"));
        assert!(out.contains("#Vtuber"));
        assert!(out.ends_with("#新人Vtuber"));
    }

    #[test]
    fn share_url_percent_encodes_the_text() {
        let url = share_url("a b\n#tag");
        assert_eq!(
            url,
            "https://twitter.com/intent/tweet?text=a%20b%0A%23tag"
        );
    }
}
