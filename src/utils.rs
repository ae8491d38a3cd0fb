use chrono::{Datelike, NaiveDate};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "sucal-dev",
            Profile::Prod => "sucal",
        }
    }
}

/// Get the configuration directory path for sucal
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "sucal", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path (storage slots, log file, exported cards)
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "sucal", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
}

/// Today's date in the local time zone
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

const WEEKDAYS_JA: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// Single-character Japanese weekday label (日..土)
pub fn weekday_ja(date: NaiveDate) -> &'static str {
    WEEKDAYS_JA[date.weekday().num_days_from_sunday() as usize]
}

/// `2025年8月` — month heading as the calendar displays it
pub fn format_month_ja(date: NaiveDate) -> String {
    format!("{}年{}月", date.year(), date.month())
}

/// `8月22日 (金)` — day heading as the calendar displays it
pub fn format_day_ja(date: NaiveDate) -> String {
    format!("{}月{}日 ({})", date.month(), date.day(), weekday_ja(date))
}

/// `2025年8月22日 (金)` — full date for cards and headers
pub fn format_full_date_ja(date: NaiveDate) -> String {
    format!(
        "{}年{}月{}日 ({})",
        date.year(),
        date.month(),
        date.day(),
        weekday_ja(date)
    )
}

/// Parsed key binding information
#[derive(Debug, Clone)]
pub struct ParsedKeyBinding {
    pub key_code: crossterm::event::KeyCode,
    pub requires_ctrl: bool,
}

/// Check if a key event has the primary modifier (Ctrl on Windows/Linux,
/// Option/Alt on macOS, which terminals commonly deliver as Alt)
pub fn has_primary_modifier(modifiers: crossterm::event::KeyModifiers) -> bool {
    #[cfg(target_os = "macos")]
    {
        modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
            || modifiers.contains(crossterm::event::KeyModifiers::ALT)
    }

    #[cfg(not(target_os = "macos"))]
    {
        modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
    }
}

/// Format a key binding string for display, showing the platform-appropriate
/// modifier name
pub fn format_key_binding_for_display(key_binding: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        key_binding.replace("Ctrl+", "Opt+")
    }

    #[cfg(not(target_os = "macos"))]
    {
        key_binding.to_string()
    }
}

/// Parse a key binding string from config: single keys ("q", "n"), special
/// keys ("Enter", "PageUp", "F1") and the "Ctrl+" modifier prefix.
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();

    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        let key_code = parse_key_code(key_part)?;
        return Ok(ParsedKeyBinding {
            key_code,
            requires_ctrl: true,
        });
    }

    let key_code = parse_key_code(key_str)?;
    Ok(ParsedKeyBinding {
        key_code,
        requires_ctrl: false,
    })
}

fn parse_key_code(key_str: &str) -> Result<crossterm::event::KeyCode, String> {
    use crossterm::event::KeyCode;

    match key_str {
        "Enter" => return Ok(KeyCode::Enter),
        "Esc" | "Escape" => return Ok(KeyCode::Esc),
        "Backspace" => return Ok(KeyCode::Backspace),
        "Tab" => return Ok(KeyCode::Tab),
        "Space" | " " => return Ok(KeyCode::Char(' ')),
        "Left" => return Ok(KeyCode::Left),
        "Right" => return Ok(KeyCode::Right),
        "Up" => return Ok(KeyCode::Up),
        "Down" => return Ok(KeyCode::Down),
        "Home" => return Ok(KeyCode::Home),
        "End" => return Ok(KeyCode::End),
        "PageUp" => return Ok(KeyCode::PageUp),
        "PageDown" => return Ok(KeyCode::PageDown),
        "Delete" => return Ok(KeyCode::Delete),
        "Insert" => return Ok(KeyCode::Insert),
        _ => {}
    }

    // Function keys: F1 .. F12
    if let Some(n) = key_str.strip_prefix('F').and_then(|s| s.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(KeyCode::F(n));
        }
    }

    let mut chars = key_str.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(KeyCode::Char(c)),
        _ => Err(format!("Unknown key binding: {}", key_str)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn parses_plain_and_ctrl_bindings() {
        let plain = parse_key_binding("q").unwrap();
        assert_eq!(plain.key_code, KeyCode::Char('q'));
        assert!(!plain.requires_ctrl);

        let ctrl = parse_key_binding("Ctrl+s").unwrap();
        assert_eq!(ctrl.key_code, KeyCode::Char('s'));
        assert!(ctrl.requires_ctrl);
    }

    #[test]
    fn parses_special_and_function_keys() {
        assert_eq!(parse_key_binding("PageUp").unwrap().key_code, KeyCode::PageUp);
        assert_eq!(parse_key_binding("F1").unwrap().key_code, KeyCode::F(1));
        assert!(parse_key_binding("F13").is_err());
        assert!(parse_key_binding("NoSuchKey").is_err());
    }

    #[test]
    fn japanese_date_formatting() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 22).unwrap();
        assert_eq!(weekday_ja(date), "金");
        assert_eq!(format_month_ja(date), "2025年8月");
        assert_eq!(format_day_ja(date), "8月22日 (金)");
        assert_eq!(format_full_date_ja(date), "2025年8月22日 (金)");
    }
}
