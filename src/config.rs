use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_panel_width")]
    pub panel_width_percent: u16,
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,
    #[serde(default)]
    pub export_dir: Option<String>,
    #[serde(default = "default_open_share_url")]
    pub open_share_url: bool,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_post")]
    pub post: String,
    #[serde(default = "default_toggle_completed")]
    pub toggle_completed: String,
    #[serde(default = "default_today")]
    pub today: String,
    #[serde(default = "default_toggle_panel")]
    pub toggle_panel: String,
    #[serde(default = "default_toggle_scope")]
    pub toggle_scope: String,
    #[serde(default = "default_view_month")]
    pub view_month: String,
    #[serde(default = "default_view_week")]
    pub view_week: String,
    #[serde(default = "default_view_day")]
    pub view_day: String,
    #[serde(default = "default_prev_period")]
    pub prev_period: String,
    #[serde(default = "default_next_period")]
    pub next_period: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_select")]
    pub select: String,
    #[serde(default = "default_tab_1")]
    pub tab_1: String,
    #[serde(default = "default_tab_2")]
    pub tab_2: String,
    #[serde(default = "default_tab_3")]
    pub tab_3: String,
    #[serde(default = "default_toggle_card")]
    pub toggle_card: String,
    #[serde(default = "default_export_png")]
    pub export_png: String,
    #[serde(default = "default_export_jpeg")]
    pub export_jpeg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_tab_bg")]
    pub tab_bg: String,
    #[serde(default = "default_dim_fg")]
    pub dim_fg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            panel_width_percent: default_panel_width(),
            storage_dir: default_storage_dir(),
            export_dir: None,
            open_share_url: default_open_share_url(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            help: default_help(),
            new: default_new(),
            edit: default_edit(),
            delete: default_delete(),
            save: default_save(),
            post: default_post(),
            toggle_completed: default_toggle_completed(),
            today: default_today(),
            toggle_panel: default_toggle_panel(),
            toggle_scope: default_toggle_scope(),
            view_month: default_view_month(),
            view_week: default_view_week(),
            view_day: default_view_day(),
            prev_period: default_prev_period(),
            next_period: default_next_period(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            select: default_select(),
            tab_1: default_tab_1(),
            tab_2: default_tab_2(),
            tab_3: default_tab_3(),
            toggle_card: default_toggle_card(),
            export_png: default_export_png(),
            export_jpeg: default_export_jpeg(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            tab_bg: default_tab_bg(),
            dim_fg: default_dim_fg(),
        }
    }
}

impl Theme {
    /// Preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert("default".to_string(), Theme::default());

        themes.insert(
            "dark".to_string(),
            Theme {
                fg: "white".to_string(),
                bg: "black".to_string(),
                highlight_bg: "cyan".to_string(),
                highlight_fg: "black".to_string(),
                tab_bg: "gray".to_string(),
                dim_fg: "darkgray".to_string(),
            },
        );

        themes.insert(
            "light".to_string(),
            Theme {
                fg: "black".to_string(),
                bg: "white".to_string(),
                highlight_bg: "blue".to_string(),
                highlight_fg: "white".to_string(),
                tab_bg: "gray".to_string(),
                dim_fg: "darkgray".to_string(),
            },
        );

        themes
    }
}

// Default value functions
fn default_panel_width() -> u16 {
    30
}

fn default_storage_dir() -> String {
    // Fallback only; the profile-aware path is set at load time
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.to_string_lossy().to_string()
    } else {
        "~/.local/share/sucal".to_string()
    }
}

fn default_open_share_url() -> bool {
    true
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_edit() -> String {
    "e".to_string()
}

fn default_delete() -> String {
    "x".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_post() -> String {
    "s".to_string()
}

fn default_toggle_completed() -> String {
    "Space".to_string()
}

fn default_today() -> String {
    "t".to_string()
}

fn default_toggle_panel() -> String {
    "b".to_string()
}

fn default_toggle_scope() -> String {
    "a".to_string()
}

fn default_view_month() -> String {
    "m".to_string()
}

fn default_view_week() -> String {
    "w".to_string()
}

fn default_view_day() -> String {
    "d".to_string()
}

fn default_prev_period() -> String {
    "PageUp".to_string()
}

fn default_next_period() -> String {
    "PageDown".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_select() -> String {
    "Enter".to_string()
}

fn default_tab_1() -> String {
    "1".to_string()
}

fn default_tab_2() -> String {
    "2".to_string()
}

fn default_tab_3() -> String {
    "3".to_string()
}

fn default_toggle_card() -> String {
    "c".to_string()
}

fn default_export_png() -> String {
    "p".to_string()
}

fn default_export_jpeg() -> String {
    "P".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_tab_bg() -> String {
    "gray".to_string()
}

fn default_dim_fg() -> String {
    "darkgray".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDir,
    #[error("failed to read config file: {0}")]
    Read(String),
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to write config file: {0}")]
    Write(String),
}

impl Config {
    /// Load configuration from file, or create the default if missing.
    /// The profile decides the config and storage directories.
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).map_err(|e| ConfigError::Read(e.to_string()))?;
            let mut config: Config = toml::from_str(&contents)?;

            // Storage dir follows the profile even if the config was edited
            config.storage_dir = Self::default_storage_dir_for_profile(profile);

            Ok(config)
        } else {
            let mut config = Config::default();
            config.storage_dir = Self::default_storage_dir_for_profile(profile);
            config.save_with_profile(profile)?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save_with_profile(&mut self, profile: utils::Profile) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        let config_path = Self::get_config_path(profile)?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write(e.to_string()))?;
        }

        let toml_string =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Write(e.to_string()))?;
        fs::write(&config_path, toml_string).map_err(|e| ConfigError::Write(e.to_string()))?;

        Ok(())
    }

    /// Path of the config file for a profile
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or(ConfigError::ConfigDir)?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_storage_dir_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/sucal-dev".to_string(),
                utils::Profile::Prod => "~/.local/share/sucal".to_string(),
            }
        }
    }

    /// Storage directory with `~` expansion
    pub fn get_storage_dir(&self) -> PathBuf {
        utils::expand_path(&self.storage_dir)
    }

    /// Directory exported cards are written to (falls back to the storage
    /// directory when unset)
    pub fn get_export_dir(&self) -> PathBuf {
        match self.export_dir.as_deref() {
            Some(dir) if !dir.trim().is_empty() => utils::expand_path(dir),
            _ => self.get_storage_dir(),
        }
    }

    /// The currently active theme (user-defined names win over presets)
    pub fn get_active_theme(&self) -> Theme {
        if let Some(theme) = self.themes.get(&self.current_theme) {
            theme.clone()
        } else if let Some(theme) = Theme::get_preset_themes().get(&self.current_theme) {
            theme.clone()
        } else {
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(parsed.panel_width_percent, config.panel_width_percent);
        assert_eq!(parsed.key_bindings.quit, "q");
        assert_eq!(parsed.config_version, Some(CURRENT_CONFIG_VERSION));
    }

    #[test]
    fn empty_toml_fills_every_default() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.current_theme, "default");
        assert!(parsed.open_share_url);
        assert_eq!(parsed.key_bindings.export_png, "p");
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let mut config = Config::default();
        config.current_theme = "no-such-theme".to_string();
        let theme = config.get_active_theme();
        assert_eq!(theme.fg, "white");
    }
}
