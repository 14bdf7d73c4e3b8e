use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Reading settings from `{0}` failed with error: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Writing settings to `{0}` failed with error: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Settings file `{0}` is malformed: {1}")]
    Malformed(PathBuf, serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// UI preferences persisted as a small JSON document. The UI layer reads
/// these at construction/update time; nothing here is global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    pub font_size: u32,
    pub hotkeys: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            theme: Theme::Light,
            font_size: 18,
            hotkeys: HashMap::from([
                ("C".to_string(), "Escape".to_string()),
                ("⌫".to_string(), "BackSpace".to_string()),
                ("=".to_string(), "Return".to_string()),
            ]),
        }
    }
}

impl Settings {
    /// A missing file yields the defaults; a present but malformed file
    /// is an error rather than silently reset.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Settings::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| Error::Read(path.to_path_buf(), e))?;
        serde_json::from_str(&contents).map_err(|e| Error::Malformed(path.to_path_buf(), e))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Malformed(path.to_path_buf(), e))?;
        fs::write(path, contents).map_err(|e| Error::Write(path.to_path_buf(), e))
    }

    /// Parses the settings dialog's `"C:Escape, =:Return"` entry format.
    /// Pairs without a `:` are skipped.
    pub fn parse_hotkeys(raw: &str) -> HashMap<String, String> {
        raw.split(',')
            .filter_map(|pair| {
                let (key, binding) = pair.split_once(':')?;
                Some((key.trim().to_string(), binding.trim().to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_configuration() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.font_size, 18);
        assert_eq!(settings.hotkeys.get("="), Some(&"Return".to_string()));
    }

    #[test]
    fn json_round_trip() {
        let settings = Settings {
            theme: Theme::Dark,
            font_size: 24,
            hotkeys: HashMap::from([("C".to_string(), "Escape".to_string())]),
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"dark\""));
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = Settings::load("definitely_not_here.json").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn save_and_reload() {
        let path = std::env::temp_dir().join(format!(
            "multicalc_settings_test_{}.json",
            std::process::id()
        ));
        let mut settings = Settings::default();
        settings.theme = Theme::Dark;
        settings.save(&path).unwrap();

        let back = Settings::load(&path).unwrap();
        assert_eq!(back, settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn hotkey_string_parses_pairwise() {
        let hotkeys = Settings::parse_hotkeys("C:Escape, =:Return, garbage");
        assert_eq!(hotkeys.len(), 2);
        assert_eq!(hotkeys.get("C"), Some(&"Escape".to_string()));
        assert_eq!(hotkeys.get("="), Some(&"Return".to_string()));
    }
}
