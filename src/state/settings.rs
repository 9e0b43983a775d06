use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::loader::Delimiter;

/// Directory under the user's config dir that holds our settings.
pub const APP_DIR: &str = "justplot";
const SETTINGS_FILE: &str = "settings.json";

/// Persisted user preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory of the last successful open-file selection.
    pub last_dir: Option<PathBuf>,
    /// Field separator for loaded tables; `None` splits on whitespace.
    pub delimiter: Option<char>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::warn!("No config directory available, settings will not persist");
                Self::default()
            }
        }
    }

    /// Missing files yield defaults; unreadable ones are logged and ignored.
    pub fn load_from(path: &Path) -> Self {
        let mut settings = match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!("Failed to parse settings {:?}: {e}", path);
                    Settings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => {
                tracing::error!("Failed to read settings {:?}: {e}", path);
                Settings::default()
            }
        };
        settings.path = Some(path.to_path_buf());
        settings
    }

    pub fn delimiter(&self) -> Delimiter {
        Delimiter::from_setting(self.delimiter)
    }

    /// Remember the directory of a chosen file and persist it.
    pub fn remember_dir_of(&mut self, file: &Path) {
        if let Some(dir) = file.parent() {
            self.last_dir = Some(dir.to_path_buf());
            self.save();
        }
    }

    /// Write to the location this instance was loaded from. Failures are
    /// logged only.
    pub fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = self.save_to(path) {
            tracing::error!("Failed to save settings to {:?}: {e}", path);
        }
    }

    fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!("Settings saved to {:?}", path);
        Ok(())
    }
}
