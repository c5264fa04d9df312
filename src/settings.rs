// UI settings persistence
//
// Only the theme preference for now, stored as JSON under the platform
// config directory. The downloader core does not read any of this.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default)]
    pub theme: Theme,
}

fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("videoleech").join("settings.json"))
}

/// Load settings, falling back to defaults when the file is missing or
/// unreadable. A corrupt file is not an error the user can act on.
pub fn load() -> UiSettings {
    let Some(path) = settings_path() else {
        return UiSettings::default();
    };
    match fs::read_to_string(&path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            eprintln!("[Settings] Ignoring corrupt {}: {}", path.display(), e);
            UiSettings::default()
        }),
        Err(_) => UiSettings::default(),
    }
}

pub fn save(settings: &UiSettings) -> Result<(), String> {
    let path = settings_path().ok_or_else(|| "No config directory available".to_string())?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
    fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}
