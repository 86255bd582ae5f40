// User settings, kept next to the user's audio at <dir>/.clipkit/settings.json.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clip::DEFAULT_PITCH_WINDOW_MS;
use crate::error::Result;
use crate::shared::DEFAULT_FRAME_RATE;

const CLIPKIT_DIR: &str = ".clipkit";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_frame_rate: u32,
    pub note_fade_in_ms: u64,
    pub note_fade_out_ms: u64,
    pub pitch_window_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_frame_rate: DEFAULT_FRAME_RATE,
            note_fade_in_ms: 50,
            note_fade_out_ms: 100,
            pitch_window_ms: DEFAULT_PITCH_WINDOW_MS,
        }
    }
}

// <dir>/.clipkit/settings.json
pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join(CLIPKIT_DIR).join(SETTINGS_FILE)
}

/// Loads settings from `dir`. A missing file means defaults; a file that
/// exists but doesn't parse is an error.
pub fn load_settings(dir: &Path) -> Result<Settings> {
    let path = settings_path(dir);
    if !path.exists() {
        return Ok(Settings::default());
    }
    let data = std::fs::read_to_string(&path)?;
    let settings = serde_json::from_str(&data)?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

pub fn save_settings(dir: &Path, settings: &Settings) -> Result<()> {
    let path = settings_path(dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?; // create .clipkit/ if needed
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(&path, json)?;
    Ok(())
}
