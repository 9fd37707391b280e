//! Runtime settings
//!
//! Stored as JSON next to the game; missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SettingsError;
use crate::consts::TICK_INTERVAL_MS;

/// Simulation and presentation preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sleep between simulation ticks (milliseconds)
    pub tick_interval_ms: u64,
    /// Render only the newest frame when presentation falls behind
    pub coalesce_frames: bool,
    /// Show FPS counter on the HUD
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            coalesce_frames: true,
            show_fps: true,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "tick_interval_ms": 8 }"#).unwrap();
        assert_eq!(settings.tick_interval_ms, 8);
        assert!(settings.coalesce_frames);
        assert!(settings.show_fps);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/pegasus-settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ \"show_fps\": \"yes\" }"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("pegasus-settings-{}.json", std::process::id()));
        let settings = Settings {
            tick_interval_ms: 20,
            coalesce_frames: false,
            show_fps: false,
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
        let _ = std::fs::remove_file(&path);
    }
}
