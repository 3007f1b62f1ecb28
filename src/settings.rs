//! Game settings
//!
//! Read once at startup from JSON embedded in the page (the canvas
//! `data-settings` attribute). Nothing is written back.

use serde::{Deserialize, Serialize};

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Visuals ===
    /// Skip the tumble rotation while falling
    pub reduced_motion: bool,
    /// Number of hex tiles scattered on the platform
    pub hex_tiles: usize,
    /// Seed for decoration placement (None = time-based)
    pub decoration_seed: Option<u64>,

    // === Controls ===
    /// Show the on-screen joystick even on wide screens
    pub always_show_joystick: bool,

    // === Diagnostics ===
    /// `log` level filter name ("error" .. "trace")
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
            hex_tiles: 15,
            decoration_seed: None,

            always_show_joystick: false,

            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Parse if present, falling back to defaults on bad input
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json {
            Some(json) => match Self::from_json(json) {
                Ok(settings) => {
                    log::info!("Loaded settings from page");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring invalid settings: {}", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Effective cue volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"muted": true, "hex_tiles": 4}"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.hex_tiles, 4);
        assert_eq!(settings.master_volume, 0.8);
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_volumes_are_clamped() {
        let settings = Settings::from_json(r#"{"master_volume": 3.0, "sfx_volume": -1}"#).unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        assert_eq!(Settings::from_json_or_default(Some("nope")), Settings::default());
        assert_eq!(Settings::from_json_or_default(None), Settings::default());
    }

    #[test]
    fn test_log_level() {
        let settings = Settings::from_json(r#"{"log_level": "debug"}"#).unwrap();
        assert_eq!(settings.log_level(), log::LevelFilter::Debug);
        let settings = Settings::from_json(r#"{"log_level": "loud"}"#).unwrap();
        assert_eq!(settings.log_level(), log::LevelFilter::Info);
    }
}
