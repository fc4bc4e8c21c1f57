//! Runner settings
//!
//! Persisted as JSON next to the scenarios; unreadable files fall back to
//! defaults with a warning.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::sim::Stepper;

/// Timestep preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimestepPreset {
    Coarse,
    #[default]
    Standard,
    Fine,
}

impl TimestepPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestepPreset::Coarse => "Coarse",
            TimestepPreset::Standard => "Standard",
            TimestepPreset::Fine => "Fine",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "coarse" | "low" => Some(TimestepPreset::Coarse),
            "standard" | "std" => Some(TimestepPreset::Standard),
            "fine" | "high" => Some(TimestepPreset::Fine),
            _ => None,
        }
    }

    /// Simulation rate in Hz
    pub fn rate(&self) -> u32 {
        match self {
            TimestepPreset::Coarse => 30,
            TimestepPreset::Standard => 60,
            TimestepPreset::Fine => 120,
        }
    }

    /// Fixed step length in seconds
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.rate())
    }
}

/// Runner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Timestep preset
    pub preset: TimestepPreset,
    /// Explicit fixed step, overrides the preset
    pub dt: Option<f64>,
    /// Cap on fixed steps per frame
    pub max_substeps: u32,
    /// Longest frame delta accepted (seconds)
    pub max_frame_dt: f64,
    /// Log a status line every N frames (0 = never)
    pub log_every: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: TimestepPreset::Standard,
            dt: None,
            max_substeps: MAX_SUBSTEPS,
            max_frame_dt: MAX_FRAME_DT,
            log_every: 60,
        }
    }
}

impl Settings {
    /// Create settings from a preset
    pub fn from_preset(preset: TimestepPreset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    /// Effective fixed step (override or preset)
    pub fn effective_dt(&self) -> f64 {
        match self.dt {
            Some(dt) if dt > 0.0 => dt,
            _ => self.preset.dt(),
        }
    }

    /// Build a stepper configured from these settings
    pub fn stepper(&self) -> Stepper {
        Stepper::with_limits(
            self.effective_dt(),
            self.max_substeps.max(1),
            self.max_frame_dt,
        )
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Invalid settings in {}: {e}", path.display()),
            },
            Err(e) => log::warn!("Cannot read settings {}: {e}", path.display()),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_preset_round_trip_names() {
        for preset in [TimestepPreset::Coarse, TimestepPreset::Standard, TimestepPreset::Fine] {
            assert_eq!(TimestepPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(TimestepPreset::from_str("high"), Some(TimestepPreset::Fine));
        assert_eq!(TimestepPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_effective_dt() {
        let mut settings = Settings::from_preset(TimestepPreset::Fine);
        assert_relative_eq!(settings.effective_dt(), 1.0 / 120.0);
        settings.dt = Some(0.002);
        assert_relative_eq!(settings.effective_dt(), 0.002);
        settings.dt = Some(-1.0);
        assert_relative_eq!(settings.effective_dt(), 1.0 / 120.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json_str(r#"{ "preset": "Coarse", "log_every": 0 }"#).unwrap();
        assert_eq!(settings.preset, TimestepPreset::Coarse);
        assert_eq!(settings.log_every, 0);
        assert_eq!(settings.max_substeps, MAX_SUBSTEPS);
        assert!(settings.dt.is_none());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/nonexistent/arcade-physics/settings.json"));
        assert_eq!(settings.preset, TimestepPreset::Standard);
    }

    #[test]
    fn test_stepper_from_settings() {
        let settings = Settings::from_preset(TimestepPreset::Coarse);
        let stepper = settings.stepper();
        assert_relative_eq!(stepper.dt(), 1.0 / 30.0);
    }
}
