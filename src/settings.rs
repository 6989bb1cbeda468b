//! Viewer settings and preferences
//!
//! Persisted in LocalStorage, separate from anything the cinematic computes.

use serde::{Deserialize, Serialize};

use crate::cinematic::PauseMode;
use crate::terrain::TerrainConfig;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Terrain subdivisions per side for this preset
    pub fn terrain_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 128,
            QualityPreset::High => 256,
        }
    }

    /// Upper bound on the device pixel ratio used for the backbuffer
    pub fn max_pixel_ratio(&self) -> f64 {
        match self {
            QualityPreset::Low => 1.0,
            QualityPreset::Medium => 1.5,
            QualityPreset::High => 2.0,
        }
    }

    pub fn terrain_config(&self) -> TerrainConfig {
        TerrainConfig::with_segments(self.terrain_segments())
    }
}

/// Viewer settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// What pausing does to the loop phase
    pub pause_mode: PauseMode,
    /// Show the progress bar under the canvas
    pub show_progress: bool,
    /// Start playing as soon as the scene is mounted
    pub autoplay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            pause_mode: PauseMode::FreezeRendering,
            show_progress: true,
            autoplay: true,
        }
    }
}

impl Settings {
    /// Backbuffer pixel ratio, capped by the quality preset
    pub fn effective_pixel_ratio(&self, device_ratio: f64) -> f64 {
        device_ratio.clamp(1.0, self.quality.max_pixel_ratio())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "convoy_cinematic_settings";

    /// Parse stored settings, falling back to defaults on malformed JSON
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Apply `quality=` and `pause=` overrides from a URL query string
    ///
    /// Accepts the query with or without its leading `?`. Unknown keys are
    /// ignored and unknown values are logged and skipped. Returns whether any
    /// setting changed.
    pub fn apply_query(&mut self, query: &str) -> bool {
        let mut changed = false;
        let pairs = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='));

        for (key, value) in pairs {
            match key {
                "quality" => match QualityPreset::from_str(value) {
                    Some(quality) => {
                        changed |= self.quality != quality;
                        self.quality = quality;
                    }
                    None => log::warn!("Unknown quality preset '{}'", value),
                },
                "pause" => match PauseMode::from_str(value) {
                    Some(mode) => {
                        changed |= self.pause_mode != mode;
                        self.pause_mode = mode;
                    }
                    None => log::warn!("Unknown pause mode '{}'", value),
                },
                _ => {}
            }
        }
        changed
    }

    /// Load settings from LocalStorage, then apply URL overrides (WASM only)
    ///
    /// Overrides given in the page URL are saved so they stick on reload.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = web_sys::window();
        let storage = window
            .as_ref()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let mut settings = match storage.and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten()) {
            Some(json) => {
                log::info!("Loaded settings from LocalStorage");
                Self::from_json(&json)
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        };

        let query = window.and_then(|w| w.location().search().ok());
        if let Some(query) = query {
            if settings.apply_query(&query) {
                settings.save();
            }
        }
        settings
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_str() {
        assert_eq!(QualityPreset::from_str("LOW"), Some(QualityPreset::Low));
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_high_preset_matches_full_terrain() {
        assert_eq!(
            QualityPreset::High.terrain_config(),
            TerrainConfig::default()
        );
        assert_eq!(QualityPreset::Low.terrain_segments(), 64);
    }

    #[test]
    fn test_pixel_ratio_is_capped() {
        let settings = Settings {
            quality: QualityPreset::Low,
            ..Settings::default()
        };
        assert_eq!(settings.effective_pixel_ratio(3.0), 1.0);
        let settings = Settings::default();
        assert_eq!(settings.effective_pixel_ratio(3.0), 2.0);
        assert_eq!(settings.effective_pixel_ratio(0.5), 1.0);
    }

    #[test]
    fn test_json_roundtrip_and_partial() {
        let settings = Settings {
            pause_mode: PauseMode::FreezePhase,
            autoplay: false,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), settings);

        // Missing fields take their defaults
        let partial = Settings::from_json(r#"{"quality":"Low"}"#);
        assert_eq!(partial.quality, QualityPreset::Low);
        assert!(partial.autoplay);
    }

    #[test]
    fn test_query_overrides_quality_and_pause() {
        let mut settings = Settings::default();
        assert!(settings.apply_query("?quality=low&pause=phase"));
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.pause_mode, PauseMode::FreezePhase);

        // Same values again change nothing
        assert!(!settings.apply_query("quality=LOW&pause=freeze-phase"));
    }

    #[test]
    fn test_query_ignores_unknown_values() {
        let mut settings = Settings::default();
        assert!(!settings.apply_query("?quality=ultra&pause=&debug=1&flag"));
        assert!(!settings.apply_query(""));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert_eq!(Settings::from_json("{not json"), Settings::default());
    }
}
