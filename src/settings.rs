//! Player settings and preferences
//!
//! Persisted in LocalStorage, separate from anything the gameplay core owns.

use serde::{Deserialize, Serialize};

use crate::consts::TILT_THRESHOLD_DEG;
use crate::sim::Orientation;

/// Lane layout preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayoutPreference {
    /// Detect from the device
    #[default]
    Auto,
    Vertical,
    Horizontal,
}

impl LayoutPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutPreference::Auto => "Auto",
            LayoutPreference::Vertical => "Vertical",
            LayoutPreference::Horizontal => "Horizontal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(LayoutPreference::Auto),
            "vertical" | "mobile" => Some(LayoutPreference::Vertical),
            "horizontal" | "desktop" => Some(LayoutPreference::Horizontal),
            _ => None,
        }
    }

    /// Resolve to a concrete orientation, using `detected` for Auto
    pub fn resolve(&self, detected: Orientation) -> Orientation {
        match self {
            LayoutPreference::Auto => detected,
            LayoutPreference::Vertical => Orientation::Vertical,
            LayoutPreference::Horizontal => Orientation::Horizontal,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutPreference,

    // === Controls ===
    /// Steer by tilting the device
    pub tilt_controls: bool,
    /// Tilt angle (degrees) needed to switch lanes
    pub tilt_threshold_deg: f32,

    // === Visual Effects ===
    /// Screen shake on answers
    pub screen_shake: bool,
    /// Particle bursts on answers
    pub particles: bool,

    // === HUD ===
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no particles)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: LayoutPreference::Auto,
            tilt_controls: true,
            tilt_threshold_deg: TILT_THRESHOLD_DEG,
            screen_shake: true,
            particles: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particles (respects reduced_motion)
    pub fn effective_particles(&self) -> bool {
        self.particles && !self.reduced_motion
    }

    /// Tilt threshold clamped to a usable range
    pub fn tilt_threshold(&self) -> f32 {
        self.tilt_threshold_deg.clamp(5.0, 60.0)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_drift_settings";

    /// Parse settings JSON, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
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
