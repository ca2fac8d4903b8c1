//! Game settings and preferences
//!
//! Persisted in LocalStorage, separate from any session state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::scenario::Scenario;

/// Which world layout a new session starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayoutKind {
    /// The hand-placed three-platform maze
    #[default]
    Classic,
    /// A seeded random layout, different every session
    Random,
}

impl LayoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Classic => "Classic",
            LayoutKind::Random => "Random",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(LayoutKind::Classic),
            "random" | "rand" => Some(LayoutKind::Random),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// World layout for new sessions
    pub layout: LayoutKind,

    // === HUD ===
    /// Show the "Hits: n/limit" counter
    pub show_hud: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: LayoutKind::Classic,
            show_hud: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Layout for a new session sized to the canvas
    pub fn scenario(&self, seed: u64, bounds: Vec2) -> Scenario {
        let mut scenario = match self.layout {
            LayoutKind::Classic => Scenario::classic(),
            LayoutKind::Random => Scenario::random(seed, bounds),
        };
        scenario.fit_to(bounds);
        scenario
    }

    /// Pick up a `layout=` choice from a page query string such as
    /// `?layout=random`. Returns true when the stored settings changed.
    pub fn apply_query(&mut self, query: &str) -> bool {
        let chosen = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .filter(|(key, _)| *key == "layout")
            .find_map(|(_, value)| LayoutKind::from_str(value));

        match chosen {
            Some(layout) if layout != self.layout => {
                log::info!("Layout switched to {}", layout.as_str());
                self.layout = layout;
                true
            }
            _ => false,
        }
    }

    /// Effective sound effect volume
    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "split_brain_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
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

    /// Native runs have no LocalStorage
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
