//! Player preferences
//!
//! Persisted separately from the session in LocalStorage. The session itself is
//! never saved.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Rookie,
    #[default]
    Pro,
    AllStar,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Rookie => "Rookie",
            Difficulty::Pro => "Pro",
            Difficulty::AllStar => "All-Star",
        }
    }

    /// Case-insensitive name lookup
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rookie" | "easy" => Some(Difficulty::Rookie),
            "pro" | "normal" => Some(Difficulty::Pro),
            "all-star" | "allstar" | "hard" => Some(Difficulty::AllStar),
            _ => None,
        }
    }

    /// Multiplier on sampled pitch speeds
    pub fn speed_scale(&self) -> f32 {
        match self {
            Difficulty::Rookie => 0.85,
            Difficulty::Pro => 1.0,
            Difficulty::AllStar => 1.06,
        }
    }

    /// Fraction of pitches aimed in the zone
    pub fn strike_intent(&self) -> f32 {
        match self {
            Difficulty::Rookie => 0.8,
            Difficulty::Pro => 0.7,
            Difficulty::AllStar => 0.6,
        }
    }

    /// Multiplier on the contact radii
    pub fn contact_scale(&self) -> f32 {
        match self {
            Difficulty::Rookie => 1.25,
            Difficulty::Pro => 1.0,
            Difficulty::AllStar => 0.85,
        }
    }
}

/// Player settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Pitcher throws on a timer instead of waiting for a request
    pub auto_pitch: bool,
    /// Seconds between Idle and the automatic pitch
    pub auto_pitch_delay: f32,
    /// Show the debug readout (state, call, ball vectors)
    pub show_debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Pro,
            auto_pitch: false,
            auto_pitch_delay: 1.5,
            show_debug: false,
        }
    }
}

impl Settings {
    /// Apply preferences on top of a balance record
    pub fn apply(&self, tuning: &mut Tuning) {
        let d = self.difficulty;
        tuning.pitching.speed_scale = d.speed_scale();
        tuning.pitching.strike_intent = d.strike_intent();
        tuning.contact.max_radius *= d.contact_scale();
        tuning.contact.sweet_radius *= d.contact_scale();
        tuning.flow.auto_pitch = self.auto_pitch;
        tuning.flow.auto_pitch_delay = self.auto_pitch_delay.max(0.0);
    }

    /// Default tuning adjusted for these preferences
    pub fn tuning(&self) -> Tuning {
        let mut tuning = Tuning::default();
        self.apply(&mut tuning);
        tuning
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "batters_box_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
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
