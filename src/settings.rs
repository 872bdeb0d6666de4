//! Board and physics settings
//!
//! Persisted as JSON (LocalStorage on web). Every field has a default, so a
//! partial document only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Board;

/// Physics constants that shape every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Per-tick velocity multiplier, in (0, 1]
    pub friction: f64,
    /// Bounce energy retention for walls and collisions, in [0, 1)
    pub restitution: f64,
    /// Velocity components below this are zeroed
    pub rest_threshold: f64,
    /// Added to the contact distance when testing overlaps
    pub collision_buffer: f64,
    /// Launch speeds above this are clamped
    pub max_strike_speed: f64,
    /// Ticks to wait after a win before resetting the round
    pub reset_delay_ticks: u32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            friction: FRICTION,
            restitution: RESTITUTION,
            rest_threshold: REST_THRESHOLD,
            collision_buffer: COLLISION_BUFFER,
            max_strike_speed: MAX_STRIKE_SPEED,
            reset_delay_ticks: ROUND_RESET_DELAY_TICKS,
        }
    }
}

impl PhysicsTuning {
    /// Replace any value that would break termination with its default.
    ///
    /// Friction and restitution must both stay below 1 (friction may equal 1
    /// only because the wall/collision losses and rest threshold still apply).
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        let mut tuning = self;

        if !(tuning.friction > 0.0 && tuning.friction <= 1.0) {
            log::warn!("Invalid friction {}, using {}", tuning.friction, defaults.friction);
            tuning.friction = defaults.friction;
        }
        if !(tuning.restitution >= 0.0 && tuning.restitution < 1.0) {
            log::warn!(
                "Invalid restitution {}, using {}",
                tuning.restitution,
                defaults.restitution
            );
            tuning.restitution = defaults.restitution;
        }
        if !(tuning.rest_threshold > 0.0 && tuning.rest_threshold.is_finite()) {
            log::warn!(
                "Invalid rest threshold {}, using {}",
                tuning.rest_threshold,
                defaults.rest_threshold
            );
            tuning.rest_threshold = defaults.rest_threshold;
        }
        if !(tuning.collision_buffer >= 0.0 && tuning.collision_buffer.is_finite()) {
            log::warn!(
                "Invalid collision buffer {}, using {}",
                tuning.collision_buffer,
                defaults.collision_buffer
            );
            tuning.collision_buffer = defaults.collision_buffer;
        }
        if !(tuning.max_strike_speed > 0.0 && tuning.max_strike_speed.is_finite()) {
            log::warn!(
                "Invalid max strike speed {}, using {}",
                tuning.max_strike_speed,
                defaults.max_strike_speed
            );
            tuning.max_strike_speed = defaults.max_strike_speed;
        }

        tuning
    }
}

/// Complete session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: Board,
    pub physics: PhysicsTuning,
}

impl Settings {
    /// Settings for a board of the given edge length with default physics
    pub fn for_board_size(size: f64) -> Self {
        Self {
            board: Board::scaled(size),
            physics: PhysicsTuning::default(),
        }
    }

    /// Parse settings from JSON; board and physics values are validated
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.board = settings.board.validated();
        settings.physics = settings.physics.validated();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "carrom_settings";

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
