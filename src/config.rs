/// Game settings
///
/// Loaded from a JSON file; any field left out takes its default.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{GAME_DURATION_SECS, MAX_ENEMIES, WAVE_PHASE_TICKS};
use crate::error::GameError;
use crate::geometry::Arena;

/// What happens when an enemy touches the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Wipe the run and return to the ship selector immediately.
    #[default]
    Reset,
    /// Freeze on a GAME OVER screen until the confirm key is pressed.
    GameOver,
}

/// How the physical directional keys map onto screen directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Upright,
    /// Remote held sideways: the pad is rotated 90° to the left.
    Sideways,
}

/// Feature switches for the external collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// When off, every ship is unlocked and no entitlement check runs.
    pub in_app_payments: bool,
    /// Off unless a voice channel is wired up.
    pub voice_commands: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            in_app_payments: false,
            voice_commands: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Length of a run in seconds.
    pub game_duration: u32,
    pub max_enemies: usize,
    /// Spawn ticks per difficulty tier.
    pub wave_phase_ticks: u32,
    pub collision_policy: CollisionPolicy,
    pub orientation: Orientation,
    pub features: FeatureFlags,
    /// Fixed RNG seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: 960.0,
            arena_height: 540.0,
            game_duration: GAME_DURATION_SECS,
            max_enemies: MAX_ENEMIES,
            wave_phase_ticks: WAVE_PHASE_TICKS,
            collision_policy: CollisionPolicy::Reset,
            orientation: Orientation::Upright,
            features: FeatureFlags::default(),
            seed: None,
        }
    }
}

impl Settings {
    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json).map_err(|source| GameError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Like [`Settings::load`], but a missing or broken file only logs.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }
}
