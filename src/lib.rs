//! Meteor Patrol - a top-down arcade shooter simulation core
//!
//! Core modules:
//! - `entities`: plain data (player, enemies, bullets, ship selection)
//! - `compute`: pure per-tick motion and collision rules
//! - `waves` / `spawner`: difficulty tiers and enemy placement
//! - `state`: the authoritative game state container
//! - `input`: key codes to intents
//! - `scheduler`: the fixed-cadence update streams
//! - `session`: state + scheduler + RNG behind one handle

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod scheduler;
pub mod services;
pub mod session;
pub mod spawner;
pub mod state;
pub mod waves;

pub use config::Settings;
pub use error::GameError;
pub use session::Session;
pub use state::{GameState, Snapshot};

/// Gameplay constants, in screen units and milliseconds.
pub mod consts {
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const ENEMY_SIZE: f32 = 30.0;
    pub const BULLET_SIZE: f32 = 16.0;

    /// Player top speed per tick
    pub const MAX_SPEED: f32 = 10.0;
    /// Fraction of the gap to target velocity closed per tick while a key is held
    pub const ACCELERATION: f32 = 0.2;
    /// Velocity multiplier per tick with no key held on that axis
    pub const DECELERATION: f32 = 0.9;
    /// Velocities below this magnitude snap to zero
    pub const VELOCITY_EPSILON: f32 = 0.1;

    pub const BULLET_SPEED: f32 = 288.0;
    /// Per-tick scale applied to BULLET_SPEED
    pub const BULLET_STEP: f32 = 0.08;

    pub const NORMAL_ENEMY_SPEED: f32 = 10.0;
    pub const FAST_ENEMY_SPEED: f32 = 22.0;
    /// Shared scale applied to every enemy speed
    pub const ENEMY_SPEED_SCALE: f32 = 0.4;
    pub const METEOR_SPIN_SCALE: f32 = 0.3;
    /// Ticks an enemy takes to reach full speed
    pub const WARP_IN_TICKS: u32 = 10;

    pub const GAME_DURATION_SECS: u32 = 30;
    pub const MAX_ENEMIES: usize = 35;
    pub const MIN_ENEMY_SPACING: f32 = ENEMY_SIZE + 15.0;
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;
    pub const WAVE_PHASE_TICKS: u32 = 300;

    pub const FAST_ENEMY_SCORE: u32 = 5;
    pub const ENEMY_SCORE: u32 = 1;

    /// Stream periods
    pub const COUNTDOWN_MS: u64 = 1000;
    pub const SPAWN_MS: u64 = 200;
    pub const ENEMY_MOTION_MS: u64 = 16;
    pub const BULLET_MOTION_MS: u64 = 16;
    pub const PLAYER_MOTION_MS: u64 = 16;
    pub const COLLISION_MS: u64 = 32;
    pub const FIRE_REPEAT_MS: u64 = 100;

    /// Remote-control key codes
    pub mod keys {
        pub const UP: u32 = 19;
        pub const DOWN: u32 = 20;
        pub const LEFT: u32 = 21;
        pub const RIGHT: u32 = 22;
        pub const CENTER: u32 = 23;
        pub const PLAY_PAUSE: u32 = 85;
        pub const REWIND: u32 = 89;
        pub const FAST_FORWARD: u32 = 90;
    }
}
